//! Store binding policies.
//!
//! The two directive flavors share one rule chain and one synthesizer; what
//! differs between them is plain data in a [`Policy`].

use crate::{DirectiveKind, ErrorKind, Expression, Marker};

/// Label of the required mapping-key argument, shared by every directive
pub const KEY_LABEL: &str = "key";

/// Validation and synthesis parameters for one directive flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// The directive this policy governs
    pub directive: DirectiveKind,
    /// Markers the declaration must carry
    pub required_markers: Vec<Marker>,
    /// Whether optional properties are accepted (with no initializer)
    pub allows_optional: bool,
    /// Label of the store argument, e.g. `store` in `store: .standard`
    pub store_label: String,
    /// Store used when the store argument is absent
    pub default_store: Expression,
    /// Type that qualifies leading-dot store arguments
    pub capability_type: String,
    /// Store method reading a value, called as `read(forKey:)`
    pub read_method: String,
    /// Store method writing a value, called as `write(_:forKey:)`
    pub write_method: String,
    /// Whether the read value is cast to the property's type with `as?`
    pub casts_read: bool,
}

impl Policy {
    /// `@ObservableAppStorage`, backed by `UserDefaults`
    pub fn app_storage() -> Self {
        Policy {
            directive: DirectiveKind::AppStorage,
            required_markers: vec![Marker::ObservationIgnored],
            allows_optional: true,
            store_label: "store".to_string(),
            default_store: Expression::new("UserDefaults.standard"),
            capability_type: "UserDefaults".to_string(),
            read_method: "object".to_string(),
            write_method: "set".to_string(),
            casts_read: true,
        }
    }

    /// `@ObservableKeychain`, backed by `KeychainManager`
    pub fn keychain() -> Self {
        Policy {
            directive: DirectiveKind::Keychain,
            required_markers: vec![Marker::ObservationIgnored, Marker::MainActor],
            allows_optional: false,
            store_label: "manager".to_string(),
            default_store: Expression::new("KeychainManager.shared"),
            capability_type: "KeychainManager".to_string(),
            read_method: "get".to_string(),
            write_method: "set".to_string(),
            casts_read: false,
        }
    }

    /// The stock policy for a directive
    pub fn for_directive(kind: DirectiveKind) -> Self {
        match kind {
            DirectiveKind::AppStorage => Policy::app_storage(),
            DirectiveKind::Keychain => Policy::keychain(),
        }
    }

    /// Point the policy at another store type and default instance.
    pub fn with_capability(
        mut self,
        capability_type: impl Into<String>,
        default_store: impl Into<Expression>,
    ) -> Self {
        self.capability_type = capability_type.into();
        self.default_store = default_store.into();
        self
    }

    /// Returns true if the marker must be present
    pub fn requires(&self, marker: Marker) -> bool {
        self.required_markers.contains(&marker)
    }

    /// The error for a property with neither an initializer nor an accepted optional type
    pub(crate) fn missing_default(&self) -> ErrorKind {
        if self.allows_optional {
            ErrorKind::NonOptionalPropertyHasNoDefaultValue
        } else {
            ErrorKind::PropertyHasNoDefaultValue
        }
    }
}
