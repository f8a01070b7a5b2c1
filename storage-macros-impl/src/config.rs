//! Expansion configuration.

use crate::{DirectiveKind, Policy};

/// Knobs for accessor synthesis.
///
/// The defaults target the Observation framework: `access(keyPath:)` before
/// reads and `withMutation(keyPath:_:)` around writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandConfig {
    /// Hook called before every read
    pub access_hook: String,
    /// Hook wrapping every write
    pub mutation_hook: String,
    /// One level of indentation in emitted code
    pub indent: String,
    /// Policy for `@ObservableAppStorage`
    pub app_storage: Policy,
    /// Policy for `@ObservableKeychain`
    pub keychain: Policy,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        ExpandConfig {
            access_hook: "access".to_string(),
            mutation_hook: "withMutation".to_string(),
            indent: "    ".to_string(),
            app_storage: Policy::app_storage(),
            keychain: Policy::keychain(),
        }
    }
}

impl ExpandConfig {
    /// The policy governing a directive
    pub fn policy(&self, kind: DirectiveKind) -> &Policy {
        match kind {
            DirectiveKind::AppStorage => &self.app_storage,
            DirectiveKind::Keychain => &self.keychain,
        }
    }

    /// Replace the policy for the directive it names
    pub fn with_policy(mut self, policy: Policy) -> Self {
        match policy.directive {
            DirectiveKind::AppStorage => self.app_storage = policy,
            DirectiveKind::Keychain => self.keychain = policy,
        }
        self
    }

    /// Use another access hook
    pub fn with_access_hook(mut self, name: impl Into<String>) -> Self {
        self.access_hook = name.into();
        self
    }

    /// Use another mutation hook
    pub fn with_mutation_hook(mut self, name: impl Into<String>) -> Self {
        self.mutation_hook = name.into();
        self
    }

    /// Indent emitted code by `width` spaces per level
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }
}
