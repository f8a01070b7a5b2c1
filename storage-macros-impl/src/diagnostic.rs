//! Expansion diagnostics.
//!
//! Every rejection is one [`ErrorKind`]; the message text lives only in
//! [`ErrorKind`]'s `Display` impl, never in the rules that produce it.

use std::fmt;

use crate::{DirectiveKind, Marker, SourceLocation};

/// Why a directive could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The declaration is a `let`, or not a property at all.
    NotAVariable,
    /// The statement declares more than one binding.
    MultipleVariables,
    /// The binding already has accessors or observers.
    ComputedProperty,
    /// The binding is a tuple or wildcard pattern rather than a plain name.
    NotIdentifierPatternSyntax,

    /// At least one directive argument has no label.
    ArgumentsNotLabeledExpressionList,
    /// The same label was given twice.
    DuplicateArgumentLabel(String),
    /// A label the directive does not take.
    UnexpectedArgumentLabel(String),
    /// No `key:` argument.
    NoKeyFoundInArguments,
    /// `@ObservationIgnored` is missing.
    IsNotObservationIgnored,
    /// `@MainActor` is missing.
    IsNotMainActor,

    /// The type is left to inference.
    NoTypeFound,
    /// An optional property was given an initializer.
    OptionalTypeShouldHasDefaultValue,
    /// A non-optional property has no initializer.
    NonOptionalPropertyHasNoDefaultValue,
    /// The directive does not support optional properties.
    CannotBeOptional,
    /// The property has no initializer to fall back to.
    PropertyHasNoDefaultValue,
}

/// The three families of expansion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The declaration's shape is incompatible with the directive.
    Structural,
    /// Required markers or directive arguments are absent or malformed.
    Metadata,
    /// The type/initializer combination violates the directive's policy.
    TypeBranch,
}

impl ErrorKind {
    /// The error reported when a required marker is absent.
    pub fn missing_marker(marker: Marker) -> Self {
        match marker {
            Marker::ObservationIgnored => ErrorKind::IsNotObservationIgnored,
            Marker::MainActor => ErrorKind::IsNotMainActor,
        }
    }

    /// Which family this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::NotAVariable
            | ErrorKind::MultipleVariables
            | ErrorKind::ComputedProperty
            | ErrorKind::NotIdentifierPatternSyntax => ErrorClass::Structural,
            ErrorKind::ArgumentsNotLabeledExpressionList
            | ErrorKind::DuplicateArgumentLabel(_)
            | ErrorKind::UnexpectedArgumentLabel(_)
            | ErrorKind::NoKeyFoundInArguments
            | ErrorKind::IsNotObservationIgnored
            | ErrorKind::IsNotMainActor => ErrorClass::Metadata,
            ErrorKind::NoTypeFound
            | ErrorKind::OptionalTypeShouldHasDefaultValue
            | ErrorKind::NonOptionalPropertyHasNoDefaultValue
            | ErrorKind::CannotBeOptional
            | ErrorKind::PropertyHasNoDefaultValue => ErrorClass::TypeBranch,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotAVariable => f.write_str("can only be applied to a variable"),
            ErrorKind::MultipleVariables => {
                f.write_str("cannot be applied to multiple variable bindings")
            }
            ErrorKind::ComputedProperty => f.write_str("cannot be applied to a computed property"),
            ErrorKind::NotIdentifierPatternSyntax => {
                f.write_str("can only be applied to a variable with a simple name")
            }
            ErrorKind::ArgumentsNotLabeledExpressionList => {
                f.write_str("arguments must all be labeled")
            }
            ErrorKind::DuplicateArgumentLabel(label) => {
                write!(f, "argument '{label}' is given more than once")
            }
            ErrorKind::UnexpectedArgumentLabel(label) => {
                write!(f, "does not take an argument labeled '{label}'")
            }
            ErrorKind::NoKeyFoundInArguments => f.write_str("requires a 'key' argument"),
            ErrorKind::IsNotObservationIgnored => {
                f.write_str("must have @ObservationIgnored applied")
            }
            ErrorKind::IsNotMainActor => f.write_str("must have @MainActor applied"),
            ErrorKind::NoTypeFound => f.write_str("requires an explicit type annotation"),
            ErrorKind::OptionalTypeShouldHasDefaultValue => {
                f.write_str("optional type should not have default value")
            }
            ErrorKind::NonOptionalPropertyHasNoDefaultValue => {
                f.write_str("non-optional property has no default value")
            }
            ErrorKind::CannotBeOptional => f.write_str("cannot be optional"),
            ErrorKind::PropertyHasNoDefaultValue => f.write_str("property has no default value"),
        }
    }
}

/// A rejected expansion, reported at the directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: ErrorKind,
    /// The directive being expanded
    pub directive: DirectiveKind,
    /// Where the directive was written, when known
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// A diagnostic with no source location
    pub fn new(kind: ErrorKind, directive: DirectiveKind) -> Self {
        Diagnostic {
            kind,
            directive,
            location: None,
        }
    }

    /// Attach a source location
    pub fn at(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }

    /// The message without location, e.g. `'@ObservableKeychain' cannot be optional`
    pub fn message(&self) -> String {
        format!("'{}' {}", self.directive, self.kind)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{location}: {}", self.message()),
            None => f.write_str(&self.message()),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_prefixed_with_directive() {
        let d = Diagnostic::new(ErrorKind::NotAVariable, DirectiveKind::AppStorage);
        assert_eq!(
            d.to_string(),
            "'@ObservableAppStorage' can only be applied to a variable"
        );

        let d = Diagnostic::new(ErrorKind::CannotBeOptional, DirectiveKind::Keychain)
            .at(Some(SourceLocation { line: 3, column: 6 }));
        assert_eq!(d.to_string(), "3:6: '@ObservableKeychain' cannot be optional");
        assert_eq!(d.message(), "'@ObservableKeychain' cannot be optional");
    }

    #[test]
    fn labels_are_interpolated() {
        let d = Diagnostic::new(
            ErrorKind::UnexpectedArgumentLabel("store".into()),
            DirectiveKind::Keychain,
        );
        assert_eq!(
            d.message(),
            "'@ObservableKeychain' does not take an argument labeled 'store'"
        );
    }

    #[test]
    fn marker_errors_are_metadata() {
        for marker in Marker::ALL {
            assert_eq!(ErrorKind::missing_marker(marker).class(), ErrorClass::Metadata);
        }
        assert_eq!(ErrorKind::ComputedProperty.class(), ErrorClass::Structural);
        assert_eq!(ErrorKind::CannotBeOptional.class(), ErrorClass::TypeBranch);
    }
}
