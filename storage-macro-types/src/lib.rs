//! # Storage Macro Types
//!
//! Shared declaration records for the observable storage directives.
//!
//! This crate provides the types that describe one annotated property
//! declaration (its binding, type annotation, initializer and marker
//! attributes) and the storage directive attached to it, in a form suitable
//! for validation and accessor synthesis.
//!
//! These types are used by:
//! - `storage-macro-parse`: builds them from host-language source text
//! - `storage-macros-impl`: validates them and synthesizes accessors

#![warn(missing_docs)]

use std::collections::BTreeSet;
use std::fmt;

use proc_macro2::Span;

// =============================================================================
// Expressions
// =============================================================================

/// An opaque host-language expression.
///
/// Expressions are carried through the pipeline untouched: the only
/// introspection ever performed is the leading-dot check used to qualify
/// implicit-member references such as `.standard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    /// Wrap source text as an expression. Surrounding whitespace is dropped.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self(text.trim().to_string())
    }

    /// The expression's source text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for implicit-member shorthand like `.standard` or `.init(suiteName: "x")`
    pub fn has_leading_dot(&self) -> bool {
        self.0.starts_with('.')
    }

    /// Qualify an implicit-member expression with a concrete type name.
    ///
    ///   `.standard` qualified by `UserDefaults` = `UserDefaults.standard`
    ///   `UserDefaults.standard` qualified by `UserDefaults` = unchanged
    pub fn qualified(&self, type_name: &str) -> Expression {
        if self.has_leading_dot() {
            Expression(format!("{type_name}{}", self.0))
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Expression::new(text)
    }
}

// =============================================================================
// Type annotations
// =============================================================================

/// The shape of an explicit type annotation.
///
/// Only a trailing `?` makes a type optional: `Optional<Date>` and
/// implicitly unwrapped `Date!` are treated as plain base types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeShape {
    /// Whether the annotation ends in `?`
    pub is_optional: bool,
    /// The annotation without its trailing `?`
    pub base_type: String,
}

impl TypeShape {
    /// Build a shape from annotation text such as `String` or `Date?`
    pub fn parse(annotation: &str) -> Self {
        let annotation = annotation.trim();
        match annotation.strip_suffix('?') {
            Some(base) => TypeShape {
                is_optional: true,
                base_type: base.trim_end().to_string(),
            },
            None => TypeShape {
                is_optional: false,
                base_type: annotation.to_string(),
            },
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional {
            write!(f, "{}?", self.base_type)
        } else {
            f.write_str(&self.base_type)
        }
    }
}

// =============================================================================
// Markers
// =============================================================================

/// Attribute markers the directives require on the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// `@ObservationIgnored`: excluded from automatic dependency tracking
    ObservationIgnored,
    /// `@MainActor`: confined to the main execution context
    MainActor,
}

impl Marker {
    /// Every marker, in validation order
    pub const ALL: [Marker; 2] = [Marker::ObservationIgnored, Marker::MainActor];

    /// The attribute name as written after `@`
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Marker::ObservationIgnored => "ObservationIgnored",
            Marker::MainActor => "MainActor",
        }
    }

    /// Look up a marker by attribute name
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.attribute_name() == name)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.attribute_name())
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// How the declaration introduces its bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// `var`
    MutableVariable,
    /// `let`
    ImmutableConstant,
    /// Not a property binding at all (a function, a type, ...)
    Other,
}

/// Normalized view of one property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRecord {
    /// `var`, `let`, or something else
    pub binding_kind: BindingKind,
    /// Number of comma-separated bindings in the statement
    pub binding_count: usize,
    /// Whether the (first) binding already carries an accessor or observer block
    pub has_existing_accessor_block: bool,
    /// The bound name, for simple identifier patterns only
    pub identifier_pattern: Option<String>,
    /// The explicit type annotation, if any
    pub type_annotation: Option<TypeShape>,
    /// The initializer expression, if any
    pub initializer: Option<Expression>,
    /// Marker attributes present on the declaration
    pub attributes: BTreeSet<Marker>,
}

impl DeclarationRecord {
    /// A single `var name` binding with no annotation, initializer, or markers.
    pub fn variable(name: impl Into<String>) -> Self {
        DeclarationRecord {
            binding_kind: BindingKind::MutableVariable,
            binding_count: 1,
            has_existing_accessor_block: false,
            identifier_pattern: Some(name.into()),
            type_annotation: None,
            initializer: None,
            attributes: BTreeSet::new(),
        }
    }

    /// Set the type annotation from text such as `Date?`
    pub fn with_type(mut self, annotation: &str) -> Self {
        self.type_annotation = Some(TypeShape::parse(annotation));
        self
    }

    /// Set the initializer expression
    pub fn with_initializer(mut self, expr: impl Into<Expression>) -> Self {
        self.initializer = Some(expr.into());
        self
    }

    /// Add a marker attribute
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.attributes.insert(marker);
        self
    }

    /// Returns true if the marker is present
    pub fn has_marker(&self, marker: Marker) -> bool {
        self.attributes.contains(&marker)
    }
}

// =============================================================================
// Directives
// =============================================================================

/// The two storage directive flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectiveKind {
    /// `@ObservableAppStorage`, backed by the generic settings store
    AppStorage,
    /// `@ObservableKeychain`, backed by the secret store
    Keychain,
}

impl DirectiveKind {
    /// Both flavors
    pub const ALL: [DirectiveKind; 2] = [DirectiveKind::AppStorage, DirectiveKind::Keychain];

    /// The attribute name as written after `@`
    pub fn attribute_name(&self) -> &'static str {
        match self {
            DirectiveKind::AppStorage => "ObservableAppStorage",
            DirectiveKind::Keychain => "ObservableKeychain",
        }
    }

    /// Look up a directive by attribute name
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.attribute_name() == name)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.attribute_name())
    }
}

/// One argument of a directive invocation, e.g. `key: "String"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveArgument {
    /// The label before `:`, if the argument has one
    pub label: Option<String>,
    /// The argument expression
    pub value: Expression,
}

impl DirectiveArgument {
    /// A labeled argument
    pub fn labeled(label: impl Into<String>, value: impl Into<Expression>) -> Self {
        DirectiveArgument {
            label: Some(label.into()),
            value: value.into(),
        }
    }

    /// An argument without a label
    pub fn unlabeled(value: impl Into<Expression>) -> Self {
        DirectiveArgument {
            label: None,
            value: value.into(),
        }
    }
}

/// A directive attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveInvocation {
    /// Which directive
    pub kind: DirectiveKind,
    /// Arguments in source order
    pub arguments: Vec<DirectiveArgument>,
    /// Where the directive was written, when known
    pub location: Option<SourceLocation>,
}

impl DirectiveInvocation {
    /// An invocation with no source location
    pub fn new(kind: DirectiveKind, arguments: Vec<DirectiveArgument>) -> Self {
        DirectiveInvocation {
            kind,
            arguments,
            location: None,
        }
    }
}

// =============================================================================
// Source locations
// =============================================================================

/// A 1-based line and column in the source a declaration was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl SourceLocation {
    /// The start of a span. Requires proc-macro2's `span-locations`.
    pub fn from_span(span: Span) -> Self {
        let start = span.start();
        SourceLocation {
            line: start.line,
            column: start.column + 1,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_annotation_splits_base_type() {
        let shape = TypeShape::parse("Date?");
        assert!(shape.is_optional);
        assert_eq!(shape.base_type, "Date");
        assert_eq!(shape.to_string(), "Date?");

        let shape = TypeShape::parse("[String: Int]");
        assert!(!shape.is_optional);
        assert_eq!(shape.base_type, "[String: Int]");
    }

    #[test]
    fn only_trailing_question_mark_is_optional() {
        assert!(!TypeShape::parse("Optional<Date>").is_optional);
        assert!(!TypeShape::parse("Date!").is_optional);
        let nested = TypeShape::parse("Date??");
        assert!(nested.is_optional);
        assert_eq!(nested.base_type, "Date?");
    }

    #[test]
    fn leading_dot_is_qualified_once() {
        let expr = Expression::new(".standard");
        let qualified = expr.qualified("UserDefaults");
        assert_eq!(qualified.as_str(), "UserDefaults.standard");
        assert_eq!(qualified.qualified("UserDefaults"), qualified);

        let explicit = Expression::new("UserDefaults(suiteName: \"group\")!");
        assert_eq!(explicit.qualified("UserDefaults"), explicit);
    }

    #[test]
    fn markers_and_directives_round_trip_by_name() {
        for marker in Marker::ALL {
            assert_eq!(Marker::from_attribute_name(marker.attribute_name()), Some(marker));
        }
        for kind in DirectiveKind::ALL {
            assert_eq!(DirectiveKind::from_attribute_name(kind.attribute_name()), Some(kind));
        }
        assert_eq!(Marker::from_attribute_name("Published"), None);
        assert_eq!(DirectiveKind::AppStorage.to_string(), "@ObservableAppStorage");
    }
}
