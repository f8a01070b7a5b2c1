//! The precondition rule chain shared by every directive.
//!
//! Rules run in order and the first violation wins:
//!
//! 1. required markers, in [`Marker::ALL`] order
//! 2. an explicit type annotation
//! 3. the type/initializer branch of the policy

use crate::{
    DirectiveArguments, ErrorKind, Expression, ExtractedBinding, Marker, Policy, TypeShape,
};

/// Everything the synthesizer needs, after validation succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContext {
    /// Property name
    pub identifier: String,
    /// The annotated type
    pub resolved_type: TypeShape,
    /// Fallback for reads that find nothing; `None` only for optionals
    pub resolved_default: Option<Expression>,
    /// Mapping key
    pub key: Expression,
    /// Store expression, not yet qualified
    pub store: Expression,
}

/// Run the rule chain for one binding.
pub fn validate(
    binding: ExtractedBinding<'_>,
    arguments: DirectiveArguments,
    policy: &Policy,
) -> Result<ValidatedContext, ErrorKind> {
    let record = binding.record;

    if let Some(marker) = Marker::ALL
        .into_iter()
        .filter(|&m| policy.requires(m))
        .find(|&m| !record.has_marker(m))
    {
        return Err(ErrorKind::missing_marker(marker));
    }

    let Some(resolved_type) = record.type_annotation.clone() else {
        return Err(ErrorKind::NoTypeFound);
    };

    let resolved_default = match (resolved_type.is_optional, &record.initializer) {
        (true, _) if !policy.allows_optional => return Err(ErrorKind::CannotBeOptional),
        (true, Some(_)) => return Err(ErrorKind::OptionalTypeShouldHasDefaultValue),
        (true, None) => None,
        (false, Some(initializer)) => Some(initializer.clone()),
        (false, None) => return Err(policy.missing_default()),
    };

    Ok(ValidatedContext {
        identifier: binding.identifier.to_string(),
        resolved_type,
        resolved_default,
        key: arguments.key,
        store: arguments.store,
    })
}
