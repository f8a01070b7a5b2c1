//! Directive argument resolution.

use std::collections::HashSet;

use crate::{DirectiveArgument, ErrorKind, Expression, KEY_LABEL, Policy};

/// The resolved arguments of one directive, with the store defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveArguments {
    /// The mapping key, forwarded verbatim
    pub key: Expression,
    /// The explicit store argument, or the policy default
    pub store: Expression,
    /// Whether `store` came from the policy
    pub store_is_default: bool,
}

/// Check the argument list's shape and fill in the store default.
///
/// Argument values are never inspected; only labels are.
pub fn resolve_arguments(
    arguments: &[DirectiveArgument],
    policy: &Policy,
) -> Result<DirectiveArguments, ErrorKind> {
    let mut labeled = Vec::with_capacity(arguments.len());
    for argument in arguments {
        let Some(label) = &argument.label else {
            return Err(ErrorKind::ArgumentsNotLabeledExpressionList);
        };
        labeled.push((label.as_str(), &argument.value));
    }

    let mut seen = HashSet::new();
    for &(label, _) in &labeled {
        if !seen.insert(label) {
            return Err(ErrorKind::DuplicateArgumentLabel(label.to_string()));
        }
        if label != KEY_LABEL && label != policy.store_label {
            return Err(ErrorKind::UnexpectedArgumentLabel(label.to_string()));
        }
    }

    let find = |wanted: &str| -> Option<Expression> {
        labeled
            .iter()
            .find(|&&(label, _)| label == wanted)
            .map(|&(_, value)| value.clone())
    };

    let key = find(KEY_LABEL).ok_or(ErrorKind::NoKeyFoundInArguments)?;
    let (store, store_is_default) = match find(&policy.store_label) {
        Some(store) => (store, false),
        None => (policy.default_store.clone(), true),
    };

    Ok(DirectiveArguments {
        key,
        store,
        store_is_default,
    })
}
