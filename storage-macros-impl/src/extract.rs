//! Structural checks on the declaration a directive is attached to.

use crate::{BindingKind, DeclarationRecord, ErrorKind};

/// The single named binding a directive will back.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedBinding<'a> {
    /// Property name
    pub identifier: &'a str,
    /// The declaration it came from
    pub record: &'a DeclarationRecord,
}

/// Accept only a single stored `var` with a plain name.
///
/// Checks run in a fixed order and the first failure is returned.
pub fn extract_binding(record: &DeclarationRecord) -> Result<ExtractedBinding<'_>, ErrorKind> {
    if record.binding_kind != BindingKind::MutableVariable {
        return Err(ErrorKind::NotAVariable);
    }
    if record.binding_count != 1 {
        return Err(ErrorKind::MultipleVariables);
    }
    if record.has_existing_accessor_block {
        return Err(ErrorKind::ComputedProperty);
    }
    let Some(identifier) = record.identifier_pattern.as_deref() else {
        return Err(ErrorKind::NotIdentifierPatternSyntax);
    };

    trace!(identifier, "extracted binding");
    Ok(ExtractedBinding { identifier, record })
}
