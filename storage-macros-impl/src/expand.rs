//! The expansion pipeline.

use crate::{
    DeclarationRecord, Diagnostic, DirectiveInvocation, ErrorKind, ExpandConfig, Expansion, ParseError,
    extract_binding, parse_declaration, resolve_arguments, synthesize, validate,
};

/// Expand one directive attached to a declaration.
///
/// Extraction, argument resolution and validation each stop at their first
/// failure; the resulting diagnostic is reported at the directive.
pub fn expand(
    record: &DeclarationRecord,
    directive: &DirectiveInvocation,
    config: &ExpandConfig,
) -> Result<Expansion, Diagnostic> {
    let policy = config.policy(directive.kind);
    let fail = |kind: ErrorKind| {
        debug!(directive = %directive.kind, %kind, "expansion rejected");
        Diagnostic::new(kind, directive.kind).at(directive.location)
    };

    let binding = extract_binding(record).map_err(fail)?;
    let arguments = resolve_arguments(&directive.arguments, policy).map_err(fail)?;
    trace!(
        key = %arguments.key,
        store = %arguments.store,
        default_store = arguments.store_is_default,
        "resolved arguments"
    );
    let context = validate(binding, arguments, policy).map_err(fail)?;

    Ok(synthesize(context, policy, config))
}

/// Parse one declaration and expand every storage directive on it.
///
/// Returns one result per directive, in source order. A declaration without
/// directives yields an empty list.
pub fn expand_source(
    source: &str,
    config: &ExpandConfig,
) -> Result<Vec<Result<Expansion, Diagnostic>>, ParseError> {
    let parsed = parse_declaration(source)?;
    Ok(parsed
        .directives
        .iter()
        .map(|directive| expand(&parsed.record, directive, config))
        .collect())
}
