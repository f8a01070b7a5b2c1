//! Conversion from grammar types to declaration records
//!
//! This module converts the unsynn-parsed [`PropertyDecl`] into the
//! [`DeclarationRecord`] and [`DirectiveInvocation`]s from
//! `storage-macro-types`.

use std::collections::BTreeSet;
use std::fmt;

use proc_macro2::{Delimiter, Spacing, Span, TokenStream, TokenTree};
use storage_macro_types::*;
use unsynn::{IParse, ToTokenIter};

use crate::grammar::{BindingKeyword, DeclAttribute, PropertyDecl};
use crate::render::{RenderMode, render_tokens};

/// Keywords that open an accessor or observer block
const ACCESSOR_KEYWORDS: &[&str] = &["get", "set", "willSet", "didSet", "_read", "_modify"];

// ============================================================================
// PUBLIC PARSING API
// ============================================================================

/// A declaration together with the storage directives attached to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDeclaration {
    /// The normalized declaration
    pub record: DeclarationRecord,
    /// Storage directives, in source order
    pub directives: Vec<DirectiveInvocation>,
}

/// Source text that could not be read as a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message
    pub message: String,
    /// Where the error occurred, when known
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one declaration from source text
///
/// Initializers, argument values and type annotations are copied from
/// `source` exactly as written.
pub fn parse_declaration(source: &str) -> Result<ParsedDeclaration, ParseError> {
    let tokens: TokenStream = source.parse().map_err(|e: proc_macro2::LexError| ParseError {
        message: format!("failed to lex declaration: {e}"),
        location: Some(SourceLocation::from_span(e.span())),
    })?;
    parse_tokens(tokens, SourceText(Some(source)))
}

/// Parse one declaration from a token stream
///
/// Without source text, expressions are re-rendered from the tokens with
/// conventional spacing.
pub fn parse_declaration_tokens(tokens: TokenStream) -> Result<ParsedDeclaration, ParseError> {
    parse_tokens(tokens, SourceText(None))
}

fn parse_tokens(tokens: TokenStream, text: SourceText<'_>) -> Result<ParsedDeclaration, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError {
            message: "empty declaration".to_string(),
            location: None,
        });
    }

    let mut iter = tokens.to_token_iter();
    let parsed: PropertyDecl = iter.parse().map_err(|e| ParseError {
        message: format!("failed to parse declaration: {e}"),
        location: None,
    })?;
    Ok(declaration_from_grammar(&parsed, text))
}

// ============================================================================
// SOURCE TEXT
// ============================================================================

/// The text tokens were lexed from, when there is one.
#[derive(Debug, Clone, Copy)]
struct SourceText<'a>(Option<&'a str>);

impl SourceText<'_> {
    /// The source covered by `tokens`, or a rendering of them.
    fn slice(&self, tokens: &[TokenTree], mode: RenderMode) -> String {
        self.verbatim(tokens)
            .map(str::to_string)
            .unwrap_or_else(|| render_tokens(tokens, mode))
    }

    fn verbatim(&self, tokens: &[TokenTree]) -> Option<&str> {
        let source = self.0?;
        let start = tokens.first()?.span().byte_range().start;
        let end = tokens.last()?.span().byte_range().end;
        if start >= end {
            return None;
        }
        source.get(start..end)
    }

    fn expression(&self, tokens: &[TokenTree]) -> Expression {
        Expression::new(self.slice(tokens, RenderMode::Expression))
    }
}

// ============================================================================
// CONVERSION FUNCTIONS
// ============================================================================

fn declaration_from_grammar(decl: &PropertyDecl, text: SourceText<'_>) -> ParsedDeclaration {
    let mut attributes = BTreeSet::new();
    let mut directives = Vec::new();

    for attr in &decl.attributes {
        let name = attr.name.to_string();
        if let Some(marker) = Marker::from_attribute_name(&name) {
            attributes.insert(marker);
        } else if let Some(kind) = DirectiveKind::from_attribute_name(&name) {
            directives.push(directive_from_attribute(kind, attr, text));
        }
    }

    let binding_kind = match &decl.introducer {
        Some(BindingKeyword::Var(_)) => BindingKind::MutableVariable,
        Some(BindingKeyword::Let(_)) => BindingKind::ImmutableConstant,
        None => BindingKind::Other,
    };

    let bindings = match binding_kind {
        BindingKind::Other => Vec::new(),
        _ => split_bindings(&decl.rest),
    };
    let first = bindings
        .first()
        .map(|tokens| binding_parts(tokens, text))
        .unwrap_or_default();

    ParsedDeclaration {
        record: DeclarationRecord {
            binding_kind,
            binding_count: bindings.len(),
            has_existing_accessor_block: first.has_accessor_block,
            identifier_pattern: first.identifier,
            type_annotation: first.annotation,
            initializer: first.initializer,
            attributes,
        },
        directives,
    }
}

fn directive_from_attribute(
    kind: DirectiveKind,
    attr: &DeclAttribute,
    text: SourceText<'_>,
) -> DirectiveInvocation {
    let arguments = attr
        .arguments
        .as_ref()
        .map(|group| arguments_from_tokens(group.0.stream(), text))
        .unwrap_or_default();

    DirectiveInvocation {
        kind,
        arguments,
        location: Some(SourceLocation::from_span(attr.name.span())),
    }
}

/// Split `key: "a", store: .standard` into arguments. A trailing comma is allowed.
fn arguments_from_tokens(stream: TokenStream, text: SourceText<'_>) -> Vec<DirectiveArgument> {
    let tokens: Vec<TokenTree> = stream.into_iter().collect();
    tokens
        .split(|tt| is_punct(tt, ','))
        .filter(|arg| !arg.is_empty())
        .map(|arg| argument_from_tokens(arg, text))
        .collect()
}

fn argument_from_tokens(tokens: &[TokenTree], text: SourceText<'_>) -> DirectiveArgument {
    match tokens {
        [TokenTree::Ident(label), TokenTree::Punct(colon), value @ ..]
            if colon.as_char() == ':' && !value.is_empty() =>
        {
            DirectiveArgument::labeled(label.to_string(), text.expression(value))
        }
        _ => DirectiveArgument::unlabeled(text.expression(tokens)),
    }
}

// ============================================================================
// BINDINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingRegion {
    Pattern,
    Type,
    Initializer,
}

/// Split the tokens after `var`/`let` into one slice per binding.
///
/// Commas inside `<...>` do not separate bindings: in a type annotation every
/// `<` opens generic arguments, in an initializer only a `<` written directly
/// after a name does (`Dictionary<String, Int>()`, but not `a < b`).
/// A top-level `;` ends the statement.
fn split_bindings(tokens: &[TokenTree]) -> Vec<&[TokenTree]> {
    let mut bindings = Vec::new();
    let mut start = 0;
    let mut end = tokens.len();
    let mut region = BindingRegion::Pattern;
    let mut angle_depth = 0usize;

    for (i, tt) in tokens.iter().enumerate() {
        let TokenTree::Punct(p) = tt else { continue };
        match p.as_char() {
            ':' if region == BindingRegion::Pattern => region = BindingRegion::Type,
            '=' if region != BindingRegion::Initializer && is_assignment(tokens, i) => {
                region = BindingRegion::Initializer;
            }
            '<' if region == BindingRegion::Type => angle_depth += 1,
            '<' if region == BindingRegion::Initializer && opens_generic_arguments(tokens, i) => {
                angle_depth += 1;
            }
            '>' if region == BindingRegion::Type && !is_arrow_head(tokens, i) => {
                angle_depth = angle_depth.saturating_sub(1);
            }
            '>' if region == BindingRegion::Initializer
                && angle_depth > 0
                && !is_arrow_head(tokens, i) =>
            {
                angle_depth = angle_depth.saturating_sub(1);
            }
            ',' if angle_depth == 0 => {
                bindings.push(&tokens[start..i]);
                start = i + 1;
                region = BindingRegion::Pattern;
            }
            ';' if angle_depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    if start < end {
        bindings.push(&tokens[start..end]);
    }
    bindings
}

/// The pieces of one binding: `name: Type = initializer { accessors }`
#[derive(Debug, Default)]
struct BindingParts {
    identifier: Option<String>,
    annotation: Option<TypeShape>,
    initializer: Option<Expression>,
    has_accessor_block: bool,
}

fn binding_parts(tokens: &[TokenTree], text: SourceText<'_>) -> BindingParts {
    // `_` and tuple patterns have no single name
    let identifier = match tokens.first() {
        Some(TokenTree::Ident(ident)) if ident != "_" => Some(ident.to_string()),
        _ => None,
    };

    let mut rest = tokens.get(1..).unwrap_or_default();
    let assignment = (0..rest.len()).find(|&i| is_assignment(rest, i));

    // A trailing block is an accessor block unless it is a trailing closure
    // of the initializer.
    let mut has_accessor_block = false;
    if let Some(TokenTree::Group(group)) = rest.last()
        && group.delimiter() == Delimiter::Brace
        && (assignment.is_none() || opens_with_accessor_keyword(group.stream()))
    {
        has_accessor_block = true;
        rest = &rest[..rest.len() - 1];
    }

    let (declared, initializer) = match assignment {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };

    let annotation = match declared.split_first() {
        Some((colon, ty)) if is_punct(colon, ':') && !ty.is_empty() => {
            Some(TypeShape::parse(&text.slice(ty, RenderMode::Type)))
        }
        _ => None,
    };

    let initializer = initializer
        .filter(|expr| !expr.is_empty())
        .map(|expr| text.expression(expr));

    BindingParts {
        identifier,
        annotation,
        initializer,
        has_accessor_block,
    }
}

fn opens_with_accessor_keyword(stream: TokenStream) -> bool {
    match stream.into_iter().next() {
        Some(TokenTree::Ident(ident)) => ACCESSOR_KEYWORDS.iter().any(|kw| ident == kw),
        _ => false,
    }
}

fn is_punct(tt: &TokenTree, ch: char) -> bool {
    matches!(tt, TokenTree::Punct(p) if p.as_char() == ch)
}

/// A lone `=`, not part of `==`, `!=`, `>=`, `<=`, `=>`
fn is_assignment(tokens: &[TokenTree], i: usize) -> bool {
    let TokenTree::Punct(p) = &tokens[i] else {
        return false;
    };
    let joined_to_previous = i > 0
        && matches!(&tokens[i - 1], TokenTree::Punct(prev) if prev.spacing() == Spacing::Joint);
    p.as_char() == '=' && p.spacing() == Spacing::Alone && !joined_to_previous
}

/// A lone `<` touching the name before it, as in `Set<String>()`.
///
/// Only decidable with real source positions: tokens without them never
/// open generic arguments in an initializer.
fn opens_generic_arguments(tokens: &[TokenTree], i: usize) -> bool {
    let TokenTree::Punct(lt) = &tokens[i] else {
        return false;
    };
    let Some(TokenTree::Ident(name)) = i.checked_sub(1).and_then(|prev| tokens.get(prev)) else {
        return false;
    };
    lt.spacing() == Spacing::Alone && touches(name.span(), lt.span())
}

fn touches(before: Span, after: Span) -> bool {
    let before = before.byte_range();
    !before.is_empty() && before.end == after.byte_range().start
}

/// The `>` of a `->`
fn is_arrow_head(tokens: &[TokenTree], i: usize) -> bool {
    i > 0
        && matches!(&tokens[i - 1], TokenTree::Punct(prev)
            if prev.as_char() == '-' && prev.spacing() == Spacing::Joint)
}
