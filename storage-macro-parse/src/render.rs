//! Compact source rendering of lexed tokens.
//!
//! `TokenStream::to_string` puts a space between every token
//! (`UserDefaults . standard`), which is not how anyone writes the host
//! language. This renderer reproduces conventional spacing instead: member
//! access and calls are glued, postfix `?`/`!` attach to their operand,
//! binary operators are spaced.

use proc_macro2::{Delimiter, Spacing, TokenTree};

/// Which spacing conventions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderMode {
    /// An initializer or directive argument
    Expression,
    /// A type annotation: `<`/`>` delimit generic arguments
    Type,
}

/// What the previous rendered element leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    /// An identifier, literal, group, or postfix operator
    Operand,
    /// Nothing may separate the next element (`.`, prefix operators, `<`)
    Glue,
    /// The next element is preceded by a space (`,`, `:`, binary operators)
    Spaced,
}

/// Render tokens with conventional spacing.
pub(crate) fn render_tokens(tokens: &[TokenTree], mode: RenderMode) -> String {
    let mut out = String::new();
    let mut prev = Prev::Start;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            TokenTree::Ident(ident) => {
                push_word(&mut out, prev, &ident.to_string());
                prev = Prev::Operand;
                i += 1;
            }
            TokenTree::Literal(lit) => {
                push_word(&mut out, prev, &lit.to_string());
                prev = Prev::Operand;
                i += 1;
            }
            TokenTree::Group(group) => {
                let inner: Vec<TokenTree> = group.stream().into_iter().collect();
                let body = render_tokens(&inner, mode);
                let (text, attaches) = match group.delimiter() {
                    Delimiter::Parenthesis => (format!("({body})"), true),
                    Delimiter::Bracket => (format!("[{body}]"), true),
                    Delimiter::Brace if body.is_empty() => ("{}".to_string(), false),
                    Delimiter::Brace => (format!("{{ {body} }}"), false),
                    Delimiter::None => (body, false),
                };
                // calls and subscripts attach to their callee
                let space = match prev {
                    Prev::Start | Prev::Glue => false,
                    Prev::Operand => !attaches,
                    Prev::Spaced => true,
                };
                if space {
                    out.push(' ');
                }
                out.push_str(&text);
                prev = Prev::Operand;
                i += 1;
            }
            TokenTree::Punct(_) => {
                let (op, next) = operator_at(tokens, i, mode);
                prev = push_operator(&mut out, prev, &op, mode);
                i = next;
            }
        }
    }

    out
}

fn push_word(out: &mut String, prev: Prev, word: &str) {
    if matches!(prev, Prev::Operand | Prev::Spaced) {
        out.push(' ');
    }
    out.push_str(word);
}

/// Collect the operator starting at `start`, returning it and the index after it.
///
/// In expressions, joint punctuation forms one operator (`??`, `==`, `?.`).
/// In types every punctuation character stands alone except `->`, so that
/// `Array<Int>?` is not read as a `>?` operator.
fn operator_at(tokens: &[TokenTree], start: usize, mode: RenderMode) -> (String, usize) {
    let mut op = String::new();
    let mut i = start;
    while let Some(TokenTree::Punct(p)) = tokens.get(i) {
        op.push(p.as_char());
        i += 1;
        if p.spacing() == Spacing::Alone {
            break;
        }
        if mode == RenderMode::Type {
            let arrow = p.as_char() == '-'
                && matches!(tokens.get(i), Some(TokenTree::Punct(n)) if n.as_char() == '>');
            if !arrow {
                break;
            }
        }
    }
    (op, i)
}

fn push_operator(out: &mut String, prev: Prev, op: &str, mode: RenderMode) -> Prev {
    let postfix_position = prev == Prev::Operand;

    match op {
        "." => {
            out.push('.');
            return Prev::Glue;
        }
        "," | ";" | ":" => {
            out.push_str(op);
            return Prev::Spaced;
        }
        "?" | "!" if postfix_position => {
            out.push_str(op);
            return Prev::Operand;
        }
        _ => {}
    }

    if mode == RenderMode::Type {
        match op {
            "<" => {
                out.push('<');
                return Prev::Glue;
            }
            ">" => {
                out.push('>');
                return Prev::Operand;
            }
            _ => {}
        }
    }

    // optional chaining: `value?.member`, `value!.member`
    if postfix_position && op.len() > 1 && op.ends_with('.') {
        out.push_str(op);
        return Prev::Glue;
    }

    if !postfix_position {
        if prev == Prev::Spaced {
            out.push(' ');
        }
        out.push_str(op);
        return Prev::Glue;
    }

    out.push(' ');
    out.push_str(op);
    Prev::Spaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::TokenStream;

    fn render(source: &str, mode: RenderMode) -> String {
        let tokens: TokenStream = source.parse().expect("lexes");
        let tokens: Vec<TokenTree> = tokens.into_iter().collect();
        render_tokens(&tokens, mode)
    }

    #[test]
    fn member_access_and_calls_are_glued() {
        let e = RenderMode::Expression;
        assert_eq!(render("UserDefaults . standard", e), "UserDefaults.standard");
        assert_eq!(render(".standard", e), ".standard");
        assert_eq!(render("Date ( )", e), "Date()");
        assert_eq!(
            render(r#".init(suiteName : "group.app") !"#, e),
            r#".init(suiteName: "group.app")!"#
        );
        assert_eq!(render("items [ 0 ] ?. count", e), "items[0]?.count");
    }

    #[test]
    fn binary_operators_are_spaced() {
        let e = RenderMode::Expression;
        assert_eq!(render("a??b", e), "a ?? b");
        assert_eq!(render("x as? Int", e), "x as? Int");
        assert_eq!(render("-1 + offset", e), "-1 + offset");
        assert_eq!(render("!flag", e), "!flag");
        assert_eq!(render("Foo { 1 }", e), "Foo { 1 }");
    }

    #[test]
    fn types_keep_generic_brackets_tight() {
        let t = RenderMode::Type;
        assert_eq!(render("Date?", t), "Date?");
        assert_eq!(render("Array<Int>?", t), "Array<Int>?");
        assert_eq!(render("Dictionary<String, Array<Int>>", t), "Dictionary<String, Array<Int>>");
        assert_eq!(render("[String: Int]", t), "[String: Int]");
        assert_eq!(render("(Int) -> Void", t), "(Int) -> Void");
    }
}
