//! Accessor synthesis.
//!
//! Code is emitted as host-language text. Both accessors go through the
//! change-notification hooks keyed by the property's own key path, so
//! dependency tracking follows the declared property rather than the store key.

use crate::{ExpandConfig, Policy, ValidatedContext};

/// The generated accessors for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Property name
    pub identifier: String,
    /// Static type of the getter: the base type, or its optional when there is no default
    pub result_type: String,
    /// The `get { ... }` accessor
    pub getter: String,
    /// The `set { ... }` accessor
    pub setter: String,
    indent: String,
}

impl Expansion {
    /// Both accessors wrapped in one accessor block.
    pub fn accessor_block(&self) -> String {
        let mut out = String::from("{\n");
        for line in self.getter.lines().chain(self.setter.lines()) {
            if !line.is_empty() {
                out.push_str(&self.indent);
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push('}');
        out
    }
}

/// Emit the getter and setter for a validated property.
pub fn synthesize(context: ValidatedContext, policy: &Policy, config: &ExpandConfig) -> Expansion {
    let ValidatedContext {
        identifier,
        resolved_type,
        resolved_default,
        key,
        store,
    } = context;

    let indent = &config.indent;
    let store = operand(store.qualified(&policy.capability_type).as_str());
    let key_path = format!("\\.{identifier}");

    let mut read = format!("{store}.{}(forKey: {key})", policy.read_method);
    if policy.casts_read {
        read.push_str(" as? ");
        read.push_str(&operand(&resolved_type.base_type));
    }
    let result_type = match &resolved_default {
        Some(default) => {
            read.push_str(" ?? ");
            read.push_str(&operand(default.as_str()));
            resolved_type.base_type.clone()
        }
        None => format!("{}?", resolved_type.base_type),
    };

    let getter = format!(
        "get {{\n\
         {indent}{access}(keyPath: {key_path})\n\
         {indent}return {read}\n\
         }}",
        access = config.access_hook,
    );
    let setter = format!(
        "set {{\n\
         {indent}{mutation}(keyPath: {key_path}) {{\n\
         {indent}{indent}{store}.{write}(newValue, forKey: {key})\n\
         {indent}}}\n\
         }}",
        mutation = config.mutation_hook,
        write = policy.write_method,
    );

    debug!(%identifier, %result_type, "synthesized accessors");
    Expansion {
        identifier,
        result_type,
        getter,
        setter,
        indent: indent.clone(),
    }
}

/// An expression or type as an operand of `.member`, `as?` or `??`.
///
/// Text with whitespace outside brackets and string literals
/// (`flag ? a : b`, `(Int) -> Int`) is parenthesized; the text itself is unchanged.
fn operand(text: &str) -> String {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut spaced = false;

    for ch in text.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                spaced = true;
                break;
            }
            _ => {}
        }
    }

    if spaced {
        format!("({text})")
    } else {
        text.to_string()
    }
}
