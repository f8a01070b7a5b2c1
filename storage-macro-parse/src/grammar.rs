//! Unsynn grammar for attributed property declarations.
//!
//! The grammar stops at the binding keyword: everything after `var`/`let` is
//! kept as raw tokens and split into bindings by `convert`, since type
//! annotations like `Dictionary<String, Int>` carry commas that are not
//! grouped by the lexer.

use unsynn::*;

keyword! {
    /// The `var` binding keyword.
    pub KVar = "var";
    /// The `let` binding keyword.
    pub KLet = "let";
}

operator! {
    /// The '@' introducing an attribute.
    pub AtSign = "@";
}

unsynn! {
    /// One declaration statement
    pub struct PropertyDecl {
        pub attributes: Vec<DeclAttribute>,
        pub modifiers: Vec<Modifier>,
        pub introducer: Option<BindingKeyword>,
        pub rest: Vec<TokenTree>,
    }

    /// `@Name` or `@Name(arguments)`
    pub struct DeclAttribute {
        pub _at: AtSign,
        pub name: Ident,
        pub arguments: Option<ParenthesisGroup>,
    }

    /// A declaration modifier: `private`, `private(set)`, `static`, ...
    pub struct Modifier {
        pub _not_introducer: Except<BindingKeyword>,
        pub name: Ident,
        pub detail: Option<ParenthesisGroup>,
    }

    /// `var` or `let`
    pub enum BindingKeyword {
        Var(KVar),
        Let(KLet),
    }
}
