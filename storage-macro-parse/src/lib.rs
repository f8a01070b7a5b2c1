//! Parser for observable storage directives
//!
//! This crate takes host-language source text (or an already-lexed `TokenStream`)
//! holding one annotated property declaration and returns the normalized
//! [`DeclarationRecord`] together with the storage directives attached to it,
//! using the types from `storage-macro-types`.
//!
//! Lexing is done by `proc-macro2`, parsing by `unsynn`.

#![warn(missing_docs)]

pub use storage_macro_types::*;

mod grammar;

mod render;

mod convert;
pub use convert::*;
