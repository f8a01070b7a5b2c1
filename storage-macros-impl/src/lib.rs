//! Validation and accessor synthesis for the observable storage directives.
//!
//! `@ObservableAppStorage` and `@ObservableKeychain` turn a stored property of
//! an observable type into a computed one backed by an external key-value
//! store. This crate checks that the annotated declaration can be rewritten
//! and emits the getter and setter that replace it:
//!
//! ```text
//! @ObservableAppStorage(key: "String") @ObservationIgnored
//! var string: String = "Test"
//! ```
//!
//! expands to
//!
//! ```text
//! get {
//!     access(keyPath: \.string)
//!     return UserDefaults.standard.object(forKey: "String") as? String ?? "Test"
//! }
//! set {
//!     withMutation(keyPath: \.string) {
//!         UserDefaults.standard.set(newValue, forKey: "String")
//!     }
//! }
//! ```
//!
//! The pipeline is [`extract_binding`] -> [`resolve_arguments`] -> [`validate`]
//! -> [`synthesize`], driven by [`expand`]. Any failure along the way becomes a
//! single [`Diagnostic`].

#![warn(missing_docs)]

#[macro_use]
mod tracing_macros;

// ============================================================================
// RE-EXPORTS FROM STORAGE-MACRO-PARSE (front-end and data model)
// ============================================================================

pub use storage_macro_parse::*;

// ============================================================================
// POLICIES AND CONFIGURATION
// ============================================================================

mod policy;
pub use policy::*;

mod config;
pub use config::*;

// ============================================================================
// PIPELINE
// ============================================================================

mod diagnostic;
pub use diagnostic::*;

mod extract;
pub use extract::*;

mod resolve;
pub use resolve::*;

mod validate;
pub use validate::*;

mod synthesize;
pub use synthesize::*;

mod expand;
pub use expand::*;
