//! Core library for composing command-line option groups.
//!
//! An option group is a reusable, independently declared parameter set with
//! a configuration step attached. This crate merges the signatures of a
//! command and its option groups into one externally visible signature, and
//! splits a single set of bound arguments back out to every contributing
//! callable.
//!
//! ## Usage Example
//!
//! ```rust
//! use notesync_core::{Arguments, Callable, ComposeBuilder, CoreError};
//! use notesync_core::signature::{Signature, TypeTag};
//!
//! let browser = Signature::builder()
//!     .optional("timeout", TypeTag::Int, 10)
//!     .build()
//!     .unwrap();
//! let login = Signature::builder()
//!     .required("user", TypeTag::Str)
//!     .required("password", TypeTag::Str)
//!     .build()
//!     .unwrap();
//! let sync = Signature::builder()
//!     .optional("tag", TypeTag::List(Box::new(TypeTag::Str)), serde_json::json!([]))
//!     .build()
//!     .unwrap();
//!
//! let command = ComposeBuilder::new(Callable::new("sync", sync, |args: Arguments| {
//!     Ok::<_, CoreError>(args.len())
//! }))
//! .extra(Callable::new("browser", browser, |_args: Arguments| Ok(())))
//! .extra(Callable::new("login", login, |_args: Arguments| Ok(())))
//! .build()
//! .unwrap();
//!
//! let names: Vec<_> = command.signature().names().collect();
//! assert_eq!(names, ["user", "password", "tag", "timeout"]);
//!
//! let args = Arguments::new().with("user", "u").with("password", "p");
//! assert_eq!(command.invoke(&args).unwrap(), 1);
//! ```

pub mod arguments;
pub mod dispatch;
pub mod error;
pub mod merge;
pub mod signature;

// Re-exports for public API
pub use arguments::{Arguments, bind};
pub use dispatch::{
    Callable, ComposeBuilder, Composed, Extra, MergedSignature, Provenance, Source, compose,
};
pub use error::{BindingError, CoreError, CoreResult, SignatureConflict};
pub use merge::merge;
pub use signature::{DefaultValue, ParamKind, Parameter, Signature, SignatureBuilder, TypeTag};
