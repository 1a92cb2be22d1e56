// ============================================================================
// notesync-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for signature composition and dispatch
//
// Three families of failure exist. Signature conflicts and dispatch
// configuration errors are raised while a command is being registered and
// are fatal to that registration. Binding errors are raised per invocation.
// Failures of the composed callables never pass through this type; they are
// returned to the caller unchanged in the integrator's own error type.

use thiserror::Error;

use crate::signature::ParamKind;

/// Reason a signature could not be constructed or merged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureConflict {
    #[error("duplicate parameter name `{0}`")]
    DuplicateName(String),

    #[error("parameter `{name}` of kind {kind} follows a parameter of kind {previous}")]
    KindOrder {
        name: String,
        kind: ParamKind,
        previous: ParamKind,
    },

    #[error("more than one {kind} parameter: `{first}` and `{second}`")]
    VariadicConflict {
        kind: ParamKind,
        first: String,
        second: String,
    },

    #[error("variadic parameter `{0}` cannot have a default value")]
    VariadicDefault(String),

    #[error("required parameter `{required}` follows parameter `{optional}` which has a default")]
    RequiredAfterOptional { required: String, optional: String },
}

/// Reason a set of supplied arguments could not be bound to a signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("missing required argument `{0}`")]
    MissingArgument(String),
}

/// Errors produced by the core library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Signature conflict: {0}")]
    SignatureConflict(#[from] SignatureConflict),

    #[error(
        "Dispatch configuration error: parameter `{name}` has kind {kind}, \
         which cannot be split between composed callables"
    )]
    DispatchConfiguration { name: String, kind: ParamKind },

    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),
}

/// Result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
