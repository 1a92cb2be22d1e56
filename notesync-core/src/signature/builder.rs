// ============================================================================
// notesync-core/src/signature/builder.rs
// ============================================================================
//
// SIGNATURE BUILDER: Builder Pattern for Signature
//
// Option groups and commands declare their parameters once, at registration
// time. The builder gives those declarations a fluent form and defers all
// validation to `build`, so a malformed declaration surfaces as a single
// `SignatureConflict` at startup.

use serde_json::Value;

use super::{ParamKind, Parameter, Signature, TypeTag};
use crate::error::SignatureConflict;

/// Builder for creating Signature instances.
///
/// # Examples
///
/// ```rust
/// use notesync_core::signature::{SignatureBuilder, TypeTag};
///
/// let signature = SignatureBuilder::new()
///     .required("user_id", TypeTag::Str)
///     .optional("browser_timeout_seconds", TypeTag::Int, 10)
///     .build()
///     .unwrap();
///
/// assert_eq!(signature.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureBuilder {
    parameters: Vec<Parameter>,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fully described parameter.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends a required positional-or-keyword parameter.
    pub fn required(self, name: &str, tag: TypeTag) -> Self {
        self.param(Parameter::option(name).annotated(tag))
    }

    /// Appends a positional-or-keyword parameter with a default value.
    pub fn optional(self, name: &str, tag: TypeTag, default: impl Into<Value>) -> Self {
        self.param(Parameter::option(name).annotated(tag).with_default(default))
    }

    /// Appends a keyword-only parameter, optionally with a default.
    pub fn keyword_only(self, name: &str, tag: TypeTag, default: Option<Value>) -> Self {
        let param = Parameter::new(name, ParamKind::KeywordOnly).annotated(tag);
        match default {
            Some(value) => self.param(param.with_default(value)),
            None => self.param(param),
        }
    }

    /// Validates the collected parameters and builds the signature.
    pub fn build(self) -> Result<Signature, SignatureConflict> {
        Signature::new(self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let sig = SignatureBuilder::new()
            .required("a", TypeTag::Str)
            .optional("b", TypeTag::Int, 3)
            .keyword_only("c", TypeTag::Bool, Some(json!(false)))
            .keyword_only("d", TypeTag::Str, None)
            .build()
            .unwrap();

        assert_eq!(sig.names().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(sig.get("c").unwrap().kind, ParamKind::KeywordOnly);
        assert!(sig.get("d").unwrap().is_required());
    }

    #[test]
    fn test_builder_reports_invalid_order() {
        let result = SignatureBuilder::new()
            .optional("b", TypeTag::Int, 3)
            .required("a", TypeTag::Str)
            .build();

        assert!(matches!(
            result,
            Err(SignatureConflict::RequiredAfterOptional { .. })
        ));
    }
}
