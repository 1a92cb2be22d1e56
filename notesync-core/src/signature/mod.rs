//! Parameter descriptors and signatures.
//!
//! A [`Signature`] is the statically declared, ordered list of parameters a
//! command or option group accepts. Signatures are validated on construction
//! and never mutated afterwards; merging produces a new value.

mod builder;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SignatureConflict;

pub use builder::SignatureBuilder;

/// How a parameter may be supplied.
///
/// Variant order is the fixed precedence order used when bucketing the
/// parameters of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VariadicPositional,
    KeywordOnly,
    VariadicKeyword,
}

impl ParamKind {
    /// All kinds in precedence order.
    pub const ALL: [ParamKind; 5] = [
        ParamKind::PositionalOnly,
        ParamKind::PositionalOrKeyword,
        ParamKind::VariadicPositional,
        ParamKind::KeywordOnly,
        ParamKind::VariadicKeyword,
    ];

    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VariadicPositional | ParamKind::VariadicKeyword)
    }

    /// Kinds whose parameters must keep required-before-optional order.
    pub fn is_positional(self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::PositionalOnly => "positional-only",
            ParamKind::PositionalOrKeyword => "positional-or-keyword",
            ParamKind::VariadicPositional => "variadic-positional",
            ParamKind::KeywordOnly => "keyword-only",
            ParamKind::VariadicKeyword => "variadic-keyword",
        };
        f.write_str(name)
    }
}

/// Default state of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// No default: the parameter must be supplied.
    #[default]
    Required,
    /// Placeholder left for a later merge to complete. Until completed the
    /// parameter behaves as required.
    Unspecified,
    /// Concrete default value.
    Value(Value),
}

impl DefaultValue {
    pub fn value(&self) -> Option<&Value> {
        match self {
            DefaultValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, DefaultValue::Unspecified)
    }
}

/// Type tag attached to a parameter.
///
/// The core never interprets it; front ends use it to choose a parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Str,
    Path,
    Choice(Vec<String>),
    List(Box<TypeTag>),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::Int => f.write_str("int"),
            TypeTag::Float => f.write_str("float"),
            TypeTag::Str => f.write_str("str"),
            TypeTag::Path => f.write_str("path"),
            TypeTag::Choice(values) => write!(f, "choice[{}]", values.join("|")),
            TypeTag::List(inner) => write!(f, "list[{inner}]"),
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default)]
    pub default: DefaultValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<TypeTag>,
    /// Help text shown by front ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Environment variable a front end may read the value from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
}

impl Parameter {
    /// Creates a required parameter of the given kind.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: DefaultValue::Required,
            annotation: None,
            help: None,
            env: None,
        }
    }

    /// Creates a required positional-or-keyword parameter, the kind used by
    /// every option a command line exposes.
    pub fn option(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOrKeyword)
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Value(value.into());
        self
    }

    /// Marks the default as a placeholder to be completed by a merge.
    pub fn unspecified(mut self) -> Self {
        self.default = DefaultValue::Unspecified;
        self
    }

    pub fn annotated(mut self, tag: TypeTag) -> Self {
        self.annotation = Some(tag);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env = Some(var.into());
        self
    }

    /// True if a concrete default value exists.
    pub fn has_default(&self) -> bool {
        matches!(self.default, DefaultValue::Value(_))
    }

    pub fn is_required(&self) -> bool {
        !self.has_default()
    }
}

/// Ordered, name-unique collection of parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Builds a signature, checking every validity rule.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, SignatureConflict> {
        validate(&parameters)?;
        Ok(Self { parameters })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::new()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, param) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match param.kind {
                ParamKind::VariadicPositional => f.write_str("*")?,
                ParamKind::VariadicKeyword => f.write_str("**")?,
                _ => {}
            }
            f.write_str(&param.name)?;
            if let Some(tag) = &param.annotation {
                write!(f, ": {tag}")?;
            }
            match &param.default {
                DefaultValue::Required => {}
                DefaultValue::Unspecified => f.write_str(" = ...")?,
                DefaultValue::Value(value) => write!(f, " = {value}")?,
            }
        }
        f.write_str(")")
    }
}

/// Checks the validity rules of a parameter list.
///
/// Positional-only and positional-or-keyword parameters form one positional
/// region in which no required parameter may follow one with a default.
fn validate(parameters: &[Parameter]) -> Result<(), SignatureConflict> {
    let mut seen = HashSet::new();
    let mut previous_kind: Option<ParamKind> = None;
    let mut variadic_positional: Option<&str> = None;
    let mut variadic_keyword: Option<&str> = None;
    let mut last_optional: Option<&str> = None;

    for param in parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(SignatureConflict::DuplicateName(param.name.clone()));
        }

        if let Some(previous) = previous_kind {
            if param.kind < previous {
                return Err(SignatureConflict::KindOrder {
                    name: param.name.clone(),
                    kind: param.kind,
                    previous,
                });
            }
        }
        previous_kind = Some(param.kind);

        match param.kind {
            ParamKind::VariadicPositional | ParamKind::VariadicKeyword => {
                if param.default != DefaultValue::Required {
                    return Err(SignatureConflict::VariadicDefault(param.name.clone()));
                }
                let slot = if param.kind == ParamKind::VariadicPositional {
                    &mut variadic_positional
                } else {
                    &mut variadic_keyword
                };
                if let Some(first) = slot {
                    return Err(SignatureConflict::VariadicConflict {
                        kind: param.kind,
                        first: (*first).to_string(),
                        second: param.name.clone(),
                    });
                }
                *slot = Some(param.name.as_str());
            }
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword => {
                if param.has_default() {
                    last_optional = Some(param.name.as_str());
                } else if let Some(optional) = last_optional {
                    return Err(SignatureConflict::RequiredAfterOptional {
                        required: param.name.clone(),
                        optional: optional.to_string(),
                    });
                }
            }
            ParamKind::KeywordOnly => {}
        }
    }

    Ok(())
}
