//! Named argument values and binding against a signature.

use std::collections::BTreeMap;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BindingError;
use crate::signature::{ParamKind, Signature};

/// Name to value mapping passed into and between composed callables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments {
    values: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, returning self for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies out the values whose names are listed. Names without a value
    /// are skipped.
    pub fn select<'a, I>(&self, names: I) -> Arguments
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                self.values
                    .get(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect()
    }

    /// Deserializes all values into a typed struct whose fields match the
    /// parameter names.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        let object: Map<String, Value> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        serde_json::from_value(Value::Object(object))
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.values
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for Arguments {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

/// Resolves supplied values against a signature.
///
/// Every parameter ends up with a value: the supplied one, else its default.
/// A required parameter without a supplied value fails the binding. Variadic
/// parameters default to an empty list or object, and names the signature
/// does not declare are collected into its variadic keyword parameter when
/// one exists, otherwise ignored.
pub fn bind(signature: &Signature, supplied: &Arguments) -> Result<Arguments, BindingError> {
    let mut bound = Arguments::new();
    let mut extra_keywords = Map::new();

    for param in signature {
        let value = match (supplied.get(&param.name), param.kind) {
            (Some(value), _) => value.clone(),
            (None, ParamKind::VariadicPositional) => Value::Array(Vec::new()),
            (None, ParamKind::VariadicKeyword) => Value::Object(Map::new()),
            (None, _) => param
                .default
                .value()
                .cloned()
                .ok_or_else(|| BindingError::MissingArgument(param.name.clone()))?,
        };
        bound.insert(param.name.clone(), value);
    }

    for (name, value) in supplied.iter() {
        if !signature.contains(name) {
            extra_keywords.insert(name.to_string(), value.clone());
        }
    }

    if !extra_keywords.is_empty() {
        let variadic_keyword = signature
            .iter()
            .find(|p| p.kind == ParamKind::VariadicKeyword);
        match variadic_keyword {
            Some(param) if !supplied.contains(&param.name) => {
                bound.insert(param.name.clone(), Value::Object(extra_keywords));
            }
            _ => debug!(
                "Ignoring arguments not declared by the signature: {:?}",
                extra_keywords.keys().collect::<Vec<_>>()
            ),
        }
    }

    Ok(bound)
}
