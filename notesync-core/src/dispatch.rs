// ============================================================================
// notesync-core/src/dispatch.rs
// ============================================================================
//
// COMPOSITION DISPATCHER: One entry point over several declared callables
//
// A command is a primary callable plus an ordered list of extra callables
// (option groups). `compose` folds every extra signature into the primary's
// with `merge`, records which callable declared which parameter, and
// precomputes the routing table used to split bound arguments at call time.
//
// KEY COMPONENTS:
// - Callable: a declared signature plus the closure that receives its slice
//   of the arguments
// - Extra: a callable attached as an option group, with its drop set
// - MergedSignature: the externally visible signature and its provenance
// - Composed: the entry point; `invoke` binds, runs every extra in attachment
//   order, then runs the primary and returns its result
//
// Dispatch is not transactional: once the first extra has run, a failing
// extra aborts the remaining ones and the primary, and nothing is rolled back.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::arguments::{Arguments, bind};
use crate::error::{CoreError, CoreResult};
use crate::merge::merge;
use crate::signature::{ParamKind, Signature};

type CallFn<T, E> = dyn Fn(Arguments) -> Result<T, E> + Send + Sync;

/// A declared signature together with the code that consumes it.
pub struct Callable<T, E> {
    name: String,
    signature: Signature,
    func: Arc<CallFn<T, E>>,
}

impl<T, E> Callable<T, E> {
    pub fn new<F>(name: impl Into<String>, signature: Signature, func: F) -> Self
    where
        F: Fn(Arguments) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn call(&self, args: Arguments) -> Result<T, E> {
        (self.func)(args)
    }
}

impl<T, E> Clone for Callable<T, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            signature: self.signature.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<T, E> fmt::Debug for Callable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// An option group attached to a command.
///
/// Names in the drop set are neither exposed in the merged signature nor
/// passed to the callable.
#[derive(Debug, Clone)]
pub struct Extra<E> {
    callable: Callable<(), E>,
    drop: BTreeSet<String>,
}

impl<E> Extra<E> {
    pub fn new(callable: Callable<(), E>) -> Self {
        Self {
            callable,
            drop: BTreeSet::new(),
        }
    }

    pub fn dropping<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn callable(&self) -> &Callable<(), E> {
        &self.callable
    }

    pub fn drop_set(&self) -> &BTreeSet<String> {
        &self.drop
    }

    fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.callable
            .signature()
            .names()
            .filter(|name| !self.drop.contains(*name))
    }
}

impl<E> From<Callable<(), E>> for Extra<E> {
    fn from(callable: Callable<(), E>) -> Self {
        Self::new(callable)
    }
}

/// Identifies one of the callables that make up a composed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Primary,
    /// Index into the attached extras, in attachment order.
    Extra(usize),
}

/// Which callables declared each parameter of a merged signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    owners: BTreeMap<String, BTreeSet<Source>>,
}

impl Provenance {
    fn record(&mut self, name: &str, source: Source) {
        self.owners.entry(name.to_string()).or_default().insert(source);
    }

    /// Callables that declared `name`.
    pub fn sources(&self, name: &str) -> Option<&BTreeSet<Source>> {
        self.owners.get(name)
    }

    pub fn is_declared_by(&self, name: &str, source: Source) -> bool {
        self.owners
            .get(name)
            .is_some_and(|sources| sources.contains(&source))
    }
}

/// Externally visible signature of a composed command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSignature {
    signature: Signature,
    provenance: Provenance,
    primary: String,
    extras: Vec<String>,
}

impl MergedSignature {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Name of the callable behind `source`.
    pub fn source_name(&self, source: Source) -> Option<&str> {
        match source {
            Source::Primary => Some(self.primary.as_str()),
            Source::Extra(index) => self.extras.get(index).map(String::as_str),
        }
    }

    /// Parameters declared by `source`, in merged order.
    pub fn declared_by(&self, source: Source) -> Vec<String> {
        self.signature
            .names()
            .filter(|name| self.provenance.is_declared_by(name, source))
            .map(str::to_string)
            .collect()
    }
}

/// A primary callable composed with its option groups.
pub struct Composed<R, E> {
    primary: Callable<R, E>,
    extras: Vec<Callable<(), E>>,
    merged: MergedSignature,
    primary_route: Vec<String>,
    extra_routes: Vec<Vec<String>>,
}

impl<R, E> Composed<R, E> {
    pub fn name(&self) -> &str {
        self.primary.name()
    }

    pub fn merged_signature(&self) -> &MergedSignature {
        &self.merged
    }

    pub fn signature(&self) -> &Signature {
        self.merged.signature()
    }
}

impl<R, E> Composed<R, E>
where
    E: From<CoreError>,
{
    /// Binds `args` and replays them into every composed callable.
    ///
    /// Binding failures are returned before any callable runs. Errors from
    /// the callables are returned unchanged.
    pub fn invoke(&self, args: &Arguments) -> Result<R, E> {
        let bound = bind(self.merged.signature(), args).map_err(CoreError::from)?;

        for (extra, route) in self.extras.iter().zip(&self.extra_routes) {
            debug!("Running option group `{}` for `{}`", extra.name(), self.name());
            extra.call(bound.select(route.iter().map(String::as_str)))?;
        }

        debug!("Running command `{}`", self.name());
        self.primary
            .call(bound.select(self.primary_route.iter().map(String::as_str)))
    }
}

impl<R, E> fmt::Debug for Composed<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composed")
            .field("primary", &self.primary)
            .field("extras", &self.extras)
            .field("merged", &self.merged)
            .finish_non_exhaustive()
    }
}

/// Composes `primary` with `extras`, merging signatures in attachment order.
///
/// Fails if a merge conflicts, or if the merged signature keeps a
/// positional-only or variadic parameter: those cannot be split back out by
/// name.
pub fn compose<R, E>(primary: Callable<R, E>, extras: Vec<Extra<E>>) -> CoreResult<Composed<R, E>> {
    let mut signature = primary.signature().clone();
    let mut provenance = Provenance::default();

    for name in primary.signature().names() {
        provenance.record(name, Source::Primary);
    }

    for (index, extra) in extras.iter().enumerate() {
        signature = merge(&signature, extra.callable.signature(), &extra.drop)?;
        for name in extra.declared_names() {
            provenance.record(name, Source::Extra(index));
        }
    }

    let unsupported = signature.iter().find(|p| {
        matches!(
            p.kind,
            ParamKind::PositionalOnly | ParamKind::VariadicPositional | ParamKind::VariadicKeyword
        )
    });
    if let Some(param) = unsupported {
        return Err(CoreError::DispatchConfiguration {
            name: param.name.clone(),
            kind: param.kind,
        });
    }

    let merged = MergedSignature {
        signature,
        provenance,
        primary: primary.name().to_string(),
        extras: extras.iter().map(|e| e.callable.name().to_string()).collect(),
    };

    let primary_route = merged.declared_by(Source::Primary);
    let extra_routes = (0..extras.len())
        .map(|index| merged.declared_by(Source::Extra(index)))
        .collect();

    info!(
        "Composed `{}` with {} option group(s): {}",
        primary.name(),
        extras.len(),
        merged.signature()
    );

    Ok(Composed {
        primary,
        extras: extras.into_iter().map(|e| e.callable).collect(),
        merged,
        primary_route,
        extra_routes,
    })
}

/// Builder for creating Composed instances.
///
/// # Examples
///
/// ```rust
/// use notesync_core::{Arguments, Callable, ComposeBuilder, CoreError, Signature};
/// use notesync_core::signature::TypeTag;
///
/// let timeout = Signature::builder()
///     .optional("timeout", TypeTag::Int, 10)
///     .build()
///     .unwrap();
/// let group = Callable::new("timeout", timeout, |_args: Arguments| Ok::<(), CoreError>(()));
/// let command = Callable::new("run", Signature::empty(), |_args: Arguments| {
///     Ok::<_, CoreError>(42)
/// });
///
/// let composed = ComposeBuilder::new(command).extra(group).build().unwrap();
/// assert_eq!(composed.invoke(&Arguments::new()).unwrap(), 42);
/// ```
#[derive(Debug)]
pub struct ComposeBuilder<R, E> {
    primary: Callable<R, E>,
    extras: Vec<Extra<E>>,
}

impl<R, E> ComposeBuilder<R, E> {
    pub fn new(primary: Callable<R, E>) -> Self {
        Self {
            primary,
            extras: Vec::new(),
        }
    }

    /// Attaches an option group.
    pub fn extra(self, callable: Callable<(), E>) -> Self {
        self.attach(Extra::new(callable))
    }

    /// Attaches an option group, hiding the listed parameters.
    pub fn extra_dropping<I, S>(self, callable: Callable<(), E>, drop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attach(Extra::new(callable).dropping(drop))
    }

    pub fn attach(mut self, extra: Extra<E>) -> Self {
        self.extras.push(extra);
        self
    }

    pub fn build(self) -> CoreResult<Composed<R, E>> {
        compose(self.primary, self.extras)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Parameter;
    use serde_json::json;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<(String, Arguments)>>>;

    fn recorder(name: &str, signature: Signature, log: &Log) -> Callable<(), CoreError> {
        let log = Arc::clone(log);
        let label = name.to_string();
        Callable::new(name, signature, move |args| {
            log.lock().unwrap().push((label.clone(), args));
            Ok(())
        })
    }

    #[test]
    fn test_provenance_records_shared_names() {
        let log: Log = Arc::default();
        let primary = recorder(
            "primary",
            Signature::new(vec![Parameter::option("shared")]).unwrap(),
            &log,
        );
        let extra = recorder(
            "extra",
            Signature::new(vec![Parameter::option("shared"), Parameter::option("own")]).unwrap(),
            &log,
        );

        let composed = compose(primary, vec![Extra::new(extra)]).unwrap();
        let merged = composed.merged_signature();

        assert_eq!(
            merged.provenance().sources("shared"),
            Some(&BTreeSet::from([Source::Primary, Source::Extra(0)]))
        );
        assert_eq!(merged.declared_by(Source::Extra(0)), vec!["shared", "own"]);
        assert_eq!(merged.source_name(Source::Extra(0)), Some("extra"));
        assert_eq!(merged.source_name(Source::Extra(1)), None);

        composed
            .invoke(&Arguments::new().with("shared", 1).with("own", 2))
            .unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls[0].1, Arguments::new().with("shared", 1).with("own", 2));
        assert_eq!(calls[1].1, Arguments::new().with("shared", 1));
    }

    #[test]
    fn test_unsupported_kinds_rejected() {
        for kind in [
            ParamKind::PositionalOnly,
            ParamKind::VariadicPositional,
            ParamKind::VariadicKeyword,
        ] {
            let log: Log = Arc::default();
            let primary = recorder("primary", Signature::empty(), &log);
            let extra = recorder(
                "extra",
                Signature::new(vec![Parameter::new("p", kind)]).unwrap(),
                &log,
            );

            let err = compose(primary, vec![Extra::new(extra)]).unwrap_err();
            assert_eq!(
                err,
                CoreError::DispatchConfiguration {
                    name: "p".to_string(),
                    kind,
                }
            );
        }
    }

    #[test]
    fn test_keyword_only_is_supported() {
        let log: Log = Arc::default();
        let primary = recorder(
            "primary",
            Signature::new(vec![Parameter::new("k", ParamKind::KeywordOnly).with_default(json!("x"))])
                .unwrap(),
            &log,
        );

        let composed = ComposeBuilder::new(primary).build().unwrap();
        composed.invoke(&Arguments::new()).unwrap();

        assert_eq!(log.lock().unwrap()[0].1, Arguments::new().with("k", "x"));
    }

    #[test]
    fn test_composed_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Composed<String, CoreError>>();
    }
}
