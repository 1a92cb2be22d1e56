// ============================================================================
// notesync-core/src/merge.rs
// ============================================================================
//
// SIGNATURE MERGE: Folding one signature into another
//
// `merge` extends a base signature (usually a command's own parameters) with
// an incoming one (usually an option group's parameters):
//
// - base parameters come first, incoming parameters are appended in their
//   declared order unless their name is in the drop set
// - a name present in both keeps the base declaration; an unspecified
//   default, a missing annotation, help text or env var on the base side is
//   completed from the incoming side
// - the result is re-bucketed by kind, and inside the positional buckets
//   parameters with a default move after those without (stable)
//
// The result is validated like any other signature, so two different
// variadics of the same kind, or a required positional left behind an
// optional one, surface as a SignatureConflict.

use std::collections::BTreeSet;

use log::{debug, trace};

use crate::error::CoreResult;
use crate::signature::{Parameter, Signature};

/// Merges `incoming` into `base`, ignoring incoming parameters named in `drop`.
///
/// Merge order matters: base parameters keep precedence over newly
/// introduced parameters of the same kind bucket.
pub fn merge(base: &Signature, incoming: &Signature, drop: &BTreeSet<String>) -> CoreResult<Signature> {
    let mut parameters: Vec<Parameter> = base.parameters().to_vec();

    for param in incoming {
        if drop.contains(&param.name) {
            trace!("Dropping incoming parameter `{}`", param.name);
            continue;
        }

        match parameters.iter_mut().find(|existing| existing.name == param.name) {
            Some(existing) => complete(existing, param),
            None => parameters.push(param.clone()),
        }
    }

    // Stable: ties keep base-then-incoming order.
    parameters.sort_by_key(|p| (p.kind, p.kind.is_positional() && p.has_default()));

    let merged = Signature::new(parameters)?;
    debug!("Merged {} into {}: {}", incoming, base, merged);
    Ok(merged)
}

/// Fills the parts of a base parameter that its declaration left open.
fn complete(existing: &mut Parameter, incoming: &Parameter) {
    if existing.default.is_unspecified() {
        existing.default = incoming.default.clone();
    }
    if existing.annotation.is_none() {
        existing.annotation = incoming.annotation.clone();
    }
    if existing.help.is_none() {
        existing.help = incoming.help.clone();
    }
    if existing.env.is_none() {
        existing.env = incoming.env.clone();
    }
}
