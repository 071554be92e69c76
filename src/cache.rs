//! Memoization of successful resolutions.
//!
//! Keyed by the explicit template-argument string (empty when the call was
//! resolved purely from argument types) and the 64-bit argument-type
//! fingerprint. Entries under one template-argument key never answer lookups
//! under another, so an explicit instantiation can't masquerade as an
//! inferred one or vice versa.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::pool::OverloadRef;

/// Per-proxy map from (template-args key, signature fingerprint) to the
/// overload set that last succeeded for that key.
#[derive(Debug, Clone, Default)]
pub struct DispatchCache {
    map: FxHashMap<String, Vec<(u64, OverloadRef)>>,
}

impl DispatchCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the overload memoized for this key pair, if any.
    pub fn lookup(&self, template_args: &str, sighash: u64) -> Option<OverloadRef> {
        self.map
            .get(template_args)?
            .iter()
            .find(|(hash, _)| *hash == sighash)
            .map(|(_, ol)| Rc::clone(ol))
    }

    /// Memoize an overload under this key pair, replacing any previous entry.
    pub fn update(&mut self, template_args: &str, sighash: u64, overload: OverloadRef) {
        let entries = self.map.entry(template_args.to_string()).or_default();
        for entry in entries.iter_mut() {
            if entry.0 == sighash {
                entry.1 = overload;
                return;
            }
        }
        entries.push((sighash, overload));
    }

    /// Total number of live entries across all keys.
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// True when nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
