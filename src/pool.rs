//! Candidate pools of known overloads.
//!
//! An [`Overload`] is an ordered, name-keyed set of callables for one proxy.
//! Each template proxy keeps three of them: non-templated, templated, and
//! low-priority; the resolution paths consult them in that order (see
//! [`crate::proxy::TemplateProxy::call`]).

use std::cell::RefCell;
use std::rc::Rc;

use crate::callable::Callable;
use crate::error::{DispatchError, DispatchErrors};
use crate::typeinfo::TypeSystem;
use crate::value::Value;

/// Shared handle to an overload set. Pools and the dispatch cache share
/// these; a cache entry is always one of the live pool handles.
pub type OverloadRef = Rc<RefCell<Overload>>;

/// An ordered overload set of already-known concrete callables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overload {
    name: String,
    methods: Vec<Callable>,
}

impl Overload {
    /// Create an empty overload set under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> OverloadRef {
        Rc::new(RefCell::new(self))
    }

    /// The name this set was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any callable has been adopted.
    pub fn has_members(&self) -> bool {
        !self.methods.is_empty()
    }

    /// Number of adopted callables.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when no callable has been adopted.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Take ownership of one callable.
    ///
    /// The same resolved method is never held twice under one signature;
    /// anything beyond that identity check is the caller's concern.
    pub fn adopt(&mut self, callable: Callable) {
        let duplicate = self
            .methods
            .iter()
            .any(|m| m.method == callable.method && m.signature == callable.signature);
        if !duplicate {
            self.methods.push(callable);
        }
    }

    /// Move every member of `other` into this set, leaving `other` empty.
    pub fn merge(&mut self, other: &mut Overload) {
        for callable in other.methods.drain(..) {
            self.adopt(callable);
        }
    }

    /// Linear scan for a callable whose declared signature matches `sig`.
    ///
    /// With a constness preference, an exact constness match wins and a
    /// signature-only match is the fallback; without one, the first
    /// signature match in adoption order is returned.
    pub fn find_by_signature(&self, sig: &str, want_const: Option<bool>) -> Option<&Callable> {
        let wanted = sig.trim();
        let mut fallback = None;
        for m in &self.methods {
            if m.signature.trim() == wanted {
                match want_const {
                    None => return Some(m),
                    Some(w) if m.is_const == w => return Some(m),
                    Some(_) => {
                        if fallback.is_none() {
                            fallback = Some(m);
                        }
                    }
                }
            }
        }
        fallback
    }

    /// Declared signatures of all members, in adoption order.
    pub fn signatures(&self) -> Vec<String> {
        self.methods.iter().map(|m| m.signature.clone()).collect()
    }

    /// The adopted callables, in order.
    pub fn methods(&self) -> &[Callable] {
        &self.methods
    }

    /// Try every member in order until one call succeeds.
    ///
    /// Each failure is recorded into `errors` and the next candidate tried;
    /// `None` means the whole set was exhausted.
    pub fn call(
        &self,
        sys: &dyn TypeSystem,
        receiver: Option<&Value>,
        args: &[Value],
        allow_implicit: bool,
        errors: &mut DispatchErrors,
    ) -> Option<Value> {
        for m in &self.methods {
            match m.invoke(sys, receiver, args, allow_implicit) {
                Ok(result) => return Some(result),
                Err(source) => errors.push(DispatchError::CandidateFailed {
                    signature: m.signature.clone(),
                    source,
                }),
            }
        }
        None
    }
}
