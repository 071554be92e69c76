//! Call resolution for template-method proxies.
//!
//! A call on a [`TemplateProxy`] is one traversal of a fixed decision tree;
//! nothing persists between calls except what lands in the candidate pools,
//! the member table, and the dispatch cache. In order:
//!
//! 1. fast path: probe the cache with the argument-type fingerprint
//! 2. explicit instantiation, when template arguments were selected
//!    (terminal on failure)
//! 3. known non-templated overloads, implicit conversions allowed
//! 4. known template instantiations, exact argument types only
//! 5. auto-instantiation from inferred argument types, trying object
//!    arguments by reference, by pointer, then by value
//! 6. the low-priority pool
//!
//! Every failed attempt is recorded; the terminal error carries the whole
//! collection so the caller sees each overload that was tried.

use std::rc::Rc;

use crate::callable::make_callable;
use crate::error::{DispatchError, DispatchErrors};
use crate::infer::{ArgPreference, build_prototype};
use crate::members::Member;
use crate::pool::{Overload, OverloadRef};
use crate::proxy::TemplateProxy;
use crate::signature::hash_signature;
use crate::typeinfo::TypeSystem;
use crate::value::Value;

impl TemplateProxy {
    /// Resolve and execute a call with `args`.
    pub fn call(&self, sys: &dyn TypeSystem, args: &[Value]) -> Result<Value, DispatchError> {
        let sighash = hash_signature(args);

        // fast path: a cache hit is an optimization, not a correctness
        // guarantee; a failed cached call falls through to full resolution
        if self.template_args.is_none() {
            let cached = self.ti.borrow().cache.lookup("", sighash);
            if let Some(ol) = cached {
                let mut discarded = DispatchErrors::new();
                if let Some(result) =
                    self.execute_overload(sys, &ol, args, true, "", sighash, &mut discarded)
                {
                    return Ok(result);
                }
            }
        }

        // path 1: explicit template arguments, terminal on failure
        if let Some(targs) = self.template_args.clone() {
            return self.call_explicit(sys, &targs, args, sighash);
        }

        let mut errors = DispatchErrors::new();

        // path 2: known non-templated overloads
        let non_templated = Rc::clone(&self.ti.borrow().non_templated);
        if let Some(result) =
            self.execute_overload(sys, &non_templated, args, true, "", sighash, &mut errors)
        {
            return Ok(result);
        }

        // path 3: known template instantiations, exact types only
        let templated = Rc::clone(&self.ti.borrow().templated);
        if let Some(result) =
            self.execute_overload(sys, &templated, args, false, "", sighash, &mut errors)
        {
            return Ok(result);
        }

        // path 4: auto-instantiation from inferred argument types
        let name = self.ti.borrow().name.clone();
        for pref in [
            ArgPreference::Reference,
            ArgPreference::Pointer,
            ArgPreference::Value,
        ] {
            let (proto, applied) = build_prototype(args, pref);
            match self.instantiate(sys, &name, &proto) {
                Ok(ol) => {
                    if let Some(result) =
                        self.execute_overload(sys, &ol, args, false, "", sighash, &mut errors)
                    {
                        return Ok(result);
                    }
                }
                Err(error) => errors.push(error),
            }
            if applied == 0 {
                // the preference shaped nothing; other preferences would
                // produce the same prototype
                break;
            }
        }

        // path 5: deprioritized overloads
        let low_priority = Rc::clone(&self.ti.borrow().low_priority);
        if let Some(result) =
            self.execute_overload(sys, &low_priority, args, false, "", sighash, &mut errors)
        {
            return Ok(result);
        }

        if errors.is_empty() {
            Err(DispatchError::Unresolvable(name))
        } else {
            Err(DispatchError::ResolutionExhausted(errors))
        }
    }

    /// Explicit-instantiation path. The template arguments fully specify the
    /// request, so implicit argument conversions are allowed, and failure
    /// never falls through to inference.
    fn call_explicit(
        &self,
        sys: &dyn TypeSystem,
        targs: &str,
        args: &[Value],
        sighash: u64,
    ) -> Result<Value, DispatchError> {
        let mut errors = DispatchErrors::new();
        let (name, members) = {
            let ti = self.ti.borrow();
            (ti.name.clone(), Rc::clone(&ti.members))
        };
        let full_name = format!("{name}{targs}");

        // previously stored instantiation under the full name; calling may
        // still fail when specializations exist
        let existing = members.borrow().get(&full_name).cloned();
        if let Some(Member::Overload(ol)) = existing {
            if let Some(result) =
                self.execute_overload(sys, &ol, args, true, targs, sighash, &mut errors)
            {
                return Ok(result);
            }
        }

        let (proto, _) = build_prototype(args, ArgPreference::Value);
        match self.instantiate(sys, &full_name, &proto) {
            Ok(ol) => {
                if let Some(result) =
                    self.execute_overload(sys, &ol, args, true, targs, sighash, &mut errors)
                {
                    return Ok(result);
                }
            }
            Err(error) => errors.push(error),
        }

        Err(DispatchError::ExplicitInstantiationFailed {
            name: full_name,
            errors,
        })
    }

    /// Forward a call to an overload set, recording failures into `errors`.
    ///
    /// A receiver bound on a namespace-scoped method was attached to the
    /// instance a posteriori; it is injected as a leading argument instead of
    /// being bound through the normal channel. Success memoizes the set
    /// under `(key, sighash)`.
    fn execute_overload(
        &self,
        sys: &dyn TypeSystem,
        ol: &OverloadRef,
        args: &[Value],
        allow_implicit: bool,
        key: &str,
        sighash: u64,
        errors: &mut DispatchErrors,
    ) -> Option<Value> {
        let scope = self.ti.borrow().scope;
        let result = {
            let pool = ol.borrow();
            if !pool.has_members() {
                return None;
            }
            match &self.receiver {
                Some(receiver) if sys.is_namespace(scope) => {
                    let mut promoted = Vec::with_capacity(args.len() + 1);
                    promoted.push(receiver.clone());
                    promoted.extend_from_slice(args);
                    pool.call(sys, None, &promoted, allow_implicit, errors)
                }
                _ => pool.call(sys, self.receiver.as_ref(), args, allow_implicit, errors),
            }
        };

        if result.is_some() {
            self.ti
                .borrow_mut()
                .cache
                .update(key, sighash, Rc::clone(ol));
        }
        result
    }

    /// One instantiation attempt: ask the type-information service for a
    /// method matching `requested` and `proto`, wrap it, and register the
    /// result into the member table and pools.
    ///
    /// Registration follows the exact/alias policy: an exact match (the
    /// resolved full name equals the requested name) joins the canonical
    /// templated pool; a partial or typedef'd match is additionally published
    /// under its resolved name, so later lookups by either name succeed, but
    /// stays out of the templated pool to keep aliases from piling up there.
    fn instantiate(
        &self,
        sys: &dyn TypeSystem,
        requested: &str,
        proto: &str,
    ) -> Result<OverloadRef, DispatchError> {
        let (scope, templated, members) = {
            let ti = self.ti.borrow();
            (ti.scope, Rc::clone(&ti.templated), Rc::clone(&ti.members))
        };

        let mut method = sys.find_template_method(scope, requested, proto).ok_or_else(|| {
            DispatchError::LookupMiss {
                name: requested.to_string(),
                proto: proto.to_string(),
            }
        })?;
        let mut resolved = sys.method_full_name(method);

        // an initializer_list is preferred for lookup but must not leak into
        // the registered types; retry with vector and take a distinct result
        if resolved.contains("initializer_list") {
            let substituted = proto.replace("initializer_list", "vector");
            if let Some(m2) = sys.find_template_method(scope, requested, &substituted) {
                if m2 != method {
                    method = m2;
                    resolved = sys.method_full_name(method);
                }
            }
        }

        let exact = requested == resolved;
        let callable = make_callable(sys, scope, method);

        let occupant = members.borrow().get(requested).cloned();
        let target = match occupant {
            // unknown member kind: leave well alone
            Some(Member::Foreign(_)) => {
                return Err(DispatchError::AmbiguousMember {
                    name: requested.to_string(),
                });
            }
            // pre-existing overload that failed as such, or whose full
            // templated name was first constructed in this call
            Some(Member::Overload(existing)) => {
                existing.borrow_mut().adopt(callable.clone());
                existing
            }
            // the requested name is this template itself; the fresh overload
            // set is used for the call but not published over it
            Some(Member::Template(_)) => {
                let mut ol = Overload::new(requested);
                ol.adopt(callable.clone());
                ol.into_ref()
            }
            None => {
                let mut ol = Overload::new(requested);
                ol.adopt(callable.clone());
                let ol = ol.into_ref();
                members
                    .borrow_mut()
                    .insert(requested.to_string(), Member::Overload(Rc::clone(&ol)));
                ol
            }
        };

        if exact {
            templated.borrow_mut().adopt(callable);
        } else if !members.borrow().contains(&resolved) {
            // aliased request (e.g. a typedef in the template arguments):
            // publish the same overload set under the resolved name too
            members
                .borrow_mut()
                .insert(resolved, Member::Overload(Rc::clone(&target)));
        }

        Ok(target)
    }
}
