//! Template-method proxies and their shared state.
//!
//! A [`TemplateProxy`] is the callable surface for one generic method name on
//! one owning scope. Accessing the method through an instance rebinds the
//! proxy: the new view carries the receiver but shares the same
//! [`TemplateInfo`] record, so every view observes one dispatch cache and one
//! set of candidate pools. Subscript-style selection produces a view carrying
//! an explicit template-argument string, consumed by the explicit resolution
//! path.
//!
//! All shared state is `Rc<RefCell<_>>`: resolution is single-threaded and
//! one call runs to completion before the next begins. An embedding that
//! dispatches from several threads must serialize calls per proxy itself.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cache::DispatchCache;
use crate::callable::{Callable, make_callable};
use crate::error::DispatchError;
use crate::infer::construct_template_args;
use crate::members::{Member, MemberTable, MemberTableRef};
use crate::pool::{Overload, OverloadRef};
use crate::typeinfo::{ScopeId, TypeSystem};
use crate::value::Value;

/// State shared by every view of one generic method: exactly one per
/// (scope, method-name) pair.
#[derive(Debug)]
pub struct TemplateInfo {
    /// The owning class or namespace scope.
    pub scope: ScopeId,
    /// Fully qualified base name of the method, without template arguments.
    pub name: String,
    /// Known concrete (non-templated) overloads; tried with implicit
    /// conversions allowed.
    pub non_templated: OverloadRef,
    /// Known template instantiations; tried with exact argument types only.
    pub templated: OverloadRef,
    /// Deprioritized overloads such as ones taking `void*`.
    pub low_priority: OverloadRef,
    /// Memoized resolutions.
    pub cache: DispatchCache,
    /// The owning scope's exposed-member table.
    pub members: MemberTableRef,
    /// Optional documentation override.
    pub doc: Option<String>,
}

/// A (possibly receiver-bound, possibly template-arg-selected) view of one
/// generic method.
#[derive(Debug, Clone)]
pub struct TemplateProxy {
    pub(crate) receiver: Option<Value>,
    pub(crate) template_args: Option<String>,
    pub(crate) ti: Rc<RefCell<TemplateInfo>>,
}

impl TemplateProxy {
    /// Create the proxy for `name` on `scope` and publish it into the
    /// scope's member table.
    pub fn new(scope: ScopeId, name: impl Into<String>, members: MemberTableRef) -> Self {
        let name = name.into();
        let ti = Rc::new(RefCell::new(TemplateInfo {
            scope,
            name: name.clone(),
            non_templated: Overload::new(&name).into_ref(),
            templated: Overload::new(&name).into_ref(),
            low_priority: Overload::new(&name).into_ref(),
            cache: DispatchCache::new(),
            members: Rc::clone(&members),
            doc: None,
        }));
        members
            .borrow_mut()
            .insert(name, Member::Template(Rc::downgrade(&ti)));
        Self {
            receiver: None,
            template_args: None,
            ti,
        }
    }

    /// Create a proxy with a member table of its own. Convenience for
    /// embeddings that expose a single method per scope.
    pub fn standalone(scope: ScopeId, name: impl Into<String>) -> Self {
        Self::new(scope, name, MemberTable::new().into_ref())
    }

    /// Rebind to a receiver: a shallow view sharing this proxy's state.
    pub fn bind(&self, receiver: Value) -> TemplateProxy {
        TemplateProxy {
            receiver: Some(receiver),
            template_args: self.template_args.clone(),
            ti: Rc::clone(&self.ti),
        }
    }

    /// The unbound view of this proxy.
    pub fn unbound(&self) -> TemplateProxy {
        TemplateProxy {
            receiver: None,
            template_args: self.template_args.clone(),
            ti: Rc::clone(&self.ti),
        }
    }

    /// Subscript-style explicit selection: serialize `type_names` into a
    /// template-argument string and return a view carrying it.
    ///
    /// Selection cannot memoize by itself; instantiations need not be unique
    /// for the given types because of specializations, so resolution still
    /// runs on call.
    pub fn select(&self, type_names: &[&str]) -> TemplateProxy {
        TemplateProxy {
            receiver: self.receiver.clone(),
            template_args: Some(construct_template_args(type_names)),
            ti: Rc::clone(&self.ti),
        }
    }

    /// The fully qualified base name.
    pub fn name(&self) -> String {
        self.ti.borrow().name.clone()
    }

    /// The currently selected template-argument string, if any.
    pub fn template_args(&self) -> Option<String> {
        self.template_args.clone()
    }

    /// The bound receiver, if any.
    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_ref()
    }

    /// Whether two views share one underlying TemplateInfo.
    pub fn shares_state_with(&self, other: &TemplateProxy) -> bool {
        Rc::ptr_eq(&self.ti, &other.ti)
    }

    /// Shared-state handle, for member-table back-references and tests.
    pub fn info(&self) -> Rc<RefCell<TemplateInfo>> {
        Rc::clone(&self.ti)
    }

    /// Adopt one concrete overload of this method. Greedy callables go to
    /// the low-priority pool, everything else to the non-templated pool.
    pub fn adopt_method(&self, callable: Callable) {
        let ti = self.ti.borrow();
        let pool = if callable.is_greedy() {
            &ti.low_priority
        } else {
            &ti.non_templated
        };
        pool.borrow_mut().adopt(callable);
    }

    /// Merge a whole overload set into this proxy, draining `other`.
    /// The destination pool is low-priority when any member is greedy.
    pub fn merge_overload(&self, other: &mut Overload) {
        let any_greedy = other.methods().iter().any(Callable::is_greedy);
        let ti = self.ti.borrow();
        let pool = if any_greedy {
            &ti.low_priority
        } else {
            &ti.non_templated
        };
        pool.borrow_mut().merge(other);
    }

    /// Adopt a known template instantiation into the templated pool.
    pub fn adopt_template(&self, callable: Callable) {
        self.ti.borrow().templated.borrow_mut().adopt(callable);
    }

    /// Documentation: the stored override, else the declared signatures of
    /// every pool member, one per line.
    pub fn doc(&self) -> Option<String> {
        let ti = self.ti.borrow();
        if let Some(doc) = &ti.doc {
            return Some(doc.clone());
        }
        let mut lines = Vec::new();
        for pool in [&ti.non_templated, &ti.templated, &ti.low_priority] {
            lines.extend(pool.borrow().signatures());
        }
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    /// Override the documentation string for every view of this method.
    pub fn set_doc(&self, doc: impl Into<String>) {
        self.ti.borrow_mut().doc = Some(doc.into());
    }

    /// Select one specific overload by signature without executing it.
    ///
    /// The three pools are searched in priority order; when none match, the
    /// type-information service is asked to instantiate for the signature
    /// text. Used for introspection and debugging, never for dispatch.
    pub fn find_overload(
        &self,
        sys: &dyn TypeSystem,
        signature: &str,
        want_const: Option<bool>,
    ) -> Result<OverloadRef, DispatchError> {
        let (scope, name, pools) = {
            let ti = self.ti.borrow();
            (
                ti.scope,
                ti.name.clone(),
                [
                    Rc::clone(&ti.non_templated),
                    Rc::clone(&ti.templated),
                    Rc::clone(&ti.low_priority),
                ],
            )
        };

        for pool in &pools {
            let found = pool.borrow().find_by_signature(signature, want_const).cloned();
            if let Some(callable) = found {
                let mut ol = Overload::new(format!("{name}<{signature}>"));
                ol.adopt(callable);
                return Ok(ol.into_ref());
            }
        }

        let method = sys
            .find_template_method(scope, &name, signature)
            .ok_or_else(|| DispatchError::LookupMiss {
                name: name.clone(),
                proto: signature.to_string(),
            })?;
        let mut ol = Overload::new(format!("{name}<{signature}>"));
        ol.adopt(make_callable(sys, scope, method));
        Ok(ol.into_ref())
    }
}

impl PartialEq for TemplateProxy {
    /// Two proxy views are equal iff they share one TemplateInfo.
    fn eq(&self, other: &Self) -> bool {
        self.shares_state_with(other)
    }
}
