//! Callable wrappers around resolved native methods.
//!
//! Each [`Callable`] wraps one compiled method handle together with the scope
//! it belongs to and the receiver-binding rule its kind implies. Namespace
//! functions and static methods never bind a receiver; instance methods
//! require one; constructors create their own.

use bitflags::bitflags;

use crate::error::InvokeError;
use crate::typeinfo::{MethodId, ScopeId, TypeSystem};
use crate::value::Value;

bitflags! {
    /// Behavioral flags attached to a callable at construction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CallableFlags: u32 {
        /// The call produces a fresh instance owned by the caller.
        const IS_CREATOR = 1 << 0;
        /// The underlying method is a constructor.
        const IS_CONSTRUCTOR = 1 << 1;
        /// Accepts an opaque untyped pointer; routed to the low-priority pool.
        const IS_GREEDY = 1 << 2;
    }
}

/// The receiver-binding kind of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    /// Free function in a namespace scope.
    NamespaceFunction,
    /// Static member of a class scope.
    StaticMethod,
    /// Class constructor.
    Constructor,
    /// Ordinary instance method.
    InstanceMethod,
}

/// One resolved native method, ready to be pooled and invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    /// Receiver-binding kind.
    pub kind: CallableKind,
    /// Owning scope.
    pub scope: ScopeId,
    /// Resolved method handle.
    pub method: MethodId,
    /// Declared argument signature text.
    pub signature: String,
    /// Const qualification of the underlying method.
    pub is_const: bool,
    /// Behavioral flags.
    pub flags: CallableFlags,
}

impl Callable {
    /// Wrap a resolved method. Constructor kinds receive the creator and
    /// constructor flags; signatures mentioning `void*` are marked greedy.
    pub fn new(
        kind: CallableKind,
        scope: ScopeId,
        method: MethodId,
        signature: impl Into<String>,
        is_const: bool,
    ) -> Self {
        let signature = signature.into();
        let mut flags = CallableFlags::empty();
        if kind == CallableKind::Constructor {
            flags |= CallableFlags::IS_CREATOR | CallableFlags::IS_CONSTRUCTOR;
        }
        if signature.contains("void*") {
            flags |= CallableFlags::IS_GREEDY;
        }
        Self {
            kind,
            scope,
            method,
            signature,
            is_const,
            flags,
        }
    }

    /// Whether invocation binds the receiver the proxy carries.
    pub fn needs_receiver(&self) -> bool {
        matches!(self.kind, CallableKind::InstanceMethod)
    }

    /// Whether this callable is deprioritized into the low-priority pool.
    pub fn is_greedy(&self) -> bool {
        self.flags.contains(CallableFlags::IS_GREEDY)
    }

    /// Execute against the marshaling layer.
    ///
    /// The receiver is bound only for kinds that take one; the binding is
    /// call-scoped, so the wrapper stays unbound in its pool afterwards.
    pub fn invoke(
        &self,
        sys: &dyn TypeSystem,
        receiver: Option<&Value>,
        args: &[Value],
        allow_implicit: bool,
    ) -> Result<Value, InvokeError> {
        match self.kind {
            CallableKind::NamespaceFunction | CallableKind::StaticMethod => {
                sys.invoke(self.method, None, args, allow_implicit)
            }
            CallableKind::Constructor => sys.invoke(self.method, None, args, allow_implicit),
            CallableKind::InstanceMethod => {
                let receiver = receiver.ok_or(InvokeError::MissingReceiver)?;
                sys.invoke(self.method, Some(receiver), args, allow_implicit)
            }
        }
    }
}

/// Classify a resolved method and wrap it in the right callable kind.
pub(crate) fn make_callable(sys: &dyn TypeSystem, scope: ScopeId, method: MethodId) -> Callable {
    let signature = sys.method_signature(method);
    let is_const = sys.is_const_method(method);
    let kind = if sys.is_namespace(scope) {
        CallableKind::NamespaceFunction
    } else if sys.is_static_method(method) {
        CallableKind::StaticMethod
    } else if sys.is_constructor(method) {
        CallableKind::Constructor
    } else {
        CallableKind::InstanceMethod
    };
    Callable::new(kind, scope, method, signature, is_const)
}
