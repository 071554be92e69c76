//! The external type-information and call surface.
//!
//! The dispatcher never inspects the native reflection database or converts
//! values itself; both live behind [`TypeSystem`]. An embedding supplies one
//! implementation covering the reflection queries (method lookup, kind
//! predicates, names) and the marshaling/execution side (`invoke`). All calls
//! are synchronous; the dispatcher holds no locks across them.

use std::fmt;

use crate::error::InvokeError;
use crate::value::Value;

/// Opaque handle to a class or namespace scope in the reflection database.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(pub u64);

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({:#x})", self.0)
    }
}

/// Opaque handle to a compiled (possibly freshly instantiated) method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MethodId(pub u64);

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({:#x})", self.0)
    }
}

/// Reflection queries and native call execution, as consumed by the dispatcher.
pub trait TypeSystem {
    /// Find (instantiating if necessary) a method in `scope` matching `name`
    /// and the argument `proto`. `name` may carry explicit template arguments
    /// (`"sum<int>"`) or be a bare template name (`"sum"`).
    fn find_template_method(&self, scope: ScopeId, name: &str, proto: &str) -> Option<MethodId>;

    /// Fully qualified name of a resolved method, template arguments included.
    fn method_full_name(&self, method: MethodId) -> String;

    /// Declared argument signature text of a resolved method.
    fn method_signature(&self, method: MethodId) -> String;

    /// Whether `scope` is a namespace rather than a class.
    fn is_namespace(&self, scope: ScopeId) -> bool;

    /// Whether `method` is a static member.
    fn is_static_method(&self, method: MethodId) -> bool;

    /// Whether `method` is a constructor.
    fn is_constructor(&self, method: MethodId) -> bool;

    /// Whether `method` is const-qualified.
    fn is_const_method(&self, method: MethodId) -> bool;

    /// Convert `args` (and `receiver`, if the method binds one) and execute.
    ///
    /// `allow_implicit` gates implicit argument conversions: resolution paths
    /// that matched by inferred argument types pass `false`, because an
    /// implicit conversion there could silently select the wrong
    /// instantiation.
    fn invoke(
        &self,
        method: MethodId,
        receiver: Option<&Value>,
        args: &[Value],
        allow_implicit: bool,
    ) -> Result<Value, InvokeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_comparable_and_hashable() {
        use std::collections::HashSet;
        let a = ScopeId(1);
        let b = ScopeId(2);
        assert_ne!(a, b);
        let set: HashSet<MethodId> = [MethodId(1), MethodId(1), MethodId(2)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn handle_debug_formatting() {
        assert_eq!(format!("{:?}", ScopeId(0xff)), "ScopeId(0xff)");
        assert_eq!(format!("{:?}", MethodId(0x10)), "MethodId(0x10)");
    }
}
