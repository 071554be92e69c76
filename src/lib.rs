pub mod cache;
pub mod callable;
pub mod dispatch;
pub mod error;
pub mod infer;
pub mod members;
pub mod pool;
pub mod proxy;
pub mod signature;
pub mod typeinfo;
pub mod value;

// Re-export main types
pub mod prelude {
    pub use crate::cache::DispatchCache;
    pub use crate::callable::{Callable, CallableFlags, CallableKind};
    pub use crate::error::{DispatchError, DispatchErrors, InvokeError};
    pub use crate::infer::{ArgPreference, build_prototype, construct_template_args};
    pub use crate::members::{Member, MemberTable, MemberTableRef};
    pub use crate::pool::{Overload, OverloadRef};
    pub use crate::proxy::{TemplateInfo, TemplateProxy};
    pub use crate::signature::{EMPTY_SIGNATURE, hash_signature};
    pub use crate::typeinfo::{MethodId, ScopeId, TypeSystem};
    pub use crate::value::Value;
}
