//! The exposed-member table of an owning scope.
//!
//! Newly instantiated callables are published here so they become ordinarily
//! accessible members, and explicit instantiations from earlier calls are
//! rediscovered here before the type-information service is consulted again.
//!
//! The table holds a weak back-reference to template-proxy state: the
//! embedding owns both the proxies and the table, so the table never keeps a
//! proxy alive on its own.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::pool::OverloadRef;
use crate::proxy::TemplateInfo;

/// One named member of a scope.
#[derive(Debug, Clone)]
pub enum Member {
    /// A concrete overload set, invocable directly.
    Overload(OverloadRef),
    /// A template proxy's shared state; holds the pools of a generic method.
    Template(Weak<RefCell<TemplateInfo>>),
    /// A member of an unrecognized kind. The dispatcher never overwrites or
    /// invokes these; the payload describes the kind for diagnostics.
    Foreign(String),
}

/// Name-keyed members of one class or namespace scope.
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    entries: FxHashMap<String, Member>,
}

/// Shared handle to a scope's member table.
pub type MemberTableRef = Rc<RefCell<MemberTable>>;

impl MemberTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> MemberTableRef {
        Rc::new(RefCell::new(self))
    }

    /// Look up a member by name.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.entries.get(name)
    }

    /// Publish (or replace) a member under `name`.
    pub fn insert(&mut self, name: impl Into<String>, member: Member) {
        self.entries.insert(name.into(), member);
    }

    /// Whether a member exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of published members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no member has been published.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Overload;

    #[test]
    fn insert_and_get() {
        let mut table = MemberTable::new();
        assert!(table.is_empty());

        table.insert("f", Member::Overload(Overload::new("f").into_ref()));
        assert!(table.contains("f"));
        assert!(matches!(table.get("f"), Some(Member::Overload(_))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn foreign_members_are_distinguishable() {
        let mut table = MemberTable::new();
        table.insert("f", Member::Foreign("property".into()));
        match table.get("f") {
            Some(Member::Foreign(kind)) => assert_eq!(kind, "property"),
            other => panic!("expected foreign member, got {other:?}"),
        }
    }

    #[test]
    fn insert_replaces() {
        let mut table = MemberTable::new();
        let first = Overload::new("f").into_ref();
        let second = Overload::new("f").into_ref();
        table.insert("f", Member::Overload(Rc::clone(&first)));
        table.insert("f", Member::Overload(Rc::clone(&second)));
        assert_eq!(table.len(), 1);
        match table.get("f") {
            Some(Member::Overload(ol)) => assert!(Rc::ptr_eq(ol, &second)),
            other => panic!("expected overload, got {other:?}"),
        }
    }
}
