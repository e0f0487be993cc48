//! Parent/folder filters for flat listings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which containment level a listing is restricted to.
///
/// `Root` and `Any` are distinct: `Root` matches only entries with no
/// parent, `Any` matches every entry of the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum ParentFilter {
    /// Entries without a parent folder.
    Root,
    /// Entries directly inside the given folder.
    In(Uuid),
    /// Every entry regardless of parent.
    Any,
}

impl ParentFilter {
    /// Build a filter from an optional parent id (`None` means root).
    pub fn from_parent(parent_id: Option<Uuid>) -> Self {
        match parent_id {
            Some(id) => Self::In(id),
            None => Self::Root,
        }
    }

    /// Check whether an entry with the given parent matches this filter.
    pub fn matches(&self, parent_id: Option<Uuid>) -> bool {
        match self {
            Self::Root => parent_id.is_none(),
            Self::In(id) => parent_id == Some(*id),
            Self::Any => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_any_are_distinct() {
        let id = Uuid::new_v4();
        assert!(ParentFilter::Root.matches(None));
        assert!(!ParentFilter::Root.matches(Some(id)));
        assert!(ParentFilter::Any.matches(None));
        assert!(ParentFilter::Any.matches(Some(id)));
        assert!(ParentFilter::In(id).matches(Some(id)));
        assert!(!ParentFilter::In(id).matches(None));
        assert!(!ParentFilter::In(id).matches(Some(Uuid::new_v4())));
    }

    #[test]
    fn test_from_parent() {
        let id = Uuid::new_v4();
        assert_eq!(ParentFilter::from_parent(None), ParentFilter::Root);
        assert_eq!(ParentFilter::from_parent(Some(id)), ParentFilter::In(id));
    }
}
