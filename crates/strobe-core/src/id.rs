//! Strongly-typed identifiers for cycles, nodes, and edges.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Absolute index of one execution cycle of the automaton.
///
/// Cycle 0 is the first symbol of the input stream. Cycles are never
/// negative; "nothing stepped yet" is modelled as `Option<CycleId>::None`
/// by the playback cursor rather than as a sentinel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(pub u64);

impl CycleId {
    /// Offset this cycle by a signed delta.
    ///
    /// Returns `None` if the result would be negative or overflow.
    pub fn offset(self, delta: i64) -> Option<CycleId> {
        self.0.checked_add_signed(delta).map(CycleId)
    }

    /// The cycle immediately after this one.
    pub fn next(self) -> CycleId {
        CycleId(self.0.saturating_add(1))
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CycleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

macro_rules! shared_str_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(v: &str) -> Self {
                Self(Arc::from(v))
            }
        }

        impl From<String> for $name {
            fn from(v: String) -> Self {
                Self(Arc::from(v))
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

shared_str_id! {
    /// Identifies a state-transition element (node) in the automaton graph.
    ///
    /// Backed by `Arc<str>`, so cloning into delta sets and report maps
    /// is a reference-count bump. Hashes and compares like the underlying
    /// string, which lets maps keyed by `NodeId` be queried with `&str`.
    NodeId
}

shared_str_id! {
    /// Identifies a directed transition (edge) between two nodes.
    EdgeId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn cycle_offset_rejects_negative() {
        assert_eq!(CycleId(3).offset(-3), Some(CycleId(0)));
        assert_eq!(CycleId(3).offset(-4), None);
        assert_eq!(CycleId(3).offset(7), Some(CycleId(10)));
        assert_eq!(CycleId(u64::MAX).offset(1), None);
    }

    #[test]
    fn node_id_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(NodeId::from("_1_2"), 7u32);
        assert_eq!(map.get("_1_2"), Some(&7));
        assert_eq!(NodeId::new("_1_2").to_string(), "_1_2");
    }

    #[test]
    fn ids_clone_share_storage() {
        let a = EdgeId::from("e0");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.as_str(), "e0");
    }
}
