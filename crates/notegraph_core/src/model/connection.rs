//! Derived connection model.
//!
//! # Responsibility
//! - Represent one inferred, weighted and explained relation between notes.
//! - Provide the canonical pair key that deduplicates undirected pairs.
//!
//! # Invariants
//! - `PairKey::low < PairKey::high` for every key built by `PairKey::new`.
//! - A `ConnectionSet` holds zero or one connection per pair.
//! - Connections are never persisted; they are rebuilt from snapshots.

use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{Display, Formatter};

/// Separator used in the string form of a pair key.
pub const PAIR_KEY_SEPARATOR: char = '|';

/// Canonical, order-independent key for an unordered note pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PairKey {
    pub low: String,
    pub high: String,
}

impl PairKey {
    /// Builds the canonical key for two ids regardless of argument order.
    ///
    /// Returns `None` for self-pairs.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                low: a.to_string(),
                high: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                low: b.to_string(),
                high: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns whether either endpoint equals `id`.
    pub fn touches(&self, id: &str) -> bool {
        self.low == id || self.high == id
    }
}

impl Display for PairKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.low, PAIR_KEY_SEPARATOR, self.high)
    }
}

/// Heuristic tier that produced a connection, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTier {
    SharedTags,
    RelatedTags,
    Keywords,
}

/// One inferred relation between two notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub key: PairKey,
    /// Relation weight in `[0, 1]`.
    pub strength: f64,
    /// Human-readable explanation.
    pub reason: String,
    pub tier: ConnectionTier,
}

impl Connection {
    pub fn source(&self) -> &str {
        &self.key.low
    }

    pub fn target(&self) -> &str {
        &self.key.high
    }
}

/// Deduplicated connection map keyed by canonical pair.
///
/// Iteration order is the `PairKey` order, so two sets built from the same
/// snapshot compare and iterate identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSet {
    entries: BTreeMap<PairKey, Connection>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a connection unless its pair already has one.
    ///
    /// Returns `false` when the pair was already present.
    pub fn insert(&mut self, connection: Connection) -> bool {
        match self.entries.entry(connection.key.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(connection);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Looks up the connection between two ids in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<&Connection> {
        PairKey::new(a, b).and_then(|key| self.entries.get(&key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.entries.values()
    }

    /// Connections that have `id` as one endpoint.
    pub fn touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.entries.values().filter(move |conn| conn.key.touches(id))
    }
}

impl<'a> IntoIterator for &'a ConnectionSet {
    type Item = &'a Connection;
    type IntoIter = btree_map::Values<'a, PairKey, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{Connection, ConnectionSet, ConnectionTier, PairKey};

    fn connection(a: &str, b: &str, strength: f64) -> Connection {
        Connection {
            key: PairKey::new(a, b).unwrap(),
            strength,
            reason: "Related tags".to_string(),
            tier: ConnectionTier::RelatedTags,
        }
    }

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(PairKey::new("b", "a"), PairKey::new("a", "b"));
        assert_eq!(PairKey::new("a", "b").unwrap().to_string(), "a|b");
        assert!(PairKey::new("a", "a").is_none());
    }

    #[test]
    fn pair_key_separator_prevents_concatenation_collisions() {
        let left = PairKey::new("a", "bc").unwrap();
        let right = PairKey::new("ab", "c").unwrap();
        assert_ne!(left, right);
        assert_ne!(left.to_string(), right.to_string());
    }

    #[test]
    fn set_keeps_first_connection_per_pair() {
        let mut set = ConnectionSet::new();
        assert!(set.insert(connection("a", "b", 0.5)));
        assert!(!set.insert(connection("b", "a", 0.9)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("b", "a").unwrap().strength, 0.5);
    }

    #[test]
    fn touching_filters_by_endpoint() {
        let mut set = ConnectionSet::new();
        set.insert(connection("a", "b", 0.5));
        set.insert(connection("b", "c", 0.5));
        set.insert(connection("c", "d", 0.5));
        assert_eq!(set.touching("b").count(), 2);
        assert_eq!(set.touching("z").count(), 0);
    }
}
