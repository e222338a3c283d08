use std::collections::HashSet;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::Frozen;

/// An immutable, ordered key → value mapping.
///
/// Keys are unique and keep the order in which they were supplied. Values are [`Frozen`], so
/// the whole subtree is read-only. There is no insertion, removal, or reassignment API:
///
/// ```compile_fail
/// use deepfreeze_types::{Frozen, Record};
///
/// let user = Record::from_entries([("name", Frozen::from("Alice"))]);
/// user.insert("name", Frozen::from("Mallory"));
/// ```
#[derive(Clone)]
pub struct Record(Arc<[(Arc<str>, Frozen)]>);

impl Record {
    /// Build a record from already-frozen entries.
    ///
    /// When a key repeats, the first occurrence wins.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Frozen)>,
    {
        let mut seen: HashSet<Arc<str>> = HashSet::new();
        let mut kept = Vec::new();
        for (key, value) in entries {
            let key: Arc<str> = key.into();
            if seen.insert(Arc::clone(&key)) {
                kept.push((key, value));
            }
        }
        Self(kept.into())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Frozen> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate.as_ref() == key)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_ref())
    }

    pub fn values(&self) -> impl Iterator<Item = &Frozen> {
        self.0.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Frozen)> {
        self.0.iter().map(|(key, value)| (key.as_ref(), value))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Index<&str> for Record {
    type Output = Frozen;

    /// Panics if the key is absent, like map indexing elsewhere in std.
    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("record has no key {key:?}"),
        }
    }
}
