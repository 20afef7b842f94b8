// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::Semilattice;

/// Grow-only set ordered by inclusion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de> + Ord"
))]
pub struct Set<T> {
    inner: BTreeSet<T>,
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self {
            inner: BTreeSet::new(),
        }
    }
}

impl<T: Ord> Set<T> {
    pub fn singleton(value: T) -> Self {
        let mut inner = BTreeSet::new();
        inner.insert(value);
        Self { inner }
    }

    /// Returns `true` if the value was not already present.
    pub fn insert(&mut self, value: T) -> bool {
        self.inner.insert(value)
    }
}

impl<T> Deref for Set<T> {
    type Target = BTreeSet<T>;

    fn deref(&self) -> &BTreeSet<T> {
        &self.inner
    }
}

impl<T: Ord> Semilattice for Set<T> {
    fn join_assign(&mut self, other: Set<T>) {
        if self.inner.is_empty() {
            self.inner = other.inner;
        } else {
            self.inner.extend(other.inner);
        }
    }
}

impl<T: Ord> PartialOrd for Set<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (
            self.inner.is_subset(&other.inner),
            other.inner.is_subset(&self.inner),
        ) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<T: Ord> From<BTreeSet<T>> for Set<T> {
    fn from(inner: BTreeSet<T>) -> Self {
        Self { inner }
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_union() {
        let a: Set<u8> = [1, 2].into_iter().collect();
        let b: Set<u8> = [2, 3].into_iter().collect();
        let joined = a.join(b);
        assert_eq!(joined.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn ordered_by_inclusion() {
        let small = Set::singleton(1u8);
        let big: Set<u8> = [1, 2].into_iter().collect();
        let other = Set::singleton(3u8);

        assert!(small < big);
        assert!(big > small);
        assert_eq!(small.partial_cmp(&other), None);
        assert_eq!(small.partial_cmp(&small.clone()), Some(Ordering::Equal));
    }

    #[test]
    fn insert_reports_novelty() {
        let mut s = Set::default();
        assert!(s.insert("a"));
        assert!(!s.insert("a"));
        assert_eq!(s.len(), 1);
    }
}
