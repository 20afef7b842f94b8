// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Semilattice;

/// Pointwise join of lattice values. A missing key is the bottom element.
///
/// Serialized as a sequence of `[key, value]` pairs so non-string keys
/// survive formats like JSON.
///
/// Equality and order are structural: a key holding the bottom value still
/// counts as present, so such a map is `Greater` than (and `!=`) the same
/// map without the key. Writers avoid storing bottom values for that reason.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Map<K, V> {
    inner: BTreeMap<K, V>,
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V: Semilattice> Map<K, V> {
    pub fn singleton(key: K, value: V) -> Self {
        let mut inner = BTreeMap::new();
        inner.insert(key, value);
        Self { inner }
    }

    /// Mutable access to the value at `key`, starting from the bottom element.
    pub fn entry_mut(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.inner.entry(key).or_default()
    }

    /// Join `value` into whatever is stored at `key`.
    pub fn join_at(&mut self, key: K, value: V) {
        match self.inner.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => slot.get_mut().join_assign(value),
        }
    }
}

impl<K, V> Deref for Map<K, V> {
    type Target = BTreeMap<K, V>;

    fn deref(&self) -> &BTreeMap<K, V> {
        &self.inner
    }
}

impl<K: Ord, V: Semilattice> Semilattice for Map<K, V> {
    fn join_assign(&mut self, other: Map<K, V>) {
        if self.inner.is_empty() {
            self.inner = other.inner;
            return;
        }
        for (key, value) in other.inner {
            self.join_at(key, value);
        }
    }
}

impl<K: Ord, V: PartialOrd> PartialOrd for Map<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut acc = Ordering::Equal;
        let mut fold = |next: Ordering| -> Option<()> {
            match (acc, next) {
                (_, Ordering::Equal) => {}
                (Ordering::Equal, next) => acc = next,
                (current, next) if current == next => {}
                _ => return None,
            }
            Some(())
        };

        for (key, value) in &self.inner {
            match other.inner.get(key) {
                Some(theirs) => fold(value.partial_cmp(theirs)?)?,
                None => fold(Ordering::Greater)?,
            }
        }
        if other.inner.keys().any(|key| !self.inner.contains_key(key)) {
            fold(Ordering::Less)?;
        }

        Some(acc)
    }
}

impl<K: Ord, V: Semilattice> From<BTreeMap<K, V>> for Map<K, V> {
    fn from(inner: BTreeMap<K, V>) -> Self {
        Self { inner }
    }
}

/// Duplicate keys are joined rather than overwritten.
impl<K: Ord, V: Semilattice> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::default();
        for (key, value) in iter {
            map.join_at(key, value);
        }
        map
    }
}

impl<K, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = std::collections::btree_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::collections::btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Map<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.inner.iter())
    }
}

impl<'de, K, V> Deserialize<'de> for Map<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de> + Semilattice,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for PairsVisitor<K, V>
        where
            K: Deserialize<'de> + Ord,
            V: Deserialize<'de> + Semilattice,
        {
            type Value = Map<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence of [key, value] pairs")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut map = Map::default();
                while let Some((key, value)) = seq.next_element::<(K, V)>()? {
                    map.join_at(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_seq(PairsVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Max;

    fn map(pairs: &[(u8, u32)]) -> Map<u8, Max<u32>> {
        pairs.iter().map(|&(k, v)| (k, Max(v))).collect()
    }

    #[test]
    fn join_is_pointwise() {
        let joined = map(&[(1, 5), (2, 1)]).join(map(&[(2, 7), (3, 0)]));
        assert_eq!(joined, map(&[(1, 5), (2, 7), (3, 0)]));
    }

    #[test]
    fn entry_mut_starts_at_bottom() {
        let mut m: Map<&str, Max<u64>> = Map::default();
        assert_eq!(*m.entry_mut("a"), Max(0));
        m.entry_mut("a").0 += 2;
        assert_eq!(m.get("a"), Some(&Max(2)));
    }

    #[test]
    fn extra_keys_make_a_map_greater() {
        let small = map(&[(1, 1)]);
        let big = map(&[(1, 1), (2, 0)]);
        assert!(small < big);
        assert!(big > small);
    }

    #[test]
    fn diverging_values_are_incomparable() {
        let a = map(&[(1, 5), (2, 0)]);
        let b = map(&[(1, 0), (2, 5)]);
        assert_eq!(a.partial_cmp(&b), None);
        assert_eq!(map(&[(1, 1)]).partial_cmp(&map(&[(2, 1)])), None);
    }

    #[test]
    fn collecting_duplicates_joins_them() {
        let m = map(&[(1, 3), (1, 9), (1, 4)]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&1), Some(&Max(9)));
    }

    #[test]
    fn serializes_as_pairs() {
        let m: Map<(String, u64), Max<u64>> =
            Map::singleton(("alice".to_string(), 65536), Max(3));
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"[[["alice",65536],3]]"#);

        let back: Map<(String, u64), Max<u64>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn deserializing_duplicates_joins_them() {
        let m: Map<u8, Max<u32>> = serde_json::from_str("[[1,2],[1,8],[2,1]]").unwrap();
        assert_eq!(m, map(&[(1, 8), (2, 1)]));
    }
}
