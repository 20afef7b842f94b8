// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Semilattice;

/// Lexicographic product: a strictly greater guard discards the other value.
///
/// Bumping the guard is how an owner replaces a value instead of adding to it.
/// When the guards are incomparable their join is strictly above both, so
/// the value restarts from the bottom element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardedPair<G, V> {
    pub guard: G,
    pub value: V,
}

impl<G, V> GuardedPair<G, V> {
    pub fn new(guard: G, value: V) -> Self {
        Self { guard, value }
    }
}

impl<G, V> Semilattice for GuardedPair<G, V>
where
    G: Semilattice + PartialOrd,
    V: Semilattice + Default,
{
    fn join_assign(&mut self, other: GuardedPair<G, V>) {
        match self.guard.partial_cmp(&other.guard) {
            Some(Ordering::Greater) => {}
            Some(Ordering::Less) => *self = other,
            Some(Ordering::Equal) => self.value.join_assign(other.value),
            None => {
                self.guard.join_assign(other.guard);
                self.value = V::default();
            }
        }
    }
}

impl<G: PartialOrd, V: PartialOrd> PartialOrd for GuardedPair<G, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.guard.partial_cmp(&other.guard)? {
            Ordering::Equal => self.value.partial_cmp(&other.value),
            decided => Some(decided),
        }
    }
}
