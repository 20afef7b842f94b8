// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Join-semilattices and the building blocks used to compose them.
//!
//! A type's lattice order is its `PartialOrd` impl. Every impl in this module
//! keeps `a <= a.join(b)` and `b <= a.join(b)`, and for `Other = Self` the
//! join is commutative, associative and idempotent.

use std::cmp::Ordering;

mod guarded;
mod map;
mod max;
mod redactable;
mod set;

pub use guarded::GuardedPair;
pub use map::Map;
pub use max::Max;
pub use redactable::Redactable;
pub use set::Set;

pub trait Semilattice<Other = Self> {
    /// Replace `self` with the least upper bound of `self` and `other`.
    fn join_assign(&mut self, other: Other);

    fn join(mut self, other: Other) -> Self
    where
        Self: Sized,
    {
        self.join_assign(other);
        self
    }
}

/// Combine per-component comparisons into the product order.
///
/// Mixing `Less` with `Greater`, or any incomparable component, yields `None`.
pub fn partial_ord_helper<const N: usize>(orders: [Option<Ordering>; N]) -> Option<Ordering> {
    let mut acc = Ordering::Equal;
    for order in orders {
        match (acc, order?) {
            (_, Ordering::Equal) => {}
            (Ordering::Equal, next) => acc = next,
            (current, next) if current == next => {}
            _ => return None,
        }
    }
    Some(acc)
}

impl Semilattice for () {
    fn join_assign(&mut self, _other: ()) {}
}

impl Semilattice for bool {
    fn join_assign(&mut self, other: bool) {
        *self |= other;
    }
}

/// `None` is the bottom element.
impl<T: Semilattice> Semilattice for Option<T> {
    fn join_assign(&mut self, other: Option<T>) {
        let Some(other) = other else {
            return;
        };
        match self {
            Some(current) => current.join_assign(other),
            None => *self = Some(other),
        }
    }
}
