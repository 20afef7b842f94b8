// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::{Deserialize, Serialize};

use crate::domain::ActorId;
use crate::lattice::{Map, Max};

/// Every actor's monotone counter; the counter modulo `N` is that actor's
/// current choice. `N` must be non-zero.
#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Vote<const N: usize>(pub Map<ActorId, Max<u64>>);

impl<const N: usize> Vote<N> {
    pub fn single(actor: ActorId, counter: Max<u64>) -> Self {
        Vote(Map::singleton(actor, counter))
    }

    /// Number of actors currently holding each choice.
    pub fn aggregate(&self) -> [usize; N] {
        let mut counts = [0; N];
        for counter in self.0.values() {
            counts[(counter.0 % N as u64) as usize] += 1;
        }
        counts
    }
}

/// A tag counter modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    Neutral,
    Positive,
    Negative,
    Invalid,
}

impl TagState {
    pub fn of(counter: Max<u64>) -> Self {
        match counter.0 % 4 {
            0 => Self::Neutral,
            1 => Self::Positive,
            2 => Self::Negative,
            _ => Self::Invalid,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Neutral => 0,
            Self::Positive => 1,
            Self::Negative => 2,
            Self::Invalid => 3,
        }
    }
}

/// Advance `counter` to the next value in `Positive` state.
pub fn vote_tag_up(counter: &mut Max<u64>) {
    counter.0 += match TagState::of(*counter) {
        TagState::Neutral => 1,
        TagState::Positive => 0,
        TagState::Negative => 3,
        TagState::Invalid => 2,
    };
}

/// Advance `counter` to the next value in `Negative` state.
pub fn vote_tag_down(counter: &mut Max<u64>) {
    counter.0 += match TagState::of(*counter) {
        TagState::Neutral => 2,
        TagState::Positive => 1,
        TagState::Negative => 0,
        TagState::Invalid => 3,
    };
}

/// Make the counter's parity match `on`.
pub fn set_reaction(counter: &mut Max<u64>, on: bool) {
    if counter.0 % 2 != u64::from(on) {
        counter.0 += 1;
    }
}
