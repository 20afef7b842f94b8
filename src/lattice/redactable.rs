// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Semilattice;

/// `Unset < Data(_) < Redacted`. Once redacted, the data never comes back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redactable<T> {
    #[default]
    Unset,
    Data(T),
    Redacted,
}

impl<T> Redactable<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(value) => Some(value),
            Self::Unset | Self::Redacted => None,
        }
    }

    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::Data(_) => 1,
            Self::Redacted => 2,
        }
    }
}

/// Two different payloads resolve to the larger one so every replica picks
/// the same winner.
impl<T: Ord> Semilattice for Redactable<T> {
    fn join_assign(&mut self, other: Redactable<T>) {
        let replace = match (&*self, &other) {
            (Self::Data(mine), Self::Data(theirs)) => theirs > mine,
            _ => other.rank() > self.rank(),
        };
        if replace {
            *self = other;
        }
    }
}

impl<T: Ord> PartialOrd for Redactable<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Data(mine), Self::Data(theirs)) => Some(mine.cmp(theirs)),
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }
}
