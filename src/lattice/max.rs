// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::{Deserialize, Serialize};

use super::Semilattice;

/// A value that only ever grows.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Max<T>(pub T);

impl<T: Ord> Semilattice for Max<T> {
    fn join_assign(&mut self, other: Max<T>) {
        if other.0 > self.0 {
            self.0 = other.0;
        }
    }
}
