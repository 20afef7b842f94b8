// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lattice::{GuardedPair, Map, Max, Redactable, Set};

/// An author. Also used as a git tree entry name, hence [`validate_actor_id`].
pub type ActorId = String;

/// An actor paired with a number that actor chose. See [`local_id`].
pub type MessageId = (ActorId, u64);

pub type Reaction = String;
pub type Tag = String;

/// Low bits of every message and version number reserved for the device.
pub const DEVICE_BITS: u32 = 16;

/// Compose a per-actor number from a sequence and the writing device, so two
/// devices of one actor never mint the same number.
pub fn local_id(sequence: u64, device: u16) -> u64 {
    (sequence << DEVICE_BITS) | u64::from(device)
}

pub fn sequence_of(id: u64) -> u64 {
    id >> DEVICE_BITS
}

pub fn device_of(id: u64) -> u16 {
    (id & ((1 << DEVICE_BITS) - 1)) as u16
}

static ACTOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s/\x00-\x1f\x7f]+$").unwrap());

pub fn validate_actor_id(name: &str) -> Result<()> {
    if name == "." || name == ".." || !ACTOR_ID.is_match(name) {
        return Err(Error::InvalidActorName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Data only the author writes.
#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
pub struct Owned {
    pub titles: GuardedPair<Max<u64>, Set<String>>,
    pub reply_to: Set<MessageId>,
    /// Content versions keyed by [`local_id`].
    pub content: Map<u64, Redactable<String>>,
}

impl Owned {
    pub fn is_thread(&self) -> bool {
        !self.titles.value.is_empty()
    }
}

/// One actor's opinion about some message, possibly someone else's.
#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
pub struct Shared {
    /// Counter modulo 4, see [`TagState`](crate::domain::TagState).
    pub tags: Map<Tag, Max<u64>>,
    /// Counter parity is the vote.
    pub reactions: Map<Reaction, Max<u64>>,
}

/// Everything a single actor has written.
#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
pub struct Slice {
    pub owned: Map<u64, Owned>,
    pub shared: Map<MessageId, Shared>,
}

impl Slice {
    /// One sequence past the highest message number this slice has seen.
    pub fn next_sequence(&self) -> u64 {
        self.owned
            .last_key_value()
            .map(|(id, _)| sequence_of(*id) + 1)
            .unwrap_or(0)
    }
}

#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Root {
    pub inner: Map<ActorId, Slice>,
}

impl Root {
    pub fn slice(&self, actor: &str) -> Option<&Slice> {
        self.inner.get(actor)
    }

    pub fn slice_mut(&mut self, actor: &str) -> &mut Slice {
        self.inner.entry_mut(actor.to_string())
    }
}
