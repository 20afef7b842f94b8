// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use tracing::debug;

use crate::domain::{
    ActorId, MessageId, Owned, Reaction, Slice, Tag, local_id, sequence_of, set_reaction,
    vote_tag_down, vote_tag_up,
};
use crate::error::{Error, Result};
use crate::lattice::{GuardedPair, Map, Max, Redactable, Semilattice, Set};

/// Writes on behalf of one actor from one device.
///
/// Every operation only grows the actor's own [`Slice`], so the result can be
/// joined with any other replica's copy.
#[derive(Debug)]
pub struct Actor<'a> {
    pub id: ActorId,
    pub device: u16,
    pub slice: &'a mut Slice,
}

impl<'a> Actor<'a> {
    pub fn new(slice: &'a mut Slice, id: ActorId, device: u16) -> Self {
        Self { id, device, slice }
    }

    pub fn new_thread(
        &mut self,
        title: String,
        message: String,
        tags: impl IntoIterator<Item = Tag>,
    ) -> MessageId {
        let id = local_id(self.slice.next_sequence(), self.device);

        self.slice.owned.entry_mut(id).join_assign(Owned {
            titles: GuardedPair::new(Max(0), Set::singleton(title)),
            reply_to: Set::default(),
            content: Map::singleton(local_id(0, self.device), Redactable::Data(message)),
        });

        let message_id = (self.id.clone(), id);
        let tags: Vec<Tag> = tags.into_iter().collect();
        if !tags.is_empty() {
            self.adjust_tags(message_id.clone(), tags, []);
        }

        debug!(actor = %self.id, id, "new thread");
        message_id
    }

    pub fn reply(&mut self, parent: MessageId, message: String) -> MessageId {
        let id = local_id(self.slice.next_sequence(), self.device);

        self.slice.owned.entry_mut(id).join_assign(Owned {
            titles: GuardedPair::default(),
            reply_to: Set::singleton(parent),
            content: Map::singleton(local_id(0, self.device), Redactable::Data(message)),
        });

        debug!(actor = %self.id, id, "reply");
        (self.id.clone(), id)
    }

    /// Adds a content version one sequence past the latest observed one and
    /// returns its number.
    pub fn edit(&mut self, id: u64, message: String) -> Result<u64> {
        let device = self.device;
        let owned = self.own_message(id)?;

        let version = local_id(
            owned
                .content
                .last_key_value()
                .map(|(v, _)| sequence_of(*v) + 1)
                .unwrap_or(0),
            device,
        );
        owned
            .content
            .entry_mut(version)
            .join_assign(Redactable::Data(message));

        debug!(id, version, "edit");
        Ok(version)
    }

    /// Hides one content version for good.
    pub fn redact(&mut self, id: u64, version: u64) -> Result<()> {
        let owned = self.own_message(id)?;
        if !owned.content.contains_key(&version) {
            return Err(Error::VersionNotFound { id, version });
        }

        owned
            .content
            .entry_mut(version)
            .join_assign(Redactable::Redacted);

        debug!(id, version, "redact");
        Ok(())
    }

    /// Replaces the title set of one of this actor's threads.
    pub fn retitle(&mut self, id: u64, title: String) -> Result<()> {
        let owned = self.own_message(id)?;
        if !owned.is_thread() {
            return Err(Error::MessageNotFound { id });
        }

        let guard = Max(owned.titles.guard.0 + 1);
        owned
            .titles
            .join_assign(GuardedPair::new(guard, Set::singleton(title)));

        debug!(id, guard = guard.0, "retitle");
        Ok(())
    }

    /// Withdrawing a reaction that was never given leaves the slice untouched.
    pub fn react(&mut self, id: MessageId, reaction: Reaction, on: bool) {
        let absent = self
            .slice
            .shared
            .get(&id)
            .is_none_or(|shared| !shared.reactions.contains_key(&reaction));
        if absent && !on {
            return;
        }

        let counter = self
            .slice
            .shared
            .entry_mut(id)
            .reactions
            .entry_mut(reaction);
        set_reaction(counter, on);
    }

    pub fn adjust_tags(
        &mut self,
        id: MessageId,
        add: impl IntoIterator<Item = Tag>,
        remove: impl IntoIterator<Item = Tag>,
    ) {
        let add: Vec<Tag> = add.into_iter().collect();
        let remove: Vec<Tag> = remove.into_iter().collect();
        if add.is_empty() && remove.is_empty() {
            return;
        }

        let tags = &mut self.slice.shared.entry_mut(id).tags;
        for tag in add {
            vote_tag_up(tags.entry_mut(tag));
        }
        for tag in remove {
            vote_tag_down(tags.entry_mut(tag));
        }
    }

    fn own_message(&mut self, id: u64) -> Result<&mut Owned> {
        if !self.slice.owned.contains_key(&id) {
            return Err(Error::MessageNotFound { id });
        }
        Ok(self.slice.owned.entry_mut(id))
    }
}
