// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    ActorId, MessageId, Owned, Reaction, Root, Shared, Tag, TagState, Vote,
};
use crate::lattice::{GuardedPair, Map, Max, Redactable, Semilattice, Set};

#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
pub struct Thread {
    pub titles: GuardedPair<Max<u64>, Set<String>>,
    pub tags: Map<Tag, Vote<4>>,
}

#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
pub struct Comment {
    pub reply_to: Set<MessageId>,
    pub content: Map<u64, Redactable<String>>,
    pub reactions: Map<Reaction, Vote<2>>,
    /// Replies pointing at this message.
    pub backrefs: Set<MessageId>,
}

impl Comment {
    /// Text of the latest version, or a marker when there is none to show.
    pub fn body(&self) -> &str {
        match self.content.last_key_value() {
            Some((_, Redactable::Data(text))) => text,
            Some((_, Redactable::Redacted)) => "[redacted]",
            Some((_, Redactable::Unset)) | None => "[not yet synced]",
        }
    }

    pub fn is_edited(&self) -> bool {
        self.content.len() > 1
    }

    /// Reactions with at least one active vote, and how many.
    pub fn active_reactions(&self) -> impl Iterator<Item = (&Reaction, usize)> {
        self.reactions
            .iter()
            .map(|(reaction, vote)| (reaction, vote.aggregate()[1]))
            .filter(|(_, count)| *count > 0)
    }
}

impl Thread {
    /// Positive minus negative votes per tag, keeping only tags above zero.
    pub fn tag_scores(&self) -> Vec<(&Tag, i64)> {
        self.tags
            .iter()
            .map(|(tag, vote)| {
                let counts = vote.aggregate();
                let score = counts[TagState::Positive.index()] as i64
                    - counts[TagState::Negative.index()] as i64;
                (tag, score)
            })
            .filter(|(_, score)| *score > 0)
            .collect()
    }
}

/// Read-side view of a [`Root`]: threads with aggregated tags, and comments
/// linked both ways.
#[derive(
    Clone, Default, Debug, PartialEq, crate::Semilattice, Serialize, Deserialize,
)]
pub struct Detailed {
    pub threads: Map<ActorId, Map<u64, Thread>>,
    pub messages: Map<ActorId, Map<u64, Comment>>,
}

impl Semilattice<Root> for Detailed {
    fn join_assign(&mut self, other: Root) {
        for (actor, slice) in other.inner {
            for (
                id,
                Owned {
                    titles,
                    reply_to,
                    content,
                },
            ) in slice.owned
            {
                if !titles.value.is_empty() {
                    self.threads
                        .entry_mut(actor.clone())
                        .entry_mut(id)
                        .titles
                        .join_assign(titles);
                }
                for (parent_author, parent_id) in &reply_to {
                    self.messages
                        .entry_mut(parent_author.clone())
                        .entry_mut(*parent_id)
                        .backrefs
                        .insert((actor.clone(), id));
                }
                self.messages
                    .entry_mut(actor.clone())
                    .entry_mut(id)
                    .join_assign(Comment {
                        reply_to,
                        content,
                        reactions: Map::default(),
                        backrefs: Set::default(),
                    });
            }

            for ((author, id), Shared { tags, reactions }) in slice.shared {
                if !reactions.is_empty() {
                    let votes: Map<Reaction, Vote<2>> = reactions
                        .into_iter()
                        .map(|(reaction, counter)| (reaction, Vote::single(actor.clone(), counter)))
                        .collect();
                    self.messages
                        .entry_mut(author.clone())
                        .entry_mut(id)
                        .reactions
                        .join_assign(votes);
                }

                if !tags.is_empty() {
                    let votes: Map<Tag, Vote<4>> = tags
                        .into_iter()
                        .map(|(tag, counter)| (tag, Vote::single(actor.clone(), counter)))
                        .collect();
                    self.threads
                        .entry_mut(author)
                        .entry_mut(id)
                        .tags
                        .join_assign(votes);
                }
            }
        }
    }
}

impl From<Root> for Detailed {
    fn from(root: Root) -> Self {
        Detailed::default().join(root)
    }
}

impl Detailed {
    pub fn comment(&self, id: &MessageId) -> Option<&Comment> {
        self.messages.get(&id.0)?.get(&id.1)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn fmt_message(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: &MessageId,
        depth: usize,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let Some(comment) = self.comment(id) else {
            return writeln!(f, "{indent}{}/{}: [not yet synced]", id.0, id.1);
        };

        write!(f, "{indent}{}/{}: {}", id.0, id.1, comment.body())?;
        if comment.is_edited() {
            write!(f, " (edited)")?;
        }
        let reactions: Vec<String> = comment
            .active_reactions()
            .map(|(reaction, count)| format!("{reaction}: {count}"))
            .collect();
        if !reactions.is_empty() {
            write!(f, " [{}]", reactions.join(", "))?;
        }
        writeln!(f)
    }
}

/// Threads ordered by author then id, each followed by its reply tree.
impl fmt::Display for Detailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (author, threads) in &self.threads {
            for (id, thread) in threads {
                // Tag votes can arrive before the thread itself.
                if thread.titles.value.is_empty() {
                    continue;
                }
                if !first {
                    writeln!(f)?;
                }
                first = false;

                let titles: Vec<&str> = thread.titles.value.iter().map(String::as_str).collect();
                writeln!(f, "== {} ==", titles.join(" / "))?;

                let scores = thread.tag_scores();
                if !scores.is_empty() {
                    let tags: Vec<String> = scores
                        .iter()
                        .map(|(tag, score)| format!("{tag} ({score})"))
                        .collect();
                    writeln!(f, "tags: {}", tags.join(", "))?;
                }

                let mut seen = BTreeSet::new();
                let mut stack = vec![(0, (author.clone(), *id))];
                while let Some((depth, message)) = stack.pop() {
                    if !seen.insert(message.clone()) {
                        continue;
                    }
                    self.fmt_message(f, &message, depth)?;

                    if let Some(comment) = self.comment(&message) {
                        stack.extend(
                            comment
                                .backrefs
                                .iter()
                                .rev()
                                .map(|reply| (depth + 1, reply.clone())),
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
