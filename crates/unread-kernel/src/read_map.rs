//! The per-user map of topics to last-read replies.

use crate::ids::{ReplyId, TopicId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Topic → last-read reply for one user.
///
/// A topic with no entry has never been read. Entries only move forward
/// through [`ReadMap::advance`]; the mark-all operations are the only
/// paths that rewrite the map wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadMap {
    entries: BTreeMap<TopicId, ReplyId>,
}

impl ReadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-read reply for `topic`, or `None` if the topic was never read.
    pub fn get(&self, topic: TopicId) -> Option<ReplyId> {
        self.entries.get(&topic).copied()
    }

    pub fn contains(&self, topic: TopicId) -> bool {
        self.entries.contains_key(&topic)
    }

    /// Overwrite the entry for `topic`. Returns the previous value.
    ///
    /// Used when hydrating from the persisted string; tracking goes through
    /// [`ReadMap::advance`] instead.
    pub fn insert(&mut self, topic: TopicId, reply: ReplyId) -> Option<ReplyId> {
        self.entries.insert(topic, reply)
    }

    /// Move the entry for `topic` forward to `reply`.
    ///
    /// Never lowers an existing entry. Returns `true` when the stored value
    /// changed.
    pub fn advance(&mut self, topic: TopicId, reply: ReplyId) -> bool {
        match self.entries.get_mut(&topic) {
            Some(current) if *current >= reply => false,
            Some(current) => {
                *current = reply;
                true
            }
            None => {
                self.entries.insert(topic, reply);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending topic order.
    pub fn iter(&self) -> impl Iterator<Item = (TopicId, ReplyId)> + '_ {
        self.entries.iter().map(|(topic, reply)| (*topic, *reply))
    }
}

impl FromIterator<(TopicId, ReplyId)> for ReadMap {
    /// Later pairs for the same topic overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = (TopicId, ReplyId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
