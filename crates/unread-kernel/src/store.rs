//! Seams to the surrounding forum system.
//!
//! The kernel owns neither the persisted read-map strings nor the forum
//! posts. Backends implement these traits; `unread-store` ships a memory and
//! a JSONL flavor of each.

use crate::error::StoreError;
use crate::ids::{ReplyId, TopicId, UserId};

/// Per-user persistence of the encoded read map.
///
/// Callers never pass `UserId::ANONYMOUS`; the session short-circuits
/// before reaching the store.
pub trait ReadMapStore {
    /// The stored string for `user`, or the empty string if none exists.
    fn load_read_map_string(&self, user: UserId) -> Result<String, StoreError>;

    /// Replace the stored string for `user`.
    fn save_read_map_string(&mut self, user: UserId, encoded: &str) -> Result<(), StoreError>;
}

impl<T: ReadMapStore + ?Sized> ReadMapStore for &mut T {
    fn load_read_map_string(&self, user: UserId) -> Result<String, StoreError> {
        (**self).load_read_map_string(user)
    }

    fn save_read_map_string(&mut self, user: UserId, encoded: &str) -> Result<(), StoreError> {
        (**self).save_read_map_string(user, encoded)
    }
}

/// Read-only view of forum topics and replies.
pub trait ContentStore {
    /// Whether `post` names a topic (as opposed to a reply or nothing).
    fn is_topic(&self, post: u64) -> bool;

    /// Most recent reply of `topic`; `ReplyId::NONE` when it has none.
    fn last_reply_id(&self, topic: TopicId) -> ReplyId;

    /// Smallest reply id of `topic` strictly greater than `after`.
    fn first_reply_after(&self, topic: TopicId, after: ReplyId) -> Option<ReplyId>;

    /// Permalink of `topic`.
    fn topic_url(&self, topic: TopicId) -> String;

    /// URL of `reply`. A topic id yields that topic's permalink.
    fn reply_url(&self, reply: ReplyId) -> String;

    /// Every topic with its last reply, in ascending topic order.
    fn topics(&self) -> Vec<(TopicId, ReplyId)>;
}
