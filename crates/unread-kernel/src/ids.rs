//! Identifiers for users, topics, and replies.
//!
//! Forum posts share one numeric id space: topics and replies are both
//! posts, and reply ids grow with recency. Every comparison in this crate
//! leans on that ordering.

use serde::{Deserialize, Serialize};

/// Identifier of the user a session acts for.
///
/// `UserId::ANONYMOUS` (0) means nobody is signed in; read-state tracking
/// is skipped entirely for that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    pub const ANONYMOUS: UserId = UserId(0);

    pub fn is_authenticated(self) -> bool {
        self != Self::ANONYMOUS
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a topic post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u64);

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a reply post.
///
/// `ReplyId::NONE` (0) stands for "no reply": the last reply of an empty
/// topic, or the resolver baseline of a never-read topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(pub u64);

impl ReplyId {
    pub const NONE: ReplyId = ReplyId(0);

    /// The opening post of a topic, counted as the topic's zeroth reply.
    pub fn opening_post(topic: TopicId) -> Self {
        Self(topic.0)
    }
}

impl std::fmt::Display for ReplyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
