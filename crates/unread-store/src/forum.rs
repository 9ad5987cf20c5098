//! Forum post index: topics, their replies, and permalinks.
//!
//! Loaded from a JSONL file of posts, one per line:
//!
//! ```text
//! {"id":5,"kind":"topic","slug":"spring-ride","title":"Spring ride"}
//! {"id":21,"kind":"reply","parent":5}
//! ```

use crate::jsonl::{JsonlError, read_records_from_path};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};
use std::path::Path;
use unread_kernel::{ContentStore, ReplyId, TopicId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Topic,
    Reply,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub kind: PostKind,
    /// Parent topic; required for replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

impl Post {
    pub fn topic(id: u64, slug: &str) -> Self {
        Self {
            id,
            kind: PostKind::Topic,
            parent: None,
            slug: slug.to_string(),
            title: String::new(),
        }
    }

    pub fn reply(id: u64, parent: u64) -> Self {
        Self {
            id,
            kind: PostKind::Reply,
            parent: Some(parent),
            slug: String::new(),
            title: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("duplicate post id: {0}")]
    DuplicatePost(u64),

    #[error("reply {0} has no parent topic")]
    MissingParent(u64),

    #[error("reply {reply} points at unknown topic {parent}")]
    OrphanReply { reply: u64, parent: u64 },
}

#[derive(Debug, Clone, Default)]
struct TopicEntry {
    slug: String,
    title: String,
    replies: BTreeSet<ReplyId>,
}

/// Topics and replies indexed for first-unread range queries.
#[derive(Debug, Clone, Default)]
pub struct ForumStore {
    base_url: String,
    topics: BTreeMap<TopicId, TopicEntry>,
    reply_parents: BTreeMap<ReplyId, TopicId>,
}

impl ForumStore {
    /// Index `posts`. Topics may appear after their replies.
    pub fn from_posts(posts: Vec<Post>, base_url: impl Into<String>) -> Result<Self, ForumError> {
        let mut store = Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        };

        let mut seen = BTreeSet::new();
        for post in &posts {
            if !seen.insert(post.id) {
                return Err(ForumError::DuplicatePost(post.id));
            }
        }

        for post in posts.iter().filter(|p| p.kind == PostKind::Topic) {
            store.topics.insert(
                TopicId(post.id),
                TopicEntry {
                    slug: post.slug.clone(),
                    title: post.title.clone(),
                    replies: BTreeSet::new(),
                },
            );
        }

        for post in posts.iter().filter(|p| p.kind == PostKind::Reply) {
            let parent = TopicId(post.parent.ok_or(ForumError::MissingParent(post.id))?);
            let entry = store.topics.get_mut(&parent).ok_or(ForumError::OrphanReply {
                reply: post.id,
                parent: parent.0,
            })?;
            entry.replies.insert(ReplyId(post.id));
            store.reply_parents.insert(ReplyId(post.id), parent);
        }

        tracing::debug!(
            topics = store.topics.len(),
            replies = store.reply_parents.len(),
            "indexed forum posts"
        );
        Ok(store)
    }

    pub fn load_jsonl(
        path: impl AsRef<Path>,
        base_url: impl Into<String>,
    ) -> Result<Self, ForumError> {
        let posts: Vec<Post> = read_records_from_path(path)?;
        Self::from_posts(posts, base_url)
    }

    pub fn topic_title(&self, topic: TopicId) -> Option<&str> {
        self.topics.get(&topic).map(|entry| entry.title.as_str())
    }

    /// Replies of `topic` in ascending id order; rendering order.
    pub fn replies(&self, topic: TopicId) -> Vec<ReplyId> {
        self.topics
            .get(&topic)
            .map(|entry| entry.replies.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn parent_of(&self, reply: ReplyId) -> Option<TopicId> {
        self.reply_parents.get(&reply).copied()
    }
}

impl ContentStore for ForumStore {
    fn is_topic(&self, post: u64) -> bool {
        self.topics.contains_key(&TopicId(post))
    }

    fn last_reply_id(&self, topic: TopicId) -> ReplyId {
        self.topics
            .get(&topic)
            .and_then(|entry| entry.replies.last().copied())
            .unwrap_or(ReplyId::NONE)
    }

    fn first_reply_after(&self, topic: TopicId, after: ReplyId) -> Option<ReplyId> {
        self.topics
            .get(&topic)?
            .replies
            .range((Excluded(after), Unbounded))
            .next()
            .copied()
    }

    fn topic_url(&self, topic: TopicId) -> String {
        let slug = self
            .topics
            .get(&topic)
            .map(|entry| entry.slug.as_str())
            .filter(|slug| !slug.is_empty());
        match slug {
            Some(slug) => format!("{}/topic/{slug}/", self.base_url),
            None => format!("{}/topic/{topic}/", self.base_url),
        }
    }

    fn reply_url(&self, reply: ReplyId) -> String {
        if self.is_topic(reply.0) {
            return self.topic_url(TopicId(reply.0));
        }
        match self.parent_of(reply) {
            Some(topic) => format!("{}#post-{reply}", self.topic_url(topic)),
            None => format!("{}/reply/{reply}/", self.base_url),
        }
    }

    fn topics(&self) -> Vec<(TopicId, ReplyId)> {
        self.topics
            .keys()
            .map(|topic| (*topic, self.last_reply_id(*topic)))
            .collect()
    }
}
