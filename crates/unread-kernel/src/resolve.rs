//! Locating the first unread reply of a topic.

use crate::ids::{ReplyId, TopicId};
use crate::read_map::ReadMap;
use crate::store::ContentStore;
use serde::{Deserialize, Serialize};

/// Where a "first unread reply" link should point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum UnreadTarget {
    /// The oldest reply newer than the last-read one.
    Reply(ReplyId),
    /// Nothing newer exists; the last-read reply itself.
    LastRead(ReplyId),
    /// Nothing read and no replies; the topic itself.
    Topic(TopicId),
}

impl UnreadTarget {
    pub fn url(&self, content: &impl ContentStore) -> String {
        match *self {
            UnreadTarget::Reply(reply) | UnreadTarget::LastRead(reply) => content.reply_url(reply),
            UnreadTarget::Topic(topic) => content.topic_url(topic),
        }
    }
}

/// Resolve the first unread reply of `topic`.
///
/// `None` when `topic` is not a topic in `content`.
pub fn first_unread_target(
    topic: TopicId,
    read_map: &ReadMap,
    content: &impl ContentStore,
) -> Option<UnreadTarget> {
    if !content.is_topic(topic.0) {
        return None;
    }
    let baseline = read_map.get(topic).unwrap_or(ReplyId::NONE);
    let target = match content.first_reply_after(topic, baseline) {
        Some(reply) => UnreadTarget::Reply(reply),
        None if baseline == ReplyId::NONE => UnreadTarget::Topic(topic),
        None => UnreadTarget::LastRead(baseline),
    };
    Some(target)
}

/// URL of the first unread reply of `topic`. See [`first_unread_target`].
pub fn first_unread_reply_url(
    topic: TopicId,
    read_map: &ReadMap,
    content: &impl ContentStore,
) -> Option<String> {
    first_unread_target(topic, read_map, content).map(|target| target.url(content))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::ops::Bound::{Excluded, Unbounded};

    /// Minimal content store: topic → reply ids.
    #[derive(Debug, Default)]
    pub(crate) struct FakeForum {
        pub(crate) topics: BTreeMap<TopicId, BTreeSet<ReplyId>>,
    }

    impl FakeForum {
        pub(crate) fn with_topic(mut self, topic: u64, replies: &[u64]) -> Self {
            self.topics.insert(
                TopicId(topic),
                replies.iter().map(|r| ReplyId(*r)).collect(),
            );
            self
        }
    }

    impl ContentStore for FakeForum {
        fn is_topic(&self, post: u64) -> bool {
            self.topics.contains_key(&TopicId(post))
        }

        fn last_reply_id(&self, topic: TopicId) -> ReplyId {
            self.topics
                .get(&topic)
                .and_then(|replies| replies.last().copied())
                .unwrap_or(ReplyId::NONE)
        }

        fn first_reply_after(&self, topic: TopicId, after: ReplyId) -> Option<ReplyId> {
            self.topics
                .get(&topic)?
                .range((Excluded(after), Unbounded))
                .next()
                .copied()
        }

        fn topic_url(&self, topic: TopicId) -> String {
            format!("/t/{topic}/")
        }

        fn reply_url(&self, reply: ReplyId) -> String {
            if self.is_topic(reply.0) {
                return self.topic_url(TopicId(reply.0));
            }
            format!("/r/{reply}")
        }

        fn topics(&self) -> Vec<(TopicId, ReplyId)> {
            self.topics
                .keys()
                .map(|topic| (*topic, self.last_reply_id(*topic)))
                .collect()
        }
    }

    fn read_map(pairs: &[(u64, u64)]) -> ReadMap {
        pairs
            .iter()
            .map(|(t, r)| (TopicId(*t), ReplyId(*r)))
            .collect()
    }

    #[test]
    fn resolves_to_oldest_reply_after_last_read() {
        let forum = FakeForum::default().with_topic(5, &[12, 21, 25, 30]);
        let map = read_map(&[(5, 20)]);

        assert_eq!(
            first_unread_target(TopicId(5), &map, &forum),
            Some(UnreadTarget::Reply(ReplyId(21)))
        );
        assert_eq!(
            first_unread_reply_url(TopicId(5), &map, &forum).as_deref(),
            Some("/r/21")
        );
    }

    #[test]
    fn fully_read_topic_links_last_read_reply() {
        let forum = FakeForum::default().with_topic(5, &[12, 20]);
        let map = read_map(&[(5, 20)]);

        assert_eq!(
            first_unread_target(TopicId(5), &map, &forum),
            Some(UnreadTarget::LastRead(ReplyId(20)))
        );
        assert_eq!(
            first_unread_reply_url(TopicId(5), &map, &forum).as_deref(),
            Some("/r/20")
        );
    }

    #[test]
    fn new_topic_marker_links_back_to_topic() {
        let forum = FakeForum::default().with_topic(5, &[]);
        let map = read_map(&[(5, 5)]);

        assert_eq!(
            first_unread_reply_url(TopicId(5), &map, &forum).as_deref(),
            Some("/t/5/")
        );
    }

    #[test]
    fn never_read_topic_starts_at_first_reply() {
        let forum = FakeForum::default().with_topic(5, &[8, 9]);
        assert_eq!(
            first_unread_target(TopicId(5), &ReadMap::new(), &forum),
            Some(UnreadTarget::Reply(ReplyId(8)))
        );
    }

    #[test]
    fn empty_never_read_topic_links_topic() {
        let forum = FakeForum::default().with_topic(5, &[]);
        assert_eq!(
            first_unread_target(TopicId(5), &ReadMap::new(), &forum),
            Some(UnreadTarget::Topic(TopicId(5)))
        );
    }

    #[test]
    fn non_topic_is_not_applicable() {
        let forum = FakeForum::default().with_topic(5, &[8]);
        assert_eq!(first_unread_target(TopicId(8), &ReadMap::new(), &forum), None);
        assert_eq!(first_unread_reply_url(TopicId(99), &ReadMap::new(), &forum), None);
    }
}
