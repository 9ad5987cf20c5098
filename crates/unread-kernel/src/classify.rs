//! Read/unread classification of a topic for display.

use crate::config::DisplayConfig;
use crate::ids::{ReplyId, TopicId};
use crate::read_map::ReadMap;
use serde::{Deserialize, Serialize};

/// Display flags for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicClass {
    /// The user has never opened the topic.
    pub unread_topic: bool,
    /// The topic has replies newer than the user's last-read reply.
    pub unread_replies: bool,
}

impl TopicClass {
    pub fn is_read(&self) -> bool {
        !self.unread_topic && !self.unread_replies
    }

    /// Class names to attach to the rendered topic.
    pub fn css_classes<'a>(&self, display: &'a DisplayConfig) -> Vec<&'a str> {
        let mut classes = Vec::new();
        if self.unread_topic {
            classes.push(display.unread_topic_class.as_str());
        }
        if self.unread_replies {
            classes.push(display.unread_replies_class.as_str());
        }
        classes
    }
}

/// Classify `topic` whose newest reply is `last_reply`.
///
/// A missing entry sits below every real reply, so a never-read topic with
/// replies gets both flags. `ReplyId::NONE` means the topic has no replies
/// and never sets `unread_replies`.
pub fn classify(topic: TopicId, last_reply: ReplyId, read_map: &ReadMap) -> TopicClass {
    let last_read = read_map.get(topic);
    TopicClass {
        unread_topic: last_read.is_none(),
        unread_replies: match last_read {
            Some(read) => read < last_reply,
            // No entry ranks below every real reply but not below "no reply".
            None => last_reply > ReplyId::NONE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_map(pairs: &[(u64, u64)]) -> ReadMap {
        pairs
            .iter()
            .map(|(t, r)| (TopicId(*t), ReplyId(*r)))
            .collect()
    }

    #[test]
    fn never_read_topic_is_unread_on_both_counts() {
        let class = classify(TopicId(1), ReplyId(10), &ReadMap::new());
        assert_eq!(
            class,
            TopicClass {
                unread_topic: true,
                unread_replies: true
            }
        );
    }

    #[test]
    fn caught_up_topic_is_read() {
        let class = classify(TopicId(1), ReplyId(10), &read_map(&[(1, 10)]));
        assert!(class.is_read());
    }

    #[test]
    fn partially_read_topic_has_unread_replies_only() {
        let class = classify(TopicId(1), ReplyId(10), &read_map(&[(1, 5)]));
        assert_eq!(
            class,
            TopicClass {
                unread_topic: false,
                unread_replies: true
            }
        );
    }

    #[test]
    fn empty_never_read_topic_is_only_an_unread_topic() {
        let class = classify(TopicId(1), ReplyId::NONE, &ReadMap::new());
        assert!(class.unread_topic);
        assert!(!class.unread_replies);
    }

    #[test]
    fn css_classes_follow_display_config() {
        let display = DisplayConfig::default();
        let class = classify(TopicId(1), ReplyId(10), &ReadMap::new());
        assert_eq!(
            class.css_classes(&display),
            vec!["unread-topic", "unread-replies"]
        );
        assert!(TopicClass::default().css_classes(&display).is_empty());
    }
}
