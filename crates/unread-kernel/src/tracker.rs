//! Render-time tracking of one topic traversal.
//!
//! ```text
//! Idle ──begin(topic)──▶ InTopic ──visit(reply)*──▶ InTopic ──end()──▶ Idle
//! ```
//!
//! The baseline is the topic's read-map entry at `begin`. Every reply is
//! compared against that snapshot, never against the entry as it moves
//! during the traversal, so the first-unread marker lands on the first reply
//! that was unread when the page started rendering.

use crate::config::DisplayConfig;
use crate::ids::{ReplyId, TopicId};
use crate::read_map::ReadMap;
use serde::{Deserialize, Serialize};

/// Emitted once per traversal for the first reply the user had not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstUnreadMarker {
    pub topic: TopicId,
    pub reply: ReplyId,
}

impl FirstUnreadMarker {
    /// In-page anchor placed before the reply, target of "go to first unread".
    pub fn anchor_html(&self, display: &DisplayConfig) -> String {
        let name = &display.first_unread_anchor;
        format!(r#"<a id="{name}" name="{name}"></a>"#)
    }
}

/// State of the traversal in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    pub topic: TopicId,
    /// Entry for `topic` when the traversal began; `None` if never read.
    pub baseline: Option<ReplyId>,
    pub marker_written: bool,
}

impl Traversal {
    fn is_unread(&self, reply: ReplyId) -> bool {
        self.baseline.is_none_or(|baseline| reply > baseline)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    current: Option<Traversal>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Traversal> {
        self.current.as_ref()
    }

    /// Start traversing `topic`, snapshotting its entry in `read_map`.
    ///
    /// An unfinished traversal is dropped.
    pub fn begin(&mut self, topic: TopicId, read_map: &ReadMap) {
        if let Some(previous) = self.current {
            tracing::warn!(
                previous = %previous.topic,
                next = %topic,
                "topic traversal replaced before it ended"
            );
        }
        let baseline = read_map.get(topic);
        tracing::debug!(%topic, ?baseline, "begin topic traversal");
        self.current = Some(Traversal {
            topic,
            baseline,
            marker_written: false,
        });
    }

    /// Record that `reply` is being rendered.
    ///
    /// Returns the marker when `reply` is the first unread reply of this
    /// traversal. Ignored while idle.
    pub fn visit(&mut self, reply: ReplyId, read_map: &mut ReadMap) -> Option<FirstUnreadMarker> {
        let traversal = self.current.as_mut()?;
        if !traversal.is_unread(reply) {
            return None;
        }

        read_map.advance(traversal.topic, reply);

        if traversal.marker_written {
            return None;
        }
        traversal.marker_written = true;
        tracing::debug!(topic = %traversal.topic, %reply, "first unread reply");
        Some(FirstUnreadMarker {
            topic: traversal.topic,
            reply,
        })
    }

    /// Finish the traversal, returning its final state.
    pub fn end(&mut self) -> Option<Traversal> {
        let finished = self.current.take();
        if let Some(traversal) = &finished {
            tracing::debug!(topic = %traversal.topic, "end topic traversal");
        }
        finished
    }
}
