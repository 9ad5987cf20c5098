//! Request-scoped read-state tracking for one user.
//!
//! A `ReaderSession` owns the user's read map for the lifetime of one
//! request. The map is loaded lazily, at most once, on the first operation
//! that needs it; traversal end and the mark-all operations write it back.
//!
//! Anonymous sessions never touch the store: traversal events are ignored,
//! classification reports nothing unread, and first-unread links fall back
//! to the topic permalink.

use crate::classify::{TopicClass, classify};
use crate::codec;
use crate::error::UnreadError;
use crate::ids::{ReplyId, TopicId, UserId};
use crate::read_map::ReadMap;
use crate::resolve::{UnreadTarget, first_unread_target};
use crate::store::{ContentStore, ReadMapStore};
use crate::tracker::{FirstUnreadMarker, Tracker, Traversal};

#[derive(Debug)]
pub struct ReaderSession<S> {
    user: UserId,
    store: S,
    /// `None` until loaded.
    read_map: Option<ReadMap>,
    tracker: Tracker,
}

impl<S: ReadMapStore> ReaderSession<S> {
    pub fn new(user: UserId, store: S) -> Self {
        Self {
            user,
            store,
            read_map: None,
            tracker: Tracker::new(),
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn is_loaded(&self) -> bool {
        self.read_map.is_some()
    }

    /// The loaded map, if any. Does not trigger a load.
    pub fn read_map(&self) -> Option<&ReadMap> {
        self.read_map.as_ref()
    }

    pub fn traversal(&self) -> Option<&Traversal> {
        self.tracker.current()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the map from the store unless this session already did.
    ///
    /// Returns `None` for anonymous sessions.
    pub fn ensure_loaded(&mut self) -> Result<Option<&ReadMap>, UnreadError> {
        self.load()?;
        Ok(self.read_map.as_ref())
    }

    /// Returns whether tracking applies to this session.
    fn load(&mut self) -> Result<bool, UnreadError> {
        if !self.user.is_authenticated() {
            return Ok(false);
        }
        if self.read_map.is_none() {
            let encoded = self.store.load_read_map_string(self.user)?;
            let map = codec::decode(&encoded);
            tracing::debug!(user = %self.user, entries = map.len(), "loaded read map");
            self.read_map = Some(map);
        }
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), UnreadError> {
        let Some(map) = self.read_map.as_ref() else {
            return Ok(());
        };
        let encoded = codec::encode(map);
        self.store.save_read_map_string(self.user, &encoded)?;
        tracing::debug!(user = %self.user, entries = map.len(), "saved read map");
        Ok(())
    }

    /// Called before a topic is rendered.
    pub fn begin_topic(&mut self, topic: TopicId) -> Result<(), UnreadError> {
        if !self.load()? {
            return Ok(());
        }
        if let Some(map) = self.read_map.as_ref() {
            self.tracker.begin(topic, map);
        }
        Ok(())
    }

    /// Called before each reply of the current topic is rendered, in
    /// rendering order.
    pub fn visit_reply(&mut self, reply: ReplyId) -> Option<FirstUnreadMarker> {
        if !self.user.is_authenticated() {
            return None;
        }
        let map = self.read_map.as_mut()?;
        self.tracker.visit(reply, map)
    }

    /// Called after a topic is rendered. Persists the map before returning.
    ///
    /// The traversal ends even when the save fails; the error is returned.
    pub fn end_topic(&mut self) -> Result<(), UnreadError> {
        if !self.user.is_authenticated() {
            return Ok(());
        }
        if self.tracker.end().is_none() {
            tracing::debug!(user = %self.user, "end_topic without an active traversal");
        }
        self.load()?;
        self.persist()
    }

    /// Display flags for `topic` whose newest reply is `last_reply`.
    pub fn classify_topic(
        &mut self,
        topic: TopicId,
        last_reply: ReplyId,
    ) -> Result<TopicClass, UnreadError> {
        if !self.load()? {
            return Ok(TopicClass::default());
        }
        Ok(self
            .read_map
            .as_ref()
            .map(|map| classify(topic, last_reply, map))
            .unwrap_or_default())
    }

    /// Where "go to first unread reply" should lead for `topic`.
    ///
    /// `None` when `topic` is not a topic. Anonymous sessions always get the
    /// topic itself.
    pub fn first_unread_target(
        &mut self,
        topic: TopicId,
        content: &impl ContentStore,
    ) -> Result<Option<UnreadTarget>, UnreadError> {
        if !self.load()? {
            return Ok(Some(UnreadTarget::Topic(topic)));
        }
        Ok(self
            .read_map
            .as_ref()
            .and_then(|map| first_unread_target(topic, map, content)))
    }

    pub fn first_unread_reply_url(
        &mut self,
        topic: TopicId,
        content: &impl ContentStore,
    ) -> Result<Option<String>, UnreadError> {
        Ok(self
            .first_unread_target(topic, content)?
            .map(|target| target.url(content)))
    }

    /// Forget all read progress, persisted and in memory.
    pub fn mark_all_unread(&mut self) -> Result<(), UnreadError> {
        if !self.user.is_authenticated() {
            return Ok(());
        }
        self.store.save_read_map_string(self.user, "")?;
        self.read_map = Some(ReadMap::new());
        tracing::debug!(user = %self.user, "marked all topics unread");
        Ok(())
    }

    /// Advance every topic in `content` to its newest reply and persist.
    ///
    /// Topics without replies are marked read at their opening post. Entries
    /// for topics `content` does not list are left alone. Returns the number
    /// of entries that moved.
    pub fn mark_all_read(&mut self, content: &impl ContentStore) -> Result<usize, UnreadError> {
        if !self.load()? {
            return Ok(0);
        }
        let mut advanced = 0;
        if let Some(map) = self.read_map.as_mut() {
            for (topic, last_reply) in content.topics() {
                let target = if last_reply == ReplyId::NONE {
                    ReplyId::opening_post(topic)
                } else {
                    last_reply
                };
                if map.advance(topic, target) {
                    advanced += 1;
                }
            }
        }
        tracing::debug!(user = %self.user, advanced, "marked all topics read");
        self.persist()?;
        Ok(advanced)
    }

    /// Record that the user just created `topic`: its opening post is read.
    pub fn record_new_topic(&mut self, topic: TopicId) -> Result<(), UnreadError> {
        if !self.load()? {
            return Ok(());
        }
        if let Some(map) = self.read_map.as_mut() {
            map.advance(topic, ReplyId::opening_post(topic));
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::resolve::tests::FakeForum;
    use std::collections::BTreeMap;

    /// Store that counts calls and can be told to fail saves.
    #[derive(Debug, Default)]
    struct RecordingStore {
        values: BTreeMap<UserId, String>,
        saves: usize,
        fail_saves: bool,
    }

    impl RecordingStore {
        fn with(user: u64, encoded: &str) -> Self {
            let mut store = Self::default();
            store.values.insert(UserId(user), encoded.to_string());
            store
        }

        fn value(&self, user: u64) -> &str {
            self.values
                .get(&UserId(user))
                .map(String::as_str)
                .unwrap_or("")
        }
    }

    impl ReadMapStore for RecordingStore {
        fn load_read_map_string(&self, user: UserId) -> Result<String, StoreError> {
            Ok(self.values.get(&user).cloned().unwrap_or_default())
        }

        fn save_read_map_string(&mut self, user: UserId, encoded: &str) -> Result<(), StoreError> {
            self.saves += 1;
            if self.fail_saves {
                return Err(StoreError::Io("disk full".to_string()));
            }
            self.values.insert(user, encoded.to_string());
            Ok(())
        }
    }

    /// Wrapper counting loads, since `load_read_map_string` takes `&self`.
    #[derive(Debug, Default)]
    struct CountingStore {
        inner: RecordingStore,
        loads: std::cell::Cell<usize>,
    }

    impl ReadMapStore for CountingStore {
        fn load_read_map_string(&self, user: UserId) -> Result<String, StoreError> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load_read_map_string(user)
        }

        fn save_read_map_string(&mut self, user: UserId, encoded: &str) -> Result<(), StoreError> {
            self.inner.save_read_map_string(user, encoded)
        }
    }

    fn read_topic(
        session: &mut ReaderSession<impl ReadMapStore>,
        topic: u64,
        replies: &[u64],
    ) -> Vec<u64> {
        session.begin_topic(TopicId(topic)).expect("begin succeeds");
        let markers = replies
            .iter()
            .filter_map(|r| session.visit_reply(ReplyId(*r)))
            .map(|m| m.reply.0)
            .collect();
        session.end_topic().expect("end succeeds");
        markers
    }

    #[test]
    fn traversal_persists_encoded_progress() {
        let mut session = ReaderSession::new(UserId(3), RecordingStore::with(3, "|9:40"));

        let markers = read_topic(&mut session, 5, &[21, 25, 30]);

        assert_eq!(markers, vec![21]);
        let store = session.into_store();
        assert_eq!(store.value(3), "|5:30|9:40");
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn map_loads_once_per_session_across_topics() {
        let mut session = ReaderSession::new(UserId(3), CountingStore::default());

        read_topic(&mut session, 5, &[21]);
        read_topic(&mut session, 6, &[22]);
        session
            .classify_topic(TopicId(7), ReplyId(23))
            .expect("classify succeeds");

        assert_eq!(session.store().loads.get(), 1);
        assert_eq!(session.into_store().inner.value(3), "|5:21|6:22");
    }

    #[test]
    fn anonymous_session_never_touches_store() {
        let forum = FakeForum::default().with_topic(5, &[21]);
        let mut session = ReaderSession::new(UserId::ANONYMOUS, CountingStore::default());

        assert!(read_topic(&mut session, 5, &[21]).is_empty());
        assert!(
            session
                .classify_topic(TopicId(5), ReplyId(21))
                .expect("classify succeeds")
                .is_read()
        );
        assert_eq!(
            session
                .first_unread_reply_url(TopicId(5), &forum)
                .expect("resolve succeeds")
                .as_deref(),
            Some("/t/5/")
        );
        session.mark_all_unread().expect("noop");
        assert_eq!(session.mark_all_read(&forum).expect("noop"), 0);
        session.record_new_topic(TopicId(5)).expect("noop");

        assert!(!session.is_loaded());
        assert_eq!(session.store().loads.get(), 0);
        assert_eq!(session.into_store().inner.saves, 0);
    }

    #[test]
    fn save_failure_surfaces_and_ends_traversal() {
        let mut store = RecordingStore::with(3, "|5:10");
        store.fail_saves = true;
        let mut session = ReaderSession::new(UserId(3), store);

        session.begin_topic(TopicId(5)).expect("begin succeeds");
        session.visit_reply(ReplyId(11));
        let err = session.end_topic().expect_err("save must fail");

        assert!(matches!(err, UnreadError::Store(StoreError::Io(_))));
        assert!(session.traversal().is_none());
        assert_eq!(session.into_store().value(3), "|5:10");
    }

    #[test]
    fn progress_never_regresses_across_traversals() {
        let mut session = ReaderSession::new(UserId(3), RecordingStore::with(3, "|5:30"));

        let markers = read_topic(&mut session, 5, &[21, 25, 30]);

        assert!(markers.is_empty());
        assert_eq!(session.into_store().value(3), "|5:30");
    }

    #[test]
    fn classify_uses_loaded_map() {
        let mut session = ReaderSession::new(UserId(3), RecordingStore::with(3, "|1:5"));

        let class = session
            .classify_topic(TopicId(1), ReplyId(10))
            .expect("classify succeeds");
        assert!(!class.unread_topic);
        assert!(class.unread_replies);

        let class = session
            .classify_topic(TopicId(2), ReplyId(10))
            .expect("classify succeeds");
        assert!(class.unread_topic);
    }

    #[test]
    fn mark_all_unread_clears_store_and_memory() {
        let mut session = ReaderSession::new(UserId(3), RecordingStore::with(3, "|5:30"));
        session.ensure_loaded().expect("load succeeds");

        session.mark_all_unread().expect("mark succeeds");

        assert!(session.read_map().is_some_and(ReadMap::is_empty));
        read_topic(&mut session, 6, &[]);
        assert_eq!(session.into_store().value(3), "");
    }

    #[test]
    fn mark_all_read_advances_every_known_topic() {
        let forum = FakeForum::default()
            .with_topic(5, &[21, 30])
            .with_topic(6, &[])
            .with_topic(7, &[40]);
        let mut session = ReaderSession::new(UserId(3), RecordingStore::with(3, "|7:50|99:1"));

        let advanced = session.mark_all_read(&forum).expect("mark succeeds");

        assert_eq!(advanced, 2);
        assert_eq!(session.into_store().value(3), "|5:30|6:6|7:50|99:1");
    }

    #[test]
    fn new_topic_is_recorded_as_read() {
        let forum = FakeForum::default().with_topic(8, &[]);
        let mut session = ReaderSession::new(UserId(3), RecordingStore::default());

        session.record_new_topic(TopicId(8)).expect("record succeeds");

        assert!(
            session
                .classify_topic(TopicId(8), ReplyId::NONE)
                .expect("classify succeeds")
                .is_read()
        );
        assert_eq!(
            session
                .first_unread_reply_url(TopicId(8), &forum)
                .expect("resolve succeeds")
                .as_deref(),
            Some("/t/8/")
        );
        assert_eq!(session.into_store().value(3), "|8:8");
    }
}
