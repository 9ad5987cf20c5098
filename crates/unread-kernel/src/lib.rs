//! # Unread Kernel
//!
//! Per-user read-state for threaded forums: which replies of which topics a
//! user has seen, kept as a single small record per user.
//!
//! This crate is **storage-agnostic**: it does not know where read maps or
//! forum posts live. It only prescribes how read progress is recorded while
//! a topic renders and how it answers "is this topic unread?" and "where is
//! the first unread reply?".
//!
//! ## Architecture
//!
//! ```text
//! ReadMapStore          ← per-user persisted string (external)
//!     │
//! codec                 ← "|topic:reply|..." ↔ ReadMap
//!     │
//! ReaderSession         ← request-scoped, lazy load-once
//!     ├── Tracker       ← begin / visit / end, first-unread marker
//!     ├── classify      ← unread-topic / unread-replies flags
//!     └── resolve       ← first unread reply via ContentStore (external)
//! ```
//!
//! ## Example
//!
//! ```
//! use unread_kernel::{ReaderSession, ReadMapStore, ReplyId, StoreError, TopicId, UserId};
//!
//! #[derive(Default)]
//! struct OneUser(String);
//!
//! impl ReadMapStore for OneUser {
//!     fn load_read_map_string(&self, _user: UserId) -> Result<String, StoreError> {
//!         Ok(self.0.clone())
//!     }
//!     fn save_read_map_string(&mut self, _user: UserId, encoded: &str) -> Result<(), StoreError> {
//!         self.0 = encoded.to_string();
//!         Ok(())
//!     }
//! }
//!
//! let mut session = ReaderSession::new(UserId(1), OneUser("|5:20".into()));
//! session.begin_topic(TopicId(5)).unwrap();
//! assert_eq!(session.visit_reply(ReplyId(20)), None);
//! let marker = session.visit_reply(ReplyId(21)).unwrap();
//! assert_eq!(marker.reply, ReplyId(21));
//! session.end_topic().unwrap();
//! assert_eq!(session.into_store().0, "|5:21");
//! ```

pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod read_map;
pub mod resolve;
pub mod session;
pub mod store;
pub mod tracker;

pub use classify::{TopicClass, classify};
pub use codec::{decode, encode};
pub use config::{DisplayConfig, LinkConfig, StoreConfig, UnreadConfig};
pub use error::{StoreError, UnreadError};
pub use ids::{ReplyId, TopicId, UserId};
pub use read_map::ReadMap;
pub use resolve::{UnreadTarget, first_unread_reply_url, first_unread_target};
pub use session::ReaderSession;
pub use store::{ContentStore, ReadMapStore};
pub use tracker::{FirstUnreadMarker, Tracker, Traversal};
