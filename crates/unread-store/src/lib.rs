//! # unread-store
//!
//! Storage layer for read-state tracking.
//!
//! This crate provides:
//! - `UserMeta` backends (`MemoryUserMeta`, `JsonlUserMeta`) holding one
//!   string per `(user, key)`
//! - `MetaReadMapStore`, which keeps a user's encoded read map under one key
//! - a lock file serializing writers of the metadata JSONL, reclaimed when
//!   its holder died
//! - `ForumStore`, a JSONL-backed index of topics and replies
//!
//! It intentionally does not decide what counts as read. That lives in
//! `unread-kernel`.
//!
//! ## Data model
//!
//! ```text
//! usermeta.jsonl (one line per user/key)
//!     ↕  load / lock-scoped save
//! MemoryUserMeta ──▶ MetaReadMapStore ──▶ ReaderSession
//!
//! forum.jsonl (one line per post) ──▶ ForumStore ──▶ ContentStore queries
//! ```

pub mod forum;
pub mod jsonl;
pub mod lock;
pub mod meta;

pub use forum::{ForumError, ForumStore, Post, PostKind};
pub use jsonl::{
    JsonlError, read_records, read_records_from_path, write_records, write_records_to_path,
};
pub use lock::{MetaLock, lock_path_for};
pub use meta::{JsonlUserMeta, MemoryUserMeta, MetaReadMapStore, MetaRecord, UserMeta};
