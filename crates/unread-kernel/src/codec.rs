//! Flat string encoding of a [`ReadMap`].
//!
//! ```text
//! |<topic>:<reply>|<topic>:<reply>|...
//! ```
//!
//! This is the persisted form kept in the per-user metadata store. Decoding
//! is lenient: a token that does not parse is dropped and the rest of the
//! map survives.

use crate::ids::{ReplyId, TopicId};
use crate::read_map::ReadMap;

pub const ENTRY_SEPARATOR: char = '|';
pub const PAIR_SEPARATOR: char = ':';

/// Encode `map` as `|t1:r1|t2:r2...` in ascending topic order.
///
/// The empty map encodes to the empty string.
pub fn encode(map: &ReadMap) -> String {
    let mut out = String::new();
    for (topic, reply) in map.iter() {
        out.push(ENTRY_SEPARATOR);
        out.push_str(&topic.0.to_string());
        out.push(PAIR_SEPARATOR);
        out.push_str(&reply.0.to_string());
    }
    out
}

/// Decode a persisted map string. Never fails.
///
/// Empty tokens are skipped silently, malformed ones with a warning. Only
/// the first two `:`-separated fields of a token are read; a repeated topic
/// keeps its last value.
pub fn decode(input: &str) -> ReadMap {
    let mut map = ReadMap::new();
    for token in input.split(ENTRY_SEPARATOR) {
        if token.trim().is_empty() {
            continue;
        }
        match parse_pair(token) {
            Some((topic, reply)) => {
                map.insert(topic, reply);
            }
            None => tracing::warn!(token, "skipping malformed read-map entry"),
        }
    }
    map
}

fn parse_pair(token: &str) -> Option<(TopicId, ReplyId)> {
    let mut fields = token.split(PAIR_SEPARATOR);
    let topic = fields.next()?.trim().parse::<u64>().ok()?;
    let reply = fields.next()?.trim().parse::<u64>().ok()?;
    Some((TopicId(topic), ReplyId(reply)))
}
