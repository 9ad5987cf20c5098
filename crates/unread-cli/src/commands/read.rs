use crate::support::{Env, or_exit, print_json};
use serde_json::json;
use unread_kernel::{ContentStore, TopicId};

/// Replay one topic render: begin, visit each reply in id order, end.
pub fn run(env: &Env, topic: u64) {
    let forum = env.load_forum();
    let topic = TopicId(topic);
    if !forum.is_topic(topic.0) {
        eprintln!("error: not a topic: {topic}");
        std::process::exit(1);
    }

    let replies = forum.replies(topic);
    let mut session = env.open_session();
    or_exit(session.begin_topic(topic), "failed to begin topic");
    let mut marker = None;
    for reply in &replies {
        if let Some(found) = session.visit_reply(*reply) {
            marker = Some(found);
        }
    }
    or_exit(session.end_topic(), "failed to save read map");

    let last_read = session.read_map().and_then(|map| map.get(topic));
    let anchor = marker.map(|m| m.anchor_html(&env.config.display));

    if env.json {
        print_json(&json!({
            "action": "read",
            "user": env.user,
            "topic": topic,
            "replies": replies,
            "firstUnread": marker,
            "anchor": anchor,
            "lastRead": last_read,
        }));
    } else {
        println!("unread read {topic}");
        println!("  user: {}", env.user);
        println!("  replies: {}", replies.len());
        match marker {
            Some(marker) => println!("  first unread: {}", marker.reply),
            None => println!("  first unread: none"),
        }
        if let Some(anchor) = anchor {
            println!("  anchor: {anchor}");
        }
        match last_read {
            Some(reply) => println!("  last read: {reply}"),
            None => println!("  last read: none"),
        }
    }
}
