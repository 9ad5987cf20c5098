use crate::support::{Env, or_exit, print_json};
use serde_json::json;
use unread_kernel::ContentStore;

pub fn run(env: &Env) {
    let forum = env.load_forum();
    let mut session = env.open_session();

    let mut rows = Vec::new();
    for (topic, last_reply) in forum.topics() {
        let class = or_exit(
            session.classify_topic(topic, last_reply),
            "failed to load read map",
        );
        let url = or_exit(
            session.first_unread_reply_url(topic, &forum),
            "failed to load read map",
        );
        let classes: Vec<String> = class
            .css_classes(&env.config.display)
            .into_iter()
            .map(str::to_string)
            .collect();
        rows.push((topic, last_reply, class, classes, url));
    }

    if env.json {
        let items = rows
            .iter()
            .map(|(topic, last_reply, class, classes, url)| {
                json!({
                    "id": topic,
                    "title": forum.topic_title(*topic).unwrap_or_default(),
                    "lastReply": last_reply,
                    "unreadTopic": class.unread_topic,
                    "unreadReplies": class.unread_replies,
                    "classes": classes,
                    "firstUnreadUrl": url,
                })
            })
            .collect::<Vec<_>>();
        print_json(&json!({
            "action": "topics",
            "user": env.user,
            "count": items.len(),
            "topics": items,
        }));
    } else {
        println!("unread topics (user {})", env.user);
        for (topic, _, _, classes, url) in &rows {
            let classes = if classes.is_empty() {
                "read".to_string()
            } else {
                classes.join(" ")
            };
            println!(
                "  {topic} [{classes}] {}",
                url.as_deref().unwrap_or_default()
            );
        }
    }
}
