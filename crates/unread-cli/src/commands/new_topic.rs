use crate::support::{Env, or_exit, print_json, yes_no};
use serde_json::json;
use unread_kernel::TopicId;

pub fn run(env: &Env, topic: u64) {
    let topic = TopicId(topic);
    let mut session = env.open_session();
    or_exit(session.record_new_topic(topic), "failed to save read map");
    let tracked = env.user.is_authenticated();

    if env.json {
        print_json(&json!({
            "action": "new_topic",
            "user": env.user,
            "topic": topic,
            "tracked": tracked,
        }));
    } else {
        println!("unread new-topic {topic}");
        println!("  user: {}", env.user);
        println!("  tracked: {}", yes_no(tracked));
    }
}
