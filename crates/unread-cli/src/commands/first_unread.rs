use crate::support::{Env, or_exit, print_json};
use serde_json::json;
use unread_kernel::TopicId;

pub fn run(env: &Env, topic: u64) {
    let forum = env.load_forum();
    let topic = TopicId(topic);
    let mut session = env.open_session();

    let target = or_exit(
        session.first_unread_target(topic, &forum),
        "failed to load read map",
    );
    let Some(target) = target else {
        eprintln!("error: not a topic: {topic}");
        std::process::exit(1);
    };
    let url = target.url(&forum);

    if env.json {
        print_json(&json!({
            "action": "first_unread",
            "user": env.user,
            "topic": topic,
            "target": target,
            "url": url,
        }));
    } else {
        println!("{url}");
    }
}
