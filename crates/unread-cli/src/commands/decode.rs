use crate::support::{Env, print_json};
use serde_json::json;
use unread_kernel::{decode, encode};

pub fn run(env: &Env, encoded: &str) {
    let map = decode(encoded);
    let canonical = encode(&map);

    if env.json {
        let entries = map
            .iter()
            .map(|(topic, reply)| json!({ "topic": topic, "reply": reply }))
            .collect::<Vec<_>>();
        print_json(&json!({
            "action": "decode",
            "entries": entries,
            "canonical": canonical,
        }));
    } else {
        println!("unread decode");
        println!("  entries: {}", map.len());
        for (topic, reply) in map.iter() {
            println!("  {topic} -> {reply}");
        }
        println!("  canonical: {canonical}");
    }
}
