use crate::support::{Env, or_exit, print_json, yes_no};
use serde_json::json;

pub fn run_unread(env: &Env) {
    let mut session = env.open_session();
    or_exit(session.mark_all_unread(), "failed to save read map");
    let tracked = env.user.is_authenticated();

    if env.json {
        print_json(&json!({
            "action": "mark_unread",
            "user": env.user,
            "tracked": tracked,
        }));
    } else {
        println!("unread mark-unread");
        println!("  user: {}", env.user);
        println!("  tracked: {}", yes_no(tracked));
    }
}

pub fn run_read(env: &Env) {
    let forum = env.load_forum();
    let mut session = env.open_session();
    let advanced = or_exit(session.mark_all_read(&forum), "failed to save read map");
    let tracked = env.user.is_authenticated();

    if env.json {
        print_json(&json!({
            "action": "mark_read",
            "user": env.user,
            "tracked": tracked,
            "advanced": advanced,
        }));
    } else {
        println!("unread mark-read");
        println!("  user: {}", env.user);
        println!("  tracked: {}", yes_no(tracked));
        println!("  topics advanced: {advanced}");
    }
}
