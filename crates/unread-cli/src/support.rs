use crate::cli::Cli;
use serde_json::Value;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use unread_kernel::{ReaderSession, UnreadConfig, UserId};
use unread_store::{ForumStore, JsonlUserMeta, MetaReadMapStore};

pub type Session = ReaderSession<MetaReadMapStore<JsonlUserMeta>>;

/// Settings shared by every command, after config and flag overrides.
#[derive(Debug, Clone)]
pub struct Env {
    pub user: UserId,
    pub config: UnreadConfig,
    pub meta_path: PathBuf,
    pub forum_path: PathBuf,
    pub json: bool,
}

impl Env {
    pub fn from_cli(cli: &Cli) -> Self {
        let config = or_exit(UnreadConfig::load(&cli.config), "failed to load config");
        let meta_path = PathBuf::from(cli.meta.as_deref().unwrap_or(&config.store.meta_path));
        let forum_path = PathBuf::from(cli.forum.as_deref().unwrap_or(&config.store.forum_path));
        Self {
            user: UserId(cli.user),
            config,
            meta_path,
            forum_path,
            json: cli.json,
        }
    }

    pub fn open_session(&self) -> Session {
        let store = MetaReadMapStore::new(
            JsonlUserMeta::new(&self.meta_path)
                .with_stale_lock_after(Duration::from_secs(self.config.store.lock_stale_secs)),
            self.config.store.meta_key.clone(),
        );
        ReaderSession::new(self.user, store)
    }

    pub fn load_forum(&self) -> ForumStore {
        if !self.forum_path.exists() {
            eprintln!("error: forum file not found: {}", self.forum_path.display());
            std::process::exit(1);
        }
        or_exit(
            ForumStore::load_jsonl(&self.forum_path, self.config.links.base_url.clone()),
            &format!("failed to load {}", self.forum_path.display()),
        )
    }
}

pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn or_exit<T, E: Display>(result: Result<T, E>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {what}: {e}");
        std::process::exit(1);
    })
}

pub fn print_json(payload: &Value) {
    let text = or_exit(serde_json::to_string_pretty(payload), "json serialization");
    println!("{text}");
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
