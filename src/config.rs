//! Environment-driven configuration with logged defaults.

use crate::subject::{DEFAULT_ORG, DEFAULT_USER};
use std::path::PathBuf;
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    /// Attached server-side to upstream GitHub calls; never exposed to
    /// page callers.
    pub github_token: Option<String>,
    pub default_user: String,
    pub default_org: String,
    pub content_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        if github_token.is_none() {
            info!("GITHUB_TOKEN not set, calling GitHub unauthenticated");
        }

        Self {
            port: try_load("PORT", "3000"),
            github_token,
            default_user: load_string("DEVFOLIO_USER", DEFAULT_USER),
            default_org: load_string("DEVFOLIO_ORG", DEFAULT_ORG),
            content_dir: PathBuf::from(load_string("DEVFOLIO_CONTENT_DIR", "content")),
            prefs_path: PathBuf::from(load_string("DEVFOLIO_PREFS_PATH", "devfolio-prefs.json")),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn load_string(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    load_string(key, default)
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
