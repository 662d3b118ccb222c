//! Wire models for the GitHub REST read surface, plus the normalization
//! applied before rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REPO_DISPLAY_LIMIT: usize = 12;
pub const EVENT_DISPLAY_LIMIT: usize = 8;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub html_url: String,
    pub public_repos: u32,
    pub public_gists: u32,
    pub followers: u32,
    pub following: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Org {
    pub login: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub html_url: String,
    pub public_repos: u32,
    pub followers: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    // Null for repositories that have never been pushed to.
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fork: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventRepo {
    pub name: String,
    /// API URL of the repository, not the web URL.
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventPayload {
    pub action: Option<String>,
    pub ref_type: Option<String>,
}

/// Drops forks, sorts by last push descending and keeps the 12 most recent.
/// The upstream claims to sort by update time already; we sort defensively
/// rather than trusting that.
pub fn normalize_repos(mut repos: Vec<Repo>) -> Vec<Repo> {
    repos.retain(|repo| !repo.fork);
    repos.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    repos.truncate(REPO_DISPLAY_LIMIT);
    repos
}

/// Keeps the 8 most recent events. The events API returns newest first.
pub fn recent_events(mut events: Vec<Event>) -> Vec<Event> {
    events.truncate(EVENT_DISPLAY_LIMIT);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repo(id: u64, fork: bool, pushed_days_ago: i64) -> Repo {
        Repo {
            id,
            name: format!("repo-{id}"),
            html_url: format!("https://github.com/x/repo-{id}"),
            description: None,
            language: None,
            stargazers_count: 0,
            forks_count: 0,
            pushed_at: Some(
                Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap()
                    - chrono::Duration::days(pushed_days_ago),
            ),
            fork,
        }
    }

    #[test]
    fn normalize_excludes_forks() {
        let repos = normalize_repos(vec![repo(1, false, 3), repo(2, true, 1), repo(3, false, 2)]);
        assert!(repos.iter().all(|r| !r.fork));
        assert_eq!(repos.len(), 2);
    }

    #[test]
    fn normalize_sorts_by_push_date_descending() {
        let repos = normalize_repos(vec![repo(1, false, 5), repo(2, false, 1), repo(3, false, 3)]);
        let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn normalize_truncates_to_limit() {
        let many: Vec<Repo> = (0..30).map(|i| repo(i, false, i as i64)).collect();
        assert_eq!(normalize_repos(many).len(), REPO_DISPLAY_LIMIT);
    }

    #[test]
    fn normalize_puts_never_pushed_repos_last() {
        let mut never_pushed = repo(9, false, 0);
        never_pushed.pushed_at = None;
        let repos = normalize_repos(vec![never_pushed, repo(1, false, 2)]);
        assert_eq!(repos.last().map(|r| r.id), Some(9));
    }

    fn event(hours_ago: i64) -> Event {
        Event {
            kind: "PushEvent".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap()
                - chrono::Duration::hours(hours_ago),
            repo: EventRepo {
                name: "x/y".to_string(),
                url: "https://api.github.com/repos/x/y".to_string(),
            },
            payload: EventPayload::default(),
        }
    }

    #[test]
    fn recent_events_keeps_the_first_eight_in_order() {
        let feed: Vec<Event> = (0..12).map(event).collect();
        let kept = recent_events(feed);
        assert_eq!(kept.len(), EVENT_DISPLAY_LIMIT);
        let hours: Vec<i64> = kept
            .iter()
            .map(|e| {
                (Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap() - e.created_at).num_hours()
            })
            .collect();
        assert_eq!(hours, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn recent_events_passes_short_feeds_through() {
        let kept = recent_events(vec![event(0), event(1)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn event_payload_defaults_when_missing() {
        let json = r#"{
            "type": "PushEvent",
            "created_at": "2026-01-03T10:00:00Z",
            "repo": {"name": "x/y", "url": "https://api.github.com/repos/x/y"}
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.payload.action.is_none());
        assert!(event.payload.ref_type.is_none());
    }
}
