//! Read fan-out and partial-failure aggregation for one load cycle.
//!
//! Five independent reads settle together; no failure aborts or cancels a
//! sibling. The contribution-history read runs afterwards, only when the
//! user profile resolved, keyed by the login the API returned.

use crate::contributions::{ContributionCalendar, ContributionsClient};
use crate::github::{FetchError, GithubClient};
use crate::models::{Event, Org, Repo, User, normalize_repos, recent_events};
use crate::subject::Subject;
use async_trait::async_trait;

pub type Outcome<T> = Result<T, FetchError>;

/// The read surface one load cycle needs. Split out so the aggregator can
/// be driven without a network.
#[async_trait]
pub trait PortfolioSource: Send + Sync {
    async fn user(&self, handle: &str) -> Outcome<User>;
    async fn org(&self, handle: &str) -> Outcome<Org>;
    async fn user_repos(&self, handle: &str) -> Outcome<Vec<Repo>>;
    async fn org_repos(&self, handle: &str) -> Outcome<Vec<Repo>>;
    async fn user_events(&self, handle: &str) -> Outcome<Vec<Event>>;
    async fn contributions(&self, handle: &str) -> Outcome<ContributionCalendar>;
}

pub struct LiveSource {
    pub github: GithubClient,
    pub contributions: ContributionsClient,
}

#[async_trait]
impl PortfolioSource for LiveSource {
    async fn user(&self, handle: &str) -> Outcome<User> {
        self.github.user(handle).await
    }

    async fn org(&self, handle: &str) -> Outcome<Org> {
        self.github.org(handle).await
    }

    async fn user_repos(&self, handle: &str) -> Outcome<Vec<Repo>> {
        self.github.user_repos(handle).await
    }

    async fn org_repos(&self, handle: &str) -> Outcome<Vec<Repo>> {
        self.github.org_repos(handle).await
    }

    async fn user_events(&self, handle: &str) -> Outcome<Vec<Event>> {
        self.github.user_events(handle).await
    }

    async fn contributions(&self, handle: &str) -> Outcome<ContributionCalendar> {
        self.contributions.calendar(handle).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Default,
    Warning,
    Error,
}

pub struct Status {
    pub message: String,
    pub tone: Tone,
}

/// Everything one load cycle produced, one outcome per section.
pub struct Portfolio {
    pub subject: Subject,
    /// Login as returned by the API when the profile resolved, else the
    /// requested handle. Used for cross-links and section labels.
    pub resolved_user: String,
    pub resolved_org: String,
    pub org: Outcome<Org>,
    pub org_repos: Outcome<Vec<Repo>>,
    pub user: Outcome<User>,
    pub user_repos: Outcome<Vec<Repo>>,
    pub events: Outcome<Vec<Event>>,
    /// None when the user profile read failed and the graph was never
    /// requested.
    pub contributions: Option<Outcome<ContributionCalendar>>,
    pub generation: u64,
}

/// Dispatches the fan-out and waits for every read to settle.
pub async fn load(source: &dyn PortfolioSource, subject: Subject, generation: u64) -> Portfolio {
    let (org, org_repos, user, user_repos, events) = tokio::join!(
        source.org(&subject.org),
        source.org_repos(&subject.org),
        source.user(&subject.user),
        source.user_repos(&subject.user),
        source.user_events(&subject.user),
    );

    let resolved_user = match &user {
        Ok(user) => user.login.clone(),
        Err(_) => subject.user.clone(),
    };
    let resolved_org = match &org {
        Ok(org) => org.login.clone(),
        Err(_) => subject.org.clone(),
    };

    let contributions = match &user {
        Ok(user) => Some(source.contributions(&user.login).await),
        Err(_) => None,
    };

    Portfolio {
        subject,
        resolved_user,
        resolved_org,
        org,
        org_repos: org_repos.map(normalize_repos),
        user,
        user_repos: user_repos.map(normalize_repos),
        events: events.map(recent_events),
        contributions,
        generation,
    }
}

impl Portfolio {
    /// One warning line per failed section, in page order.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Err(error) = &self.org {
            warnings.push(format!("Org error: {error}"));
        }
        if let Err(error) = &self.org_repos {
            warnings.push(format!("Org repos: {error}"));
        }
        if let Err(error) = &self.user {
            warnings.push(format!("User error: {error}"));
        }
        if let Err(error) = &self.user_repos {
            warnings.push(format!("User repos: {error}"));
        }
        if let Err(error) = &self.events {
            warnings.push(format!("Activity: {error}"));
        }
        warnings
    }

    /// Aggregate status line. Error tone is reserved for the one overall
    /// failure condition: both profile reads failed.
    pub fn status(&self) -> Status {
        let warnings = self.warnings();
        if warnings.is_empty() {
            return Status {
                message: format!(
                    "Loaded @{} and @{}.",
                    self.resolved_user, self.resolved_org
                ),
                tone: Tone::Default,
            };
        }

        let both_profiles_failed = self.user.is_err() && self.org.is_err();
        let prefix = if both_profiles_failed {
            "Failed to load GitHub profiles."
        } else {
            "Loaded with warnings."
        };
        Status {
            message: format!("{prefix} {}", warnings.join(" ")),
            tone: if both_profiles_failed {
                Tone::Error
            } else {
                Tone::Warning
            },
        }
    }
}
