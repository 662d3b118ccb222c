//! GitHub REST client for the portfolio's five read operations.
//!
//! Every operation classifies failures into the section-level taxonomy the
//! renderers consume: not-found and rate-limited are terminal and carry the
//! resource name, anything else collapses into a generic failure. There is
//! no retry or backoff; a failed section renders its fallback for this load
//! cycle.

use crate::models::{Event, Org, Repo, User};
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const API_ROOT: &str = "https://api.github.com";
pub const ACCEPT_JSON: &str = "application/vnd.github+json";
const USER_AGENT: &str = "devfolio-portfolio";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{0} was not found.")]
    NotFound(String),

    #[error("GitHub API rate limit reached while loading {0}.")]
    RateLimited(String),

    #[error("{0} request failed ({1}).")]
    Status(String, u16),

    #[error("Unexpected error while loading {0}.")]
    Unexpected(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited(_))
    }
}

/// Verbatim upstream reply carried through the same-origin proxy.
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: String,
}

#[derive(Clone)]
pub struct GithubClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl GithubClient {
    /// The bearer token stays server-side; it is attached to upstream calls
    /// and never exposed to page callers.
    pub fn new(token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        let base = Url::parse(API_ROOT).context("Invalid GitHub API root")?;
        Ok(Self { http, base, token })
    }

    /// Builds an upstream URL from path segments and query pairs. Each
    /// segment is percent-encoded, so a handle containing `/`, `?` or `#`
    /// cannot address a different resource.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T, FetchError> {
        let mut request = self.http.get(url).header(ACCEPT, ACCEPT_JSON);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|_| FetchError::Unexpected(resource.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|_| FetchError::Unexpected(resource.to_string())),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(resource.to_string())),
            StatusCode::FORBIDDEN => Err(FetchError::RateLimited(resource.to_string())),
            status => Err(FetchError::Status(resource.to_string(), status.as_u16())),
        }
    }

    pub async fn user(&self, handle: &str) -> Result<User, FetchError> {
        self.get_json(
            self.endpoint(&["users", handle], &[]),
            &format!("User @{handle}"),
        )
        .await
    }

    pub async fn org(&self, handle: &str) -> Result<Org, FetchError> {
        self.get_json(
            self.endpoint(&["orgs", handle], &[]),
            &format!("Organization @{handle}"),
        )
        .await
    }

    pub async fn user_repos(&self, handle: &str) -> Result<Vec<Repo>, FetchError> {
        self.get_json(
            self.endpoint(
                &["users", handle, "repos"],
                &[("sort", "updated"), ("per_page", "100"), ("type", "owner")],
            ),
            &format!("Repositories for @{handle}"),
        )
        .await
    }

    pub async fn org_repos(&self, handle: &str) -> Result<Vec<Repo>, FetchError> {
        self.get_json(
            self.endpoint(
                &["orgs", handle, "repos"],
                &[("sort", "updated"), ("per_page", "100"), ("type", "public")],
            ),
            &format!("Organization repositories for @{handle}"),
        )
        .await
    }

    pub async fn user_events(&self, handle: &str) -> Result<Vec<Event>, FetchError> {
        self.get_json(
            self.endpoint(&["users", handle, "events", "public"], &[("per_page", "30")]),
            &format!("Public activity for @{handle}"),
        )
        .await
    }

    /// Forwards an arbitrary upstream path for the proxy endpoint, returning
    /// the upstream status and body untouched.
    pub async fn forward(&self, endpoint: &str) -> reqwest::Result<RawResponse> {
        let mut request = self
            .http
            .get(format!("{API_ROOT}{endpoint}"))
            .header(ACCEPT, ACCEPT_JSON)
            .header(CACHE_CONTROL, "no-store");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_each_path_segment() {
        let client = GithubClient::new(None).unwrap();
        let url = client.endpoint(&["users", "a/b?c#d"], &[("per_page", "100")]);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/a%2Fb%3Fc%23d?per_page=100"
        );
    }

    #[test]
    fn endpoint_without_query_has_no_trailing_question_mark() {
        let client = GithubClient::new(None).unwrap();
        let url = client.endpoint(&["orgs", "acme"], &[]);
        assert_eq!(url.as_str(), "https://api.github.com/orgs/acme");
    }

    #[test]
    fn rate_limit_errors_are_distinguishable() {
        let rate = FetchError::RateLimited("User @x".to_string());
        let missing = FetchError::NotFound("User @x".to_string());
        assert!(rate.is_rate_limited());
        assert!(!missing.is_rate_limited());
        assert_eq!(
            rate.to_string(),
            "GitHub API rate limit reached while loading User @x."
        );
    }

    #[test]
    fn error_messages_name_the_resource() {
        assert_eq!(
            FetchError::NotFound("Organization @acme".to_string()).to_string(),
            "Organization @acme was not found."
        );
        assert_eq!(
            FetchError::Status("Repositories for @x".to_string(), 502).to_string(),
            "Repositories for @x request failed (502)."
        );
        assert_eq!(
            FetchError::Unexpected("Public activity for @x".to_string()).to_string(),
            "Unexpected error while loading Public activity for @x."
        );
    }
}
