//! Contribution-history client for the second external host.
//!
//! This read is never proxied; it is dispatched only after the user profile
//! fetch succeeds and is keyed by the resolved login, which may differ in
//! case from the requested handle.

use crate::github::FetchError;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

pub const CONTRIB_API_ROOT: &str = "https://github-contributions.bytebasherslabs.dev/v4";

/// Week-major calendar of daily contribution counts, newest week last.
/// The shape mirrors GitHub's contribution calendar: rectangular except for
/// a possibly short trailing week.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContributionCalendar {
    #[serde(rename = "totalContributions")]
    pub total: u64,
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContributionWeek {
    #[serde(rename = "contributionDays")]
    pub days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContributionDay {
    /// ISO `yyyy-mm-dd`.
    pub date: String,
    #[serde(rename = "contributionCount")]
    pub count: u32,
    #[serde(rename = "contributionLevel")]
    pub level: Option<String>,
}

/// Maps a quartile-level name to its visual bucket. Total: the five defined
/// levels map to distinct integers 0-4, anything unrecognized or missing
/// maps to 0.
pub fn level_index(level: Option<&str>) -> u8 {
    match level {
        Some("FIRST_QUARTILE") => 1,
        Some("SECOND_QUARTILE") => 2,
        Some("THIRD_QUARTILE") => 3,
        Some("FOURTH_QUARTILE") => 4,
        _ => 0,
    }
}

#[derive(Clone)]
pub struct ContributionsClient {
    http: Client,
    base: Url,
}

impl ContributionsClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent("devfolio-portfolio")
            .build()
            .context("Failed to build contributions HTTP client")?;
        let base = Url::parse(CONTRIB_API_ROOT).context("Invalid contributions API root")?;
        Ok(Self { http, base })
    }

    /// The handle lands as a single percent-encoded path segment.
    fn endpoint(&self, handle: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(handle);
        }
        url
    }

    pub async fn calendar(&self, handle: &str) -> Result<ContributionCalendar, FetchError> {
        let resource = format!("Contribution history for @{handle}");
        let response = self
            .http
            .get(self.endpoint(handle))
            .send()
            .await
            .map_err(|_| FetchError::Unexpected(resource.clone()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<ContributionCalendar>()
                .await
                .map_err(|_| FetchError::Unexpected(resource)),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(resource)),
            StatusCode::FORBIDDEN => Err(FetchError::RateLimited(resource)),
            status => Err(FetchError::Status(resource, status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_the_handle() {
        let client = ContributionsClient::new().unwrap();
        assert_eq!(
            client.endpoint("octo/cat").as_str(),
            "https://github-contributions.bytebasherslabs.dev/v4/octo%2Fcat"
        );
    }

    #[test]
    fn level_index_is_total_and_distinct() {
        let defined = [
            (Some("NONE"), 0),
            (Some("FIRST_QUARTILE"), 1),
            (Some("SECOND_QUARTILE"), 2),
            (Some("THIRD_QUARTILE"), 3),
            (Some("FOURTH_QUARTILE"), 4),
        ];
        let mut seen = std::collections::HashSet::new();
        for (level, expected) in defined {
            let index = level_index(level);
            assert_eq!(index, expected);
            assert!(seen.insert(index));
        }
    }

    #[test]
    fn unrecognized_or_missing_level_maps_to_zero() {
        assert_eq!(level_index(Some("FIFTH_QUARTILE")), 0);
        assert_eq!(level_index(Some("")), 0);
        assert_eq!(level_index(None), 0);
    }

    #[test]
    fn calendar_deserializes_upstream_shape() {
        let json = r#"{
            "totalContributions": 97,
            "weeks": [
                {"contributionDays": [
                    {"date": "2026-01-04", "contributionCount": 0, "contributionLevel": "NONE"},
                    {"date": "2026-01-05", "contributionCount": 3, "contributionLevel": "SECOND_QUARTILE"}
                ]}
            ]
        }"#;
        let calendar: ContributionCalendar = serde_json::from_str(json).unwrap();
        assert_eq!(calendar.total, 97);
        assert_eq!(calendar.weeks[0].days.len(), 2);
        assert_eq!(level_index(calendar.weeks[0].days[1].level.as_deref()), 2);
    }
}
