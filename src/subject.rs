//! Subject resolution: which (user, org) pair the page is showing.
//!
//! Each half resolves independently with precedence
//! query parameter > stored preference > default. An explicit resubmission
//! (both query fields present) must supply both handles or the whole load
//! is rejected.

use thiserror::Error;

pub const DEFAULT_USER: &str = "MatrixJava";
pub const DEFAULT_ORG: &str = "ByteBashersLabs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub user: String,
    pub org: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubjectError {
    #[error("Please provide both a GitHub user and organization.")]
    MissingHandles,
}

/// Strips a leading `@` and surrounding whitespace. Idempotent.
pub fn sanitize_handle(input: &str) -> String {
    input.trim().trim_start_matches('@').trim().to_string()
}

/// Resolves the subject pair from raw query values, stored preferences and
/// the configured defaults. Empty-after-sanitizing counts as absent, except
/// on explicit resubmission where both fields are required.
pub fn resolve(
    query_user: Option<&str>,
    query_org: Option<&str>,
    stored_user: Option<&str>,
    stored_org: Option<&str>,
    default_user: &str,
    default_org: &str,
) -> Result<Subject, SubjectError> {
    let query_user = query_user.map(sanitize_handle);
    let query_org = query_org.map(sanitize_handle);

    // Both fields present means the user submitted the form: no partial
    // resubmission, both handles must survive sanitizing.
    if let (Some(user), Some(org)) = (query_user.as_deref(), query_org.as_deref()) {
        if user.is_empty() || org.is_empty() {
            return Err(SubjectError::MissingHandles);
        }
        return Ok(Subject {
            user: user.to_string(),
            org: org.to_string(),
        });
    }

    Ok(Subject {
        user: pick(query_user, stored_user, default_user),
        org: pick(query_org, stored_org, default_org),
    })
}

fn pick(query: Option<String>, stored: Option<&str>, default: &str) -> String {
    if let Some(handle) = query {
        if !handle.is_empty() {
            return handle;
        }
    }
    if let Some(stored) = stored {
        let stored = sanitize_handle(stored);
        if !stored.is_empty() {
            return stored;
        }
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_at_and_whitespace() {
        assert_eq!(sanitize_handle("  @halfguru "), "halfguru");
        assert_eq!(sanitize_handle("@@nested"), "nested");
        assert_eq!(sanitize_handle("@ spaced"), "spaced");
        assert_eq!(sanitize_handle("plain"), "plain");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["  @Ada ", "@@x", "@ y ", "", "  ", "@"] {
            let once = sanitize_handle(raw);
            let twice = sanitize_handle(&once);
            assert_eq!(once, twice);
            assert!(!twice.starts_with('@'));
            assert_eq!(twice, twice.trim());
        }
    }

    #[test]
    fn query_wins_over_stored_and_default() {
        let subject = resolve(
            Some("Ada"),
            Some("Babbage"),
            Some("someone-else"),
            Some("other-org"),
            DEFAULT_USER,
            DEFAULT_ORG,
        )
        .unwrap();
        assert_eq!(subject.user, "Ada");
        assert_eq!(subject.org, "Babbage");
    }

    #[test]
    fn stored_wins_over_default_per_field() {
        let subject = resolve(
            None,
            None,
            Some("@stored-user"),
            None,
            DEFAULT_USER,
            DEFAULT_ORG,
        )
        .unwrap();
        assert_eq!(subject.user, "stored-user");
        assert_eq!(subject.org, DEFAULT_ORG);
    }

    #[test]
    fn resubmission_requires_both_handles() {
        let err = resolve(
            Some("Ada"),
            Some("   "),
            Some("stored"),
            Some("stored-org"),
            DEFAULT_USER,
            DEFAULT_ORG,
        )
        .unwrap_err();
        assert_eq!(err, SubjectError::MissingHandles);
    }

    #[test]
    fn single_empty_query_field_falls_through() {
        let subject = resolve(Some("@"), None, None, None, DEFAULT_USER, DEFAULT_ORG).unwrap();
        assert_eq!(subject.user, DEFAULT_USER);
        assert_eq!(subject.org, DEFAULT_ORG);
    }
}
