//! Section renderers: pure projections from load outcomes to HTML
//! fragments, plus the page shell that stitches them into a document.
//!
//! Every renderer owns its own failure state; a failed section shows a
//! named placeholder instead of stale or missing markup. No section looks
//! at another section's outcome, except that cross-links use the resolved
//! org handle when the org profile loaded.

use crate::graph::{self, Theme};
use crate::markdown::escape_html;
use crate::models::{Event, Org, Repo, User};
use crate::portfolio::{Outcome, Portfolio, Status, Tone};
use chrono::{DateTime, Utc};

const API_REPOS_PREFIX: &str = "https://api.github.com/repos/";
const WEB_ROOT: &str = "https://github.com/";

/// Hard-coded description fallback for one well-known organization. An
/// override table, not a general templating rule.
const ORG_DESCRIPTION_OVERRIDES: &[(&str, &str)] = &[(
    "bytebasherslabs",
    "ByteBashers Labs builds open-source developer tooling and runs collaborative build nights.",
)];

const NO_ORG_DESCRIPTION: &str = "No organization description provided.";
const DEFAULT_HEADLINE: &str = "Builder, debugger, and open-source collaborator.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Projects,
    Activity,
    Contributions,
    Resume,
}

impl View {
    pub fn from_path(path: &str) -> Option<View> {
        match path {
            "/" | "/home" => Some(View::Home),
            "/projects" => Some(View::Projects),
            "/activity" => Some(View::Activity),
            "/contributions" => Some(View::Contributions),
            "/resume" => Some(View::Resume),
            _ => None,
        }
    }

    fn title(self) -> &'static str {
        match self {
            View::Home => "Overview",
            View::Projects => "Projects",
            View::Activity => "Activity",
            View::Contributions => "Contributions",
            View::Resume => "Resume",
        }
    }
}

pub fn format_date(when: &DateTime<Utc>) -> String {
    when.format("%b %-d, %Y").to_string()
}

pub fn placeholder(message: &str) -> String {
    format!("<p class=\"placeholder\">{}</p>\n", escape_html(message))
}

fn metric_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>\n",
        escape_html(label),
        escape_html(value)
    )
}

pub fn user_metrics(user: &User) -> String {
    let mut html = String::from("<div class=\"metric-grid\">\n");
    html.push_str(&metric_card("Public Repos", &user.public_repos.to_string()));
    html.push_str(&metric_card("Public Gists", &user.public_gists.to_string()));
    html.push_str(&metric_card("Followers", &user.followers.to_string()));
    html.push_str(&metric_card("Following", &user.following.to_string()));
    html.push_str("</div>\n");
    html
}

pub fn user_metrics_section(outcome: &Outcome<User>) -> String {
    match outcome {
        Ok(user) => user_metrics(user),
        Err(_) => placeholder("Personal profile metrics unavailable right now."),
    }
}

fn org_description(org: &Org) -> String {
    if let Some(description) = &org.description {
        return description.clone();
    }
    for (handle, text) in ORG_DESCRIPTION_OVERRIDES {
        if org.login.eq_ignore_ascii_case(handle) {
            return (*text).to_string();
        }
    }
    NO_ORG_DESCRIPTION.to_string()
}

pub fn org_summary(org: &Org) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<p class=\"org-heading\">Organization Snapshot (@{})</p>\n",
        escape_html(&org.login)
    ));
    html.push_str("<div class=\"org-summary-grid\">\n");
    html.push_str(&metric_card(
        "Org Name",
        org.name.as_deref().unwrap_or(&org.login),
    ));
    html.push_str(&metric_card("Public Repos", &org.public_repos.to_string()));
    html.push_str(&metric_card("Followers", &org.followers.to_string()));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<p class=\"org-description\">{}</p>\n",
        escape_html(&org_description(org))
    ));
    html
}

pub fn org_summary_section(outcome: &Outcome<Org>, requested: &str) -> String {
    match outcome {
        Ok(org) => org_summary(org),
        Err(_) => placeholder(&format!(
            "Organization summary unavailable for @{requested}."
        )),
    }
}

pub fn repo_card(repo: &Repo) -> String {
    let description = repo
        .description
        .as_deref()
        .unwrap_or("No description provided.");
    let language = repo.language.as_deref().unwrap_or("n/a");
    let updated = repo
        .pushed_at
        .as_ref()
        .map(format_date)
        .unwrap_or_else(|| "never".to_string());

    format!(
        concat!(
            "<article class=\"repo-card\">\n",
            "<h3><a href=\"{url}\" target=\"_blank\" rel=\"noreferrer\">{name}</a></h3>\n",
            "<p>{description}</p>\n",
            "<div class=\"repo-meta\">",
            "<span><strong>{language}</strong></span>",
            "<span>Stars: {stars}</span>",
            "<span>Forks: {forks}</span>",
            "<span>Updated: {updated}</span>",
            "</div>\n",
            "</article>\n",
        ),
        url = escape_html(&repo.html_url),
        name = escape_html(&repo.name),
        description = escape_html(description),
        language = escape_html(language),
        stars = repo.stargazers_count,
        forks = repo.forks_count,
        updated = escape_html(&updated),
    )
}

pub fn repo_grid(repos: &[Repo], empty_message: &str) -> String {
    if repos.is_empty() {
        return placeholder(empty_message);
    }
    repos.iter().map(|repo| repo_card(repo)).collect()
}

pub fn repo_grid_section(
    outcome: &Outcome<Vec<Repo>>,
    empty_message: &str,
    unavailable_message: &str,
) -> String {
    match outcome {
        Ok(repos) => repo_grid(repos, empty_message),
        Err(_) => placeholder(unavailable_message),
    }
}

/// Fixed mapping from event kind to a human phrase.
pub fn event_label(event: &Event) -> String {
    let repo = &event.repo.name;
    match event.kind.as_str() {
        "PushEvent" => format!("Pushed commits to {repo}"),
        "PullRequestEvent" => format!(
            "{} pull request in {repo}",
            event.payload.action.as_deref().unwrap_or("Updated")
        ),
        "IssuesEvent" => format!(
            "{} issue in {repo}",
            event.payload.action.as_deref().unwrap_or("Updated")
        ),
        "IssueCommentEvent" => format!("Commented on an issue in {repo}"),
        "PullRequestReviewEvent" => format!("Reviewed a pull request in {repo}"),
        "CreateEvent" => format!(
            "Created {} in {repo}",
            event.payload.ref_type.as_deref().unwrap_or("item")
        ),
        kind => format!("{} in {repo}", kind.strip_suffix("Event").unwrap_or(kind)),
    }
}

/// Derives the web URL for an event's repository from its API URL.
pub fn repo_web_url(api_url: &str) -> String {
    api_url.replacen(API_REPOS_PREFIX, WEB_ROOT, 1)
}

pub fn activity_feed(events: &[Event]) -> String {
    if events.is_empty() {
        return placeholder("No recent public activity yet.");
    }

    let mut html = String::new();
    for event in events {
        html.push_str(&format!(
            concat!(
                "<article class=\"activity-item\">",
                "<a href=\"{url}\" target=\"_blank\" rel=\"noreferrer\">{label}</a><br>",
                "<time datetime=\"{stamp}\">{date}</time>",
                "</article>\n",
            ),
            url = escape_html(&repo_web_url(&event.repo.url)),
            label = escape_html(&event_label(event)),
            stamp = event.created_at.to_rfc3339(),
            date = format_date(&event.created_at),
        ));
    }
    html
}

pub fn activity_section(outcome: &Outcome<Vec<Event>>) -> String {
    match outcome {
        Ok(events) => activity_feed(events),
        Err(_) => placeholder("Personal activity feed unavailable right now."),
    }
}

pub fn contribution_section(portfolio: &Portfolio) -> String {
    match &portfolio.contributions {
        Some(Ok(calendar)) => {
            graph::generate_graph(calendar, &portfolio.resolved_user, Theme::Dark)
        }
        Some(Err(_)) | None => placeholder("GitHub contribution chart unavailable."),
    }
}

fn org_profile_url(portfolio: &Portfolio) -> String {
    match &portfolio.org {
        Ok(org) => org.html_url.clone(),
        Err(_) => format!("{WEB_ROOT}{}", portfolio.resolved_org),
    }
}

/// Hero header: profile identity on success, a degraded-but-usable header
/// when the user read failed. Org cross-links always come from the
/// resolved org handle.
pub fn hero(portfolio: &Portfolio) -> String {
    let org_url = org_profile_url(portfolio);
    let org_handle = escape_html(&portfolio.resolved_org);

    let (display_name, headline, bio_line, user_url) = match &portfolio.user {
        Ok(user) => (
            user.name.clone().unwrap_or_else(|| user.login.clone()),
            user.bio.clone().unwrap_or_else(|| DEFAULT_HEADLINE.to_string()),
            format!(
                "Tracking public work from @{}, plus open-source builds with @{}.",
                user.login, portfolio.resolved_org
            ),
            user.html_url.clone(),
        ),
        Err(_) => (
            portfolio.resolved_user.clone(),
            DEFAULT_HEADLINE.to_string(),
            format!(
                "Unable to load @{} profile right now. Organization feed still available below.",
                portfolio.resolved_user
            ),
            format!("{WEB_ROOT}{}", portfolio.resolved_user),
        ),
    };

    format!(
        concat!(
            "<section class=\"hero\">\n",
            "<h1 id=\"display-name\">{name} <span class=\"cursor\">_</span></h1>\n",
            "<p class=\"headline\">{headline}</p>\n",
            "<p class=\"bio\">{bio}</p>\n",
            "<p class=\"org-line\">Open-source with ",
            "<a href=\"{org_url}\" target=\"_blank\" rel=\"noreferrer\">@{org}</a></p>\n",
            "<p class=\"contact\">",
            "<a href=\"{user_url}\" target=\"_blank\" rel=\"noreferrer\">GitHub @{user}</a>",
            "</p>\n",
            "</section>\n",
        ),
        name = escape_html(&display_name),
        headline = escape_html(&headline),
        bio = escape_html(&bio_line),
        org_url = escape_html(&org_url),
        org = org_handle,
        user_url = escape_html(&user_url),
        user = escape_html(&portfolio.resolved_user),
    )
}

pub fn status_line(status: &Status) -> String {
    let tone_class = match status.tone {
        Tone::Default => "",
        Tone::Warning => " warning",
        Tone::Error => " error",
    };
    format!(
        "<p id=\"status-text\" class=\"status{tone_class}\">{}</p>\n",
        escape_html(&status.message)
    )
}

fn section(title: &str, body: &str) -> String {
    format!(
        "<section>\n<h2>{}</h2>\n{}</section>\n",
        escape_html(title),
        body
    )
}

fn page_shell(view: View, user_value: &str, org_value: &str, status_html: &str, main: &str) -> String {
    let nav: String = [
        ("/", "Overview"),
        ("/projects", "Projects"),
        ("/activity", "Activity"),
        ("/contributions", "Contributions"),
        ("/resume", "Resume"),
    ]
    .iter()
    .map(|(href, label)| format!("<a href=\"{href}\">{label}</a>"))
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        concat!(
            "<!doctype html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>devfolio — {title}</title>\n",
            "<link rel=\"stylesheet\" href=\"/styles.css\">\n",
            "</head>\n",
            "<body>\n",
            "<nav>\n{nav}\n</nav>\n",
            "<form id=\"github-form\" method=\"get\" action=\"/\">\n",
            "<input id=\"github-user\" name=\"user\" value=\"{user}\" placeholder=\"GitHub user\">\n",
            "<input id=\"github-org\" name=\"org\" value=\"{org}\" placeholder=\"GitHub org\">\n",
            "<button type=\"submit\">Load</button>\n",
            "</form>\n",
            "{status}",
            "<main>\n{main}</main>\n",
            "</body>\n",
            "</html>\n",
        ),
        title = view.title(),
        nav = nav,
        user = escape_html(user_value),
        org = escape_html(org_value),
        status = status_html,
        main = main,
    )
}

/// Assembles the full document for one settled load.
pub fn portfolio_page(view: View, portfolio: &Portfolio) -> String {
    let user = &portfolio.resolved_user;
    let org = &portfolio.resolved_org;
    let status = portfolio.status();

    let repos_title = format!("Personal Repositories (@{user})");
    let org_repos_title = format!("Organization Repositories (@{org})");
    let activity_title = format!("Personal Public Activity (@{user})");

    let mut main = String::new();
    match view {
        // /resume is normally served by its own handler; if it arrives here
        // it gets the full overview.
        View::Home | View::Resume => {
            main.push_str(&hero(portfolio));
            main.push_str(&section(
                "Profile Metrics",
                &user_metrics_section(&portfolio.user),
            ));
            main.push_str(&section(
                "Organization",
                &org_summary_section(&portfolio.org, &portfolio.subject.org),
            ));
            main.push_str(&section(
                &repos_title,
                &repo_grid_section(
                    &portfolio.user_repos,
                    "No public personal repositories found.",
                    "Personal repositories unavailable right now.",
                ),
            ));
            main.push_str(&section(
                &org_repos_title,
                &repo_grid_section(
                    &portfolio.org_repos,
                    "No public organization repositories found.",
                    "Organization repositories unavailable right now.",
                ),
            ));
            main.push_str(&section(&activity_title, &activity_section(&portfolio.events)));
            main.push_str(&section("Contributions", &contribution_section(portfolio)));
        }
        View::Projects => {
            main.push_str(&section(
                &repos_title,
                &repo_grid_section(
                    &portfolio.user_repos,
                    "No public personal repositories found.",
                    "Personal repositories unavailable right now.",
                ),
            ));
            main.push_str(&section(
                &org_repos_title,
                &repo_grid_section(
                    &portfolio.org_repos,
                    "No public organization repositories found.",
                    "Organization repositories unavailable right now.",
                ),
            ));
        }
        View::Activity => {
            main.push_str(&section(&activity_title, &activity_section(&portfolio.events)));
        }
        View::Contributions => {
            main.push_str(&section("Contributions", &contribution_section(portfolio)));
        }
    }

    page_shell(view, user, org, &status_line(&status), &main)
}

/// Page for a rejected load: the validation message in the status line and
/// no section content.
pub fn validation_page(view: View, message: &str) -> String {
    let status = Status {
        message: message.to_string(),
        tone: Tone::Error,
    };
    page_shell(view, "", "", &status_line(&status), "")
}

/// Resume view: rendered markdown on success, a placeholder plus its own
/// status line on failure.
pub fn resume_page(document: Result<String, String>) -> String {
    match document {
        Ok(body) => {
            let status = Status {
                message: "Loaded resume.".to_string(),
                tone: Tone::Default,
            };
            page_shell(
                View::Resume,
                "",
                "",
                &status_line(&status),
                &format!("<article class=\"resume\">\n{body}</article>\n"),
            )
        }
        Err(error) => {
            let status = Status {
                message: format!("Failed to load resume. {error}"),
                tone: Tone::Error,
            };
            page_shell(
                View::Resume,
                "",
                "",
                &status_line(&status),
                &placeholder("Resume unavailable right now."),
            )
        }
    }
}
