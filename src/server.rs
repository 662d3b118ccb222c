//! HTTP surface: the five view routes, static content passthrough, and the
//! same-origin GitHub proxy endpoint.

use crate::config::Config;
use crate::contributions::ContributionsClient;
use crate::error::AppError;
use crate::github::GithubClient;
use crate::markdown;
use crate::portfolio::{self, LiveSource, Portfolio};
use crate::render::{self, View};
use crate::storage::PrefStore;
use crate::subject;
use anyhow::Result;
use axum::{
    Router,
    extract::{Query, State},
    http::{
        Method, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

pub struct AppState {
    pub config: Config,
    pub source: LiveSource,
    pub prefs: PrefStore,
    generation: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let github = GithubClient::new(config.github_token.clone())?;
        let contributions = ContributionsClient::new()?;
        let prefs = PrefStore::new(config.prefs_path.clone());
        Ok(Self {
            source: LiveSource {
                github,
                contributions,
            },
            prefs,
            config,
            generation: AtomicU64::new(0),
        })
    }

    /// Tags a new load cycle with a monotonically increasing generation.
    fn begin_load(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// A settled load is current only if no newer load has started since.
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Writes back preferences for the halves that resolved, plus the
    /// aggregate snapshot. Best-effort throughout; the store serializes
    /// concurrent write-backs.
    fn persist(&self, portfolio: &Portfolio) {
        self.prefs.update(|prefs| {
            if portfolio.user.is_ok() {
                prefs.user = Some(portfolio.resolved_user.clone());
            }
            if portfolio.org.is_ok() {
                prefs.org = Some(portfolio.resolved_org.clone());
            }
            prefs.snapshot = Some(serde_json::json!({
                "user": portfolio.resolved_user,
                "org": portfolio.resolved_org,
                "status": portfolio.status().message,
                "loadedAt": chrono::Utc::now().to_rfc3339(),
            }));
        });
    }
}

#[derive(Deserialize)]
struct SubjectQuery {
    user: Option<String>,
    org: Option<String>,
}

#[derive(Deserialize)]
struct ProxyQuery {
    endpoint: Option<String>,
}

/// The proxy accepts only absolute upstream paths.
fn validate_endpoint(endpoint: Option<&str>) -> Result<&str, AppError> {
    match endpoint {
        Some(endpoint) if endpoint.starts_with('/') => Ok(endpoint),
        _ => Err(AppError::InvalidEndpoint),
    }
}

async fn view_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(query): Query<SubjectQuery>,
) -> Html<String> {
    let view = View::from_path(uri.path()).unwrap_or(View::Home);
    let prefs = state.prefs.load();

    let resolved = subject::resolve(
        query.user.as_deref(),
        query.org.as_deref(),
        prefs.user.as_deref(),
        prefs.org.as_deref(),
        &state.config.default_user,
        &state.config.default_org,
    );

    match resolved {
        Err(error) => Html(render::validation_page(view, &error.to_string())),
        Ok(subject) => {
            let generation = state.begin_load();
            info!(user = %subject.user, org = %subject.org, generation, "loading portfolio");

            let portfolio = portfolio::load(&state.source, subject, generation).await;

            if state.is_current(portfolio.generation) {
                state.persist(&portfolio);
            } else {
                debug!(
                    generation = portfolio.generation,
                    "newer load started, discarding settled results"
                );
            }

            Html(render::portfolio_page(view, &portfolio))
        }
    }
}

async fn resume_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let path = state.config.content_dir.join("resume.md");
    let document = match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(markdown::render_document(&text)),
        Err(error) => {
            debug!(%error, path = %path.display(), "resume document unavailable");
            Err("The resume document was not found.".to_string())
        }
    };
    Html(render::resume_page(document))
}

async fn serve_content(
    state: &AppState,
    name: &str,
    content_type: &'static str,
) -> Result<Response, AppError> {
    let bytes = tokio::fs::read(state.config.content_dir.join(name))
        .await
        .map_err(|_| AppError::NotFound)?;
    Ok(([(CONTENT_TYPE, content_type)], bytes).into_response())
}

async fn styles_handler(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    serve_content(&state, "styles.css", "text/css; charset=utf-8").await
}

async fn resume_source_handler(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    serve_content(&state, "resume.md", "text/markdown; charset=utf-8").await
}

async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    let endpoint = validate_endpoint(query.endpoint.as_deref())?;
    let upstream = state.source.github.forward(endpoint).await?;

    let content_type = upstream
        .content_type
        .and_then(|value| value.to_str().ok().map(str::to_string))
        .unwrap_or_else(|| "application/json; charset=utf-8".to_string());

    Ok((
        upstream.status,
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        upstream.body,
    )
        .into_response())
}

async fn fallback_handler() -> AppError {
    AppError::NotFound
}

pub async fn start(config: Config) -> Result<()> {
    let address = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config)?);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(view_handler))
        .route("/home", get(view_handler))
        .route("/projects", get(view_handler))
        .route("/activity", get(view_handler))
        .route("/contributions", get(view_handler))
        .route("/resume", get(resume_handler))
        .route("/styles.css", get(styles_handler))
        .route("/resume.md", get(resume_source_handler))
        .route("/api/github", get(proxy_handler))
        .fallback(fallback_handler)
        .layer(cors)
        .with_state(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_rejects_missing_or_relative_endpoints() {
        assert!(validate_endpoint(None).is_err());
        assert!(validate_endpoint(Some("users/ada")).is_err());
        assert!(validate_endpoint(Some("")).is_err());
        assert!(validate_endpoint(Some("https://evil.example")).is_err());
    }

    #[test]
    fn proxy_accepts_absolute_upstream_paths() {
        assert_eq!(validate_endpoint(Some("/users/ada")).unwrap(), "/users/ada");
        assert_eq!(
            validate_endpoint(Some("/orgs/acme/repos?per_page=100")).unwrap(),
            "/orgs/acme/repos?per_page=100"
        );
    }

    #[tokio::test]
    async fn generation_discards_stale_loads() {
        let state = AppState {
            config: Config {
                port: 0,
                github_token: None,
                default_user: "u".to_string(),
                default_org: "o".to_string(),
                content_dir: "content".into(),
                prefs_path: "unused.json".into(),
            },
            source: LiveSource {
                github: GithubClient::new(None).unwrap(),
                contributions: ContributionsClient::new().unwrap(),
            },
            prefs: PrefStore::new("unused.json".into()),
            generation: AtomicU64::new(0),
        };

        let first = state.begin_load();
        let second = state.begin_load();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }
}
