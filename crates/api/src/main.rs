use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use briefing_core::config::Settings;
use briefing_core::domain::{defaults, DailyAnalysis};
use briefing_core::storage;
use briefing_core::time::kst;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState {
        output_dir: Arc::new(settings.output_dir.clone()),
    };
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, output_dir = %settings.output_dir.display(), "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/analyses/latest", get(get_latest_analysis))
        .route("/analyses/:date", get(get_analysis_by_date))
        .route("/reports/:date", get(get_report_by_date))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    output_dir: Arc<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum AnalysisSource {
    Artifact,
    Placeholder,
}

#[derive(Debug, Serialize)]
struct ApiAnalysis {
    source: AnalysisSource,
    analysis: DailyAnalysis,
}

fn internal_error(err: anyhow::Error) -> StatusCode {
    tracing::error!(error = %format!("{err:#}"), "artifact read failed");
    sentry_anyhow::capture_anyhow(&err);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn parse_date(raw: &str) -> Result<NaiveDate, StatusCode> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| StatusCode::BAD_REQUEST)
}

/// Newest artifact, or the offline analysis for today when none exists yet.
async fn get_latest_analysis(
    State(state): State<AppState>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let latest = storage::latest_artifact(&state.output_dir)
        .await
        .map_err(internal_error)?;

    let Some((_, paths)) = latest else {
        let now = chrono::Utc::now();
        let today = kst::resolve_run_date(None, now).map_err(internal_error)?;
        return Ok(Json(ApiAnalysis {
            source: AnalysisSource::Placeholder,
            analysis: defaults::offline_analysis(&kst::korean_long_date(today), now),
        }));
    };

    let analysis = storage::load_analysis(&paths.json)
        .await
        .map_err(internal_error)?;
    Ok(Json(ApiAnalysis {
        source: AnalysisSource::Artifact,
        analysis,
    }))
}

async fn get_analysis_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let date = parse_date(&date)?;

    let paths = storage::artifact_for_date(&state.output_dir, date)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let analysis = storage::load_analysis(&paths.json)
        .await
        .map_err(internal_error)?;
    Ok(Json(ApiAnalysis {
        source: AnalysisSource::Artifact,
        analysis,
    }))
}

async fn get_report_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let date = parse_date(&date)?;
    let paths = storage::ArtifactPaths::for_date(&state.output_dir, date);

    match tokio::fs::read_to_string(&paths.html).await {
        Ok(html) => Ok(Html(html)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(StatusCode::NOT_FOUND),
        Err(err) => Err(internal_error(anyhow::Error::new(err).context(format!(
            "failed to read {}",
            paths.html.display()
        )))),
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when it parses, otherwise `info` so stage and fallback logs show by default.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_core::render::render_html;
    use chrono::Utc;

    #[test]
    fn log_filter_defaults_to_info() {
        use tracing::level_filters::LevelFilter;

        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("briefing_core=loud")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    fn state_in(dir: PathBuf) -> AppState {
        AppState {
            output_dir: Arc::new(dir),
        }
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("briefing-api-{}", uuid::Uuid::new_v4()))
    }

    async fn seed(dir: &std::path::Path, date: NaiveDate, label: &str) -> DailyAnalysis {
        let analysis = defaults::offline_analysis(label, Utc::now());
        storage::write_artifacts(dir, date, &analysis, &render_html(&analysis))
            .await
            .unwrap();
        analysis
    }

    #[tokio::test]
    async fn latest_without_artifacts_is_a_placeholder() {
        let Json(body) = get_latest_analysis(State(state_in(temp_dir())))
            .await
            .unwrap();
        assert_eq!(body.source, AnalysisSource::Placeholder);
        assert!(!body.analysis.ai_powered);
        assert_eq!(body.analysis.stocks, defaults::default_stocks());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["source"], "placeholder");
        assert_eq!(json["analysis"]["aiPowered"], false);
    }

    #[tokio::test]
    async fn latest_prefers_the_newest_artifact() {
        let dir = temp_dir();
        seed(&dir, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), "older").await;
        let newest = seed(&dir, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), "newest").await;

        let Json(body) = get_latest_analysis(State(state_in(dir.clone()))).await.unwrap();
        assert_eq!(body.source, AnalysisSource::Artifact);
        assert_eq!(body.analysis, newest);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn by_date_validates_and_finds_artifacts() {
        let dir = temp_dir();
        let seeded = seed(&dir, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), "d").await;
        let state = state_in(dir.clone());

        let Json(body) = get_analysis_by_date(State(state.clone()), Path("2026-10-19".to_string()))
            .await
            .unwrap();
        assert_eq!(body.analysis, seeded);

        let missing =
            get_analysis_by_date(State(state.clone()), Path("2026-10-18".to_string())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);

        let bad = get_analysis_by_date(State(state), Path("19-10-2026".to_string())).await;
        assert_eq!(bad.unwrap_err(), StatusCode::BAD_REQUEST);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn report_serves_persisted_html() {
        let dir = temp_dir();
        seed(&dir, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), "d").await;
        let state = state_in(dir.clone());

        let Html(html) = get_report_by_date(State(state.clone()), Path("2026-10-19".to_string()))
            .await
            .unwrap();
        assert!(html.contains("(+17%)"));

        let missing = get_report_by_date(State(state), Path("2026-01-01".to_string())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
