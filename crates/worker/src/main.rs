use clap::Parser;
use std::path::PathBuf;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use briefing_core::analysis::AnalysisVariant;
use briefing_core::config::Settings;
use briefing_core::pipeline::{Pipeline, RunOptions};
use briefing_core::time::kst;

#[derive(Debug, Parser)]
#[command(name = "briefing_worker")]
struct Args {
    /// Run date (YYYY-MM-DD). Defaults to today's KST date.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Build and persist the report, but do not send email.
    #[arg(long)]
    dry_run: bool,

    /// Prompt variant: simple | advanced. Overrides ANALYSIS_VARIANT.
    #[arg(long)]
    variant: Option<AnalysisVariant>,

    /// News search query. Overrides NEWS_QUERY.
    #[arg(long)]
    query: Option<String>,

    /// Number of news items to request (1-100). Overrides NEWS_COUNT.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    count: Option<u32>,

    /// Artifact directory. Overrides OUTPUT_DIR.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(variant) = self.variant {
            settings.analysis_variant = variant;
        }
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            settings.news_query = query.to_string();
        }
        if let Some(count) = self.count {
            settings.news_count = count;
        }
        if let Some(dir) = self.output_dir.clone() {
            settings.output_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    args.apply(&mut settings);

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("daily_run", %run_id);

    match run(&settings, &args).instrument(span).await {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!(%run_id, error = %format!("{err:#}"), "daily run failed");
            sentry_anyhow::capture_anyhow(&err);
            Err(err)
        }
    }
}

async fn run(settings: &Settings, args: &Args) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let run_date = kst::resolve_run_date(args.as_of_date.as_deref(), now)?;

    let mut opts = RunOptions::from_settings(settings, run_date);
    opts.dry_run = args.dry_run;

    let pipeline = Pipeline::from_settings(settings, &opts)?;
    let report = pipeline.run(&opts, now).await?;

    tracing::info!(
        %run_date,
        ai_powered = report.analysis.ai_powered,
        sectors = report.analysis.sectors.len(),
        stocks = report.analysis.stocks.len(),
        json = %report.artifacts.json.display(),
        html = %report.artifacts.html.display(),
        delivered = report.delivered,
        dry_run = opts.dry_run,
        "daily run complete"
    );
    Ok(())
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
