use crate::analysis::Analyzer;
use crate::config::Settings;
use crate::delivery::Dispatcher;
use crate::domain::DailyAnalysis;
use crate::news::NewsFetcher;
use crate::render::render_html;
use crate::storage::{write_artifacts, ArtifactPaths};
use crate::time::kst;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub run_date: NaiveDate,
    pub query: String,
    pub count: u32,
    pub output_dir: PathBuf,
    /// Build and persist everything, but do not send email.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_settings(settings: &Settings, run_date: NaiveDate) -> Self {
        Self {
            run_date,
            query: settings.news_query.clone(),
            count: settings.news_count,
            output_dir: settings.output_dir.clone(),
            dry_run: false,
        }
    }

    pub fn display_date(&self) -> String {
        kst::korean_long_date(self.run_date)
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub analysis: DailyAnalysis,
    pub artifacts: ArtifactPaths,
    pub delivered: bool,
}

/// Fetch → themes → stocks → insight → persist → dispatch, one stage at a time.
pub struct Pipeline {
    fetcher: NewsFetcher,
    analyzer: Analyzer,
    dispatcher: Dispatcher,
}

impl Pipeline {
    pub fn new(fetcher: NewsFetcher, analyzer: Analyzer, dispatcher: Dispatcher) -> Self {
        Self {
            fetcher,
            analyzer,
            dispatcher,
        }
    }

    pub fn from_settings(settings: &Settings, opts: &RunOptions) -> anyhow::Result<Self> {
        Ok(Self::new(
            NewsFetcher::from_settings(settings, opts.display_date())?,
            Analyzer::from_settings(settings)?,
            Dispatcher::from_settings(settings)?,
        ))
    }

    /// Only persistence errors escape; every external call degrades to defaults.
    pub async fn run(&self, opts: &RunOptions, now: DateTime<Utc>) -> anyhow::Result<RunReport> {
        let date = opts.display_date();
        tracing::info!(
            run_date = %opts.run_date,
            %date,
            news_live = self.fetcher.is_live(),
            ai_powered = self.analyzer.is_ai_powered(),
            variant = %self.analyzer.variant(),
            email = self.dispatcher.is_configured(),
            "daily analysis started"
        );

        tracing::info!(stage = "fetch", query = %opts.query, count = opts.count, "collecting news");
        let news = self.fetcher.fetch_news(&opts.query, opts.count).await;
        tracing::info!(stage = "fetch", news = news.len(), "news collected");

        tracing::info!(stage = "themes", "analyzing themes");
        let sectors = self.analyzer.analyze_themes(&news).await;
        tracing::info!(stage = "themes", sectors = sectors.len(), "themes analyzed");

        tracing::info!(stage = "stocks", "recommending stocks");
        let stocks = self.analyzer.recommend_stocks(&sectors, &news).await;
        tracing::info!(stage = "stocks", stocks = stocks.len(), "stocks recommended");

        tracing::info!(stage = "insight", "summarizing insight");
        let insight = self.analyzer.summarize_insight(&sectors, &stocks).await;
        tracing::info!(stage = "insight", insight_len = insight.chars().count(), "insight ready");

        let analysis = DailyAnalysis {
            date,
            news,
            sectors,
            stocks,
            insight: Some(insight),
            generated_at: now,
            ai_powered: self.analyzer.is_ai_powered(),
        };

        tracing::info!(stage = "persist", dir = %opts.output_dir.display(), "writing artifacts");
        let html = render_html(&analysis);
        let artifacts = write_artifacts(&opts.output_dir, opts.run_date, &analysis, &html).await?;
        tracing::info!(
            stage = "persist",
            json = %artifacts.json.display(),
            html = %artifacts.html.display(),
            "artifacts written"
        );

        let delivered = if opts.dry_run {
            tracing::info!(stage = "dispatch", "dry run; skipping email");
            false
        } else {
            tracing::info!(stage = "dispatch", "sending report");
            self.dispatcher.send_report(&html, &analysis.date).await
        };
        tracing::info!(stage = "dispatch", delivered, "daily analysis finished");

        Ok(RunReport {
            analysis,
            artifacts,
            delivered,
        })
    }
}
