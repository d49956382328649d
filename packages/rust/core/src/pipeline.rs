//! End-to-end run workflows: collect (session → posts → replies → dataset)
//! and enrich (dataset → content fetch → sentiment → enriched dataset).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use threadpull_browser::{Browser, establish_session};
use threadpull_collector::{PassOptions, collect_posts, collect_replies};
use threadpull_enrichment::ContentClient;
use threadpull_shared::{
    ApiConfig, CollectionResult, Post, Result, RunConfig, SessionConfig, ThreadpullError,
};

use crate::output;

// ---------------------------------------------------------------------------
// Collect
// ---------------------------------------------------------------------------

/// Everything one collection run needs.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Merged runtime knobs (query, quotas, round ceiling, scroll wait).
    pub run: RunConfig,
    /// Browser session settings.
    pub session: SessionConfig,
    /// Root directory for `data/raw` output.
    pub output_root: PathBuf,
    /// Run date, stamped on every collected post and the output filename.
    pub date: NaiveDate,
}

/// Summary of a completed collection run.
#[derive(Debug)]
pub struct CollectReport {
    /// Where the dataset was written.
    pub output_path: PathBuf,
    /// Number of top-level posts collected.
    pub post_count: usize,
    /// Total replies collected across all posts.
    pub reply_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each post's reply pass.
    fn post_started(&self, id: &str, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn post_started(&self, _id: &str, _current: usize, _total: usize) {}
}

/// Run a full collection: acquire the session, collect post identifiers from
/// the search timeline, collect replies per post strictly sequentially, and
/// write the dated dataset.
///
/// The WebDriver session is the run's one shared resource; it is released on
/// every exit path, including when a pass fails mid-run. A failed run writes
/// no output file — posts already collected in memory are discarded.
#[instrument(skip_all, fields(query = %config.run.query, date = %config.date))]
pub async fn collect_run(
    config: &CollectConfig,
    progress: &dyn ProgressReporter,
) -> Result<CollectReport> {
    let start = Instant::now();

    progress.phase("Opening browser session");
    let browser = Browser::connect(&config.session.webdriver_url, config.session.headless).await?;

    // The session must be released on every exit path; run the fallible body
    // first, quit, then propagate its outcome.
    let outcome = run_passes(&browser, config, progress).await;
    if let Err(e) = browser.quit().await {
        warn!(error = %e, "failed to close webdriver session");
    }
    let result = outcome?;

    progress.phase("Writing dataset");
    let output_path = output::raw_output_path(&config.output_root, config.date);
    output::write_json(&output_path, &result)?;

    let report = CollectReport {
        output_path,
        post_count: result.posts.len(),
        reply_count: result.posts.iter().map(|p| p.replies.len()).sum(),
        elapsed: start.elapsed(),
    };

    info!(
        posts = report.post_count,
        replies = report.reply_count,
        elapsed_ms = report.elapsed.as_millis(),
        path = %report.output_path.display(),
        "collection run complete"
    );

    Ok(report)
}

/// The fallible body of a run, separated so the caller can release the
/// session regardless of how this returns.
async fn run_passes(
    browser: &Browser,
    config: &CollectConfig,
    progress: &dyn ProgressReporter,
) -> Result<CollectionResult> {
    progress.phase("Establishing session");
    establish_session(browser, &config.session).await?;

    let scroll_wait = Duration::from_millis(config.run.scroll_wait_ms);

    progress.phase("Collecting posts");
    let mut search =
        threadpull_browser::SearchTimeline::open(browser, &config.run.query, scroll_wait).await?;
    let post_opts = PassOptions {
        quota: config.run.post_quota,
        max_rounds: config.run.max_rounds,
    };
    let post_ids = collect_posts(&mut search, &post_opts).await?;
    info!(count = post_ids.len(), quota = post_opts.quota, "post pass done");

    let reply_opts = PassOptions {
        quota: config.run.reply_quota,
        max_rounds: config.run.max_rounds,
    };

    let mut posts = Vec::with_capacity(post_ids.len());
    let total = post_ids.len();
    for (i, id) in post_ids.into_iter().enumerate() {
        progress.post_started(&id, i + 1, total);
        let mut conversation =
            threadpull_browser::ConversationPage::open(browser, &id, scroll_wait).await?;
        let replies = collect_replies(&mut conversation, &reply_opts).await?;
        info!(post = %id, replies = replies.len(), "reply pass done");
        posts.push(Post {
            id,
            replies,
            collected_on: config.date,
        });
    }

    Ok(CollectionResult { posts })
}

// ---------------------------------------------------------------------------
// Enrich
// ---------------------------------------------------------------------------

/// Everything one enrichment run needs.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Content API settings.
    pub api: ApiConfig,
    /// Root directory holding `data/raw` and receiving `data/processed`.
    pub output_root: PathBuf,
    /// Run date selecting the input file and naming the output file.
    pub date: NaiveDate,
}

/// Summary of a completed enrichment run.
#[derive(Debug)]
pub struct EnrichReport {
    /// Where the enriched dataset was written.
    pub output_path: PathBuf,
    /// Unique identifiers flattened from the raw dataset.
    pub id_count: usize,
    /// Posts actually enriched (unavailable ids are dropped).
    pub enriched_count: usize,
}

/// Enrich a previously collected dataset: flatten ids, fetch full content,
/// score sentiment, write the processed file.
#[instrument(skip_all, fields(date = %config.date))]
pub async fn enrich_run(config: &EnrichConfig) -> Result<EnrichReport> {
    let input_path = output::raw_output_path(&config.output_root, config.date);
    let result = output::load_result(&input_path)?;

    let token = std::env::var(&config.api.bearer_token_env).map_err(|_| {
        ThreadpullError::config(format!(
            "content API bearer token not found. Set the {} environment variable.",
            config.api.bearer_token_env
        ))
    })?;

    let client = ContentClient::new(&config.api.base_url, &token)?;
    let enriched = threadpull_enrichment::enrich(&result, &client).await?;

    let output_path = output::processed_output_path(&config.output_root, config.date);
    output::write_json(&output_path, &enriched)?;

    let report = EnrichReport {
        output_path,
        id_count: threadpull_enrichment::flatten_ids(&result).len(),
        enriched_count: enriched.len(),
    };

    info!(
        ids = report.id_count,
        enriched = report.enriched_count,
        path = %report.output_path.display(),
        "enrichment run complete"
    );

    Ok(report)
}
