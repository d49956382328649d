//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use threadpull_core::pipeline::{
    CollectConfig, CollectReport, EnrichConfig, ProgressReporter, collect_run, enrich_run,
};
use threadpull_shared::{AppConfig, RunConfig, init_config, load_config, validate_bearer_token};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// threadpull — gather social threads and score them.
#[derive(Parser)]
#[command(
    name = "threadpull",
    version,
    about = "Collect post and reply identifiers from a live timeline, then enrich them.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run a collection: post pass, reply passes, dated JSON dataset.
    Collect {
        /// Search expression (defaults to the configured query).
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum posts to collect.
        #[arg(long)]
        posts: Option<usize>,

        /// Maximum replies per post.
        #[arg(long)]
        replies: Option<usize>,

        /// Output root directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Run date as YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Enrich a previously collected dataset with content and sentiment.
    Enrich {
        /// Root directory holding data/raw (defaults to configured output_dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Run date as YYYY-MM-DD selecting the input file (defaults to today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "threadpull=info",
        1 => "threadpull=debug",
        _ => "threadpull=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Collect {
            query,
            posts,
            replies,
            out,
            date,
        } => {
            cmd_collect(
                query.as_deref(),
                posts,
                replies,
                out.as_deref(),
                date.as_deref(),
            )
            .await
        }
        Command::Enrich { out, date } => cmd_enrich(out.as_deref(), date.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_collect(
    query: Option<&str>,
    posts: Option<usize>,
    replies: Option<usize>,
    out: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let app_config = load_config()?;

    let mut run_config = RunConfig::from(&app_config);
    if let Some(q) = query {
        run_config.query = q.to_string();
    }
    if let Some(n) = posts {
        run_config.post_quota = n;
    }
    if let Some(n) = replies {
        run_config.reply_quota = n;
    }

    let config = CollectConfig {
        run: run_config,
        session: app_config.session.clone(),
        output_root: resolve_output_root(&app_config, out),
        date: resolve_date(date)?,
    };

    info!(query = %config.run.query, posts = config.run.post_quota, "starting collection");

    let progress = BarProgress::new();
    let report = collect_run(&config, &progress).await?;
    progress.finish(&report);

    println!(
        "Collected {} posts / {} replies in {:.1}s -> {}",
        report.post_count,
        report.reply_count,
        report.elapsed.as_secs_f64(),
        report.output_path.display()
    );
    Ok(())
}

async fn cmd_enrich(out: Option<&str>, date: Option<&str>) -> Result<()> {
    let app_config = load_config()?;

    // Fail fast before touching the input file.
    validate_bearer_token(&app_config)?;

    let config = EnrichConfig {
        api: app_config.api.clone(),
        output_root: resolve_output_root(&app_config, out),
        date: resolve_date(date)?,
    };

    let report = enrich_run(&config).await?;

    println!(
        "Enriched {}/{} identifiers -> {}",
        report.enriched_count,
        report.id_count,
        report.output_path.display()
    );
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;
    print!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_output_root(config: &AppConfig, out: Option<&str>) -> PathBuf {
    let raw = out.unwrap_or(&config.defaults.output_dir);
    expand_home(raw)
}

/// Expand a leading `~/` against the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| eyre!("invalid date '{s}' (expected YYYY-MM-DD): {e}")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

// ---------------------------------------------------------------------------
// Progress bar
// ---------------------------------------------------------------------------

/// Progress reporting over an indicatif bar: phases as messages, one bar
/// tick per reply pass.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("valid progress template"),
        );
        Self { bar }
    }

    fn finish(&self, report: &CollectReport) {
        self.bar.finish_with_message(format!(
            "done: {} posts, {} replies",
            report.post_count, report.reply_count
        ));
    }
}

impl ProgressReporter for BarProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn post_started(&self, id: &str, current: usize, total: usize) {
        self.bar
            .set_message(format!("[{current}/{total}] replies for {id}"));
    }
}
