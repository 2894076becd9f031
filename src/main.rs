use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use xfer_summary::config::{ColorMode, Config, Overrides};
use xfer_summary::summary::render::style_for;
use xfer_summary::summary::{self, Reporter};
use xfer_summary::trace;
use xfer_summary::trace::event::Category;

/// Summarise memory-transfer bandwidth per channel and transfer size.
#[derive(Parser)]
#[command(name = "xfer-summary", about)]
struct Cli {
    /// JSON Lines trace to summarise, or "-" for stdin.
    trace: Option<PathBuf>,

    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logging verbosity level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// When to colour report headers.
    #[arg(long, value_enum)]
    color: Option<ColorMode>,

    /// Report only this category (repeatable), e.g. --category mram_read.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Report only this channel id (repeatable).
    #[arg(long = "channel")]
    channels: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print version information and exit.
    Version,
    /// List the category labels accepted by --category.
    Categories,
}

/// Build-time version info.
mod version {
    /// Release version string (set at build time).
    pub const RELEASE: &str = env!("CARGO_PKG_VERSION");

    /// Git commit hash (set at build time via build.rs, or "unknown").
    pub fn git_commit() -> &'static str {
        option_env!("GIT_COMMIT").unwrap_or("unknown")
    }

    pub fn full() -> String {
        format!(
            "{} (commit: {}, {}/{})",
            RELEASE,
            git_commit(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Version) => {
            println!("xfer-summary {}", version::full());
            return Ok(());
        }
        Some(Command::Categories) => {
            for c in Category::all() {
                println!("{:<12}{}", c.as_str(), c.display_name());
            }
            return Ok(());
        }
        None => {}
    }

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    cfg.apply_overrides(Overrides {
        log_level: cli.log_level.clone(),
        color: cli.color,
        categories: cli.categories.clone(),
        channels: cli.channels.clone(),
    });
    cfg.validate().context("invalid options")?;

    // Logs go to stderr so the report on stdout stays clean.
    let filter = EnvFilter::try_new(&cfg.log_level)
        .with_context(|| format!("invalid log level: {}", cfg.log_level))?;
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let trace_path = cli
        .trace
        .context("a trace path is required (use - for stdin, --help for usage)")?;

    tracing::info!(
        version = version::RELEASE,
        trace = %trace_path.display(),
        "summarising trace",
    );

    let traces = trace::load(&trace_path)?;

    let stdout = io::stdout();
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let reporter = Reporter::new(style_for(cfg.color, stdout.is_terminal(), no_color));

    summary::write_all(
        &traces,
        &cfg.selected_categories(),
        |channel| cfg.includes_channel(channel),
        &reporter,
        stdout.lock(),
    )
    .context("writing report")
}
