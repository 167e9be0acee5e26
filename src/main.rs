//! `schedule-parser` CLI - extract class entries from timetable pages

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use schedule_parser::config::load_settings;

#[derive(Parser)]
#[command(name = "schedule-parser")]
#[command(about = "Extract class entries from university timetable PDFs")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a timetable page into class entries
    Parse {
        /// Timetable PDF, or a JSON dump of text runs
        input: PathBuf,

        /// Reference year for dates (default: config file, then current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Vertical merge tolerance in line heights
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Pretend today is this date (YYYY-MM-DD) when resolving years
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Assemble parsed pairs into a conflict-checked schedule
        #[arg(short, long)]
        schedule: bool,
    },

    /// Show merged cells of a page
    Cells {
        /// Timetable PDF, or a JSON dump of text runs
        input: PathBuf,

        /// Vertical merge tolerance in line heights
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show calibrated time-slot columns of a page
    Grid {
        /// Timetable PDF, or a JSON dump of text runs
        input: PathBuf,

        /// Vertical merge tolerance in line heights
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Render a page to PNG
    #[cfg(feature = "pdf")]
    Preview {
        /// Timetable PDF
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Render resolution
        #[arg(long, default_value_t = schedule_parser::pdf::DEFAULT_PREVIEW_DPI)]
        dpi: f32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Parse {
            input,
            year,
            threshold,
            page,
            today,
            format,
            schedule,
        } => {
            let settings = load_settings()?.with_overrides(year, threshold);
            cmd::parse::cmd_parse(&input, &settings, page, today, format, schedule)?;
        }
        Commands::Cells {
            input,
            threshold,
            page,
            format,
        } => {
            let settings = load_settings()?.with_overrides(None, threshold);
            cmd::cells::cmd_cells(&input, &settings, page, format)?;
        }
        Commands::Grid {
            input,
            threshold,
            page,
            format,
        } => {
            let settings = load_settings()?.with_overrides(None, threshold);
            cmd::grid::cmd_grid(&input, &settings, page, format)?;
        }
        #[cfg(feature = "pdf")]
        Commands::Preview {
            input,
            output,
            page,
            dpi,
        } => {
            cmd::preview::cmd_preview(&input, &output, page, dpi)?;
        }
    }

    Ok(())
}
