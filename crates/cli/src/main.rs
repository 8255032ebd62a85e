mod config;
mod merge_cmd;
mod output;
mod pane;
mod view_cmd;

use agentview_core::once::ensure_global;
use agentview_core::AggregatePolicy;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agentview", about = "agentview - merge and page agent session timelines")]
struct Cli {
    /// Read configuration from this file instead of ~/.config/agentview/
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two message files into one ordered timeline (JSON)
    Merge {
        /// Earlier source; wins on duplicate idx
        first: PathBuf,
        second: PathBuf,

        /// Drop messages without content, tool calls, commits or external payload
        #[arg(long)]
        drop_empty: bool,
    },

    /// Print the visible window of a timeline
    View {
        /// Message files (JSON array or JSON lines), merged left to right
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Load this many chunks of older messages
        #[arg(long, default_value_t = 0)]
        older: usize,

        /// Override the number of latest messages shown
        #[arg(long)]
        baseline: Option<usize>,

        #[arg(long)]
        drop_empty: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show or initialize configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn init_logging() {
    ensure_global("tracing-subscriber", || {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::WARN.into()),
            )
            .init();
    });
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Merge {
            first,
            second,
            drop_empty,
        } => {
            let settings = config::load_config(cli.config.as_deref())?;
            let policy = AggregatePolicy {
                drop_empty: drop_empty || settings.aggregation.drop_empty_messages,
            };
            merge_cmd::run_merge(&[first, second], &policy)
        }
        Commands::View {
            files,
            older,
            baseline,
            drop_empty,
            format,
        } => {
            let settings = config::load_config(cli.config.as_deref())?;
            let args = view_cmd::ViewArgs {
                files,
                older,
                baseline,
                drop_empty,
                format,
            };
            view_cmd::run_view(&args, &settings)
        }
        Commands::Config { init } => {
            if init {
                config::init_config()
            } else {
                config::show_config(cli.config.as_deref())
            }
        }
    }
}
