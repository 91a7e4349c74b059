use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pane_balance::balance::Direction;
use pane_balance::command::{self, Command};
use pane_balance::config::Config;
use pane_balance::path::Path;
use pane_balance::provider::{FileLayoutProvider, LayoutProvider};

#[derive(Parser)]
#[command(name = "pane-balance", about = "Rebalance editor split layouts")]
struct Cli {
    /// Layout document to operate on (overrides the configured path)
    #[arg(short, long, global = true)]
    layout: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layout tree
    Show,
    /// Print the total size of the root groups
    Sum,
    /// Give every split below a vertical root equal widths
    Equalize,
    /// Move space between the first two groups of a split
    Shift {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Grow (positive) or shrink (negative) the group at PATH
    Resize {
        /// Comma-separated child indices, e.g. 0,1
        path: Path,
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },
    /// Grow the group at PATH by the configured step
    Expand { path: Path },
    /// Shrink the group at PATH by the configured step
    Contract { path: Path },
    /// Called by the host when the active editor changes
    #[command(hide = true)]
    FocusChanged,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load();

    let layout_path = cli.layout.unwrap_or_else(|| config.layout.path.clone());
    let mut provider = FileLayoutProvider::new(layout_path);

    let command = match cli.command {
        Commands::Show => {
            let tree = provider.layout_tree()?;
            print!("{}", tree.describe());
            return Ok(());
        }
        Commands::Sum => {
            let tree = provider.layout_tree()?;
            println!("{}", tree.total_size());
            return Ok(());
        }
        Commands::Equalize => Command::Equalize,
        Commands::Shift { direction } => Command::Shift(direction),
        Commands::Resize { path, delta } => Command::Resize { path, delta },
        Commands::Expand { path } => Command::Expand(path),
        Commands::Contract { path } => Command::Contract(path),
        Commands::FocusChanged => Command::FocusChanged,
    };

    let report = command::execute(&mut provider, &command, &config.behavior)
        .with_context(|| format!("{command} on {}", provider.path().display()))?;
    println!("{report}");
    Ok(())
}
