//! STAKESET CLI - staking set inspection

use anyhow::Context;
use clap::{Parser, Subcommand};
use stakeset_cli::{
    apply, delegators, format_staker, lookup_validator, schedule, with_view, PendingFile,
    StateFile,
};
use stakeset_core::{Id, NodeId, StakesetConfig};
use stakeset_state::DiffStakers;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "stakeset")]
#[command(about = "STAKESET - validator and delegator staking set inspection")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the next stakers to transition
    Schedule {
        /// Committed staking state file
        #[arg(short, long)]
        state: PathBuf,

        /// Pending changes of a candidate block
        #[arg(short, long)]
        pending: Option<PathBuf>,

        /// Maximum number of stakers to list
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Look up one validator
    Validator {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(short, long)]
        pending: Option<PathBuf>,

        /// Subnet ID (hex)
        #[arg(long)]
        subnet: String,

        /// Node ID (hex)
        #[arg(long)]
        node: String,
    },

    /// List the delegators of one validator
    Delegators {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(short, long)]
        pending: Option<PathBuf>,

        #[arg(long)]
        subnet: String,

        #[arg(long)]
        node: String,
    },

    /// Fold pending changes into the committed state
    Apply {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(short, long)]
        pending: PathBuf,

        /// Output file (defaults to overwriting the state file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StakesetConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StakesetConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    // Initialize logging
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Schedule { state, pending, limit } => {
            let base = StateFile::load(&state)?.to_base();
            let diff = load_pending(pending.as_deref())?;

            let mut schedule_config = config.schedule.clone();
            if let Some(limit) = limit {
                schedule_config.limit = limit;
            }

            let stakers = with_view(&base, diff.as_ref(), |reader| {
                schedule(reader, &schedule_config)
            });
            for staker in &stakers {
                println!("{}", format_staker(staker));
            }
        }

        Commands::Validator { state, pending, subnet, node } => {
            let base = StateFile::load(&state)?.to_base();
            let diff = load_pending(pending.as_deref())?;
            let (subnet_id, node_id) = parse_key(&subnet, &node)?;

            match with_view(&base, diff.as_ref(), |reader| {
                lookup_validator(reader, subnet_id, node_id)
            })? {
                Some(staker) => println!("{}", serde_json::to_string_pretty(&staker)?),
                None => println!("not found"),
            }
        }

        Commands::Delegators { state, pending, subnet, node } => {
            let base = StateFile::load(&state)?.to_base();
            let diff = load_pending(pending.as_deref())?;
            let (subnet_id, node_id) = parse_key(&subnet, &node)?;

            let stakers = with_view(&base, diff.as_ref(), |reader| {
                delegators(reader, subnet_id, node_id)
            });
            for staker in &stakers {
                println!("{}", format_staker(staker));
            }
        }

        Commands::Apply { state, pending, output } => {
            let mut base = StateFile::load(&state)?.to_base();
            let diff = PendingFile::load(&pending)
                .with_context(|| format!("loading pending changes {}", pending.display()))?
                .to_diff()?;

            apply(&mut base, &diff)?;

            let output = output.unwrap_or(state);
            StateFile::from_base(&base).save(&output)?;
            info!(
                stakers = base.len(),
                entries = base.validator_entries(),
                "Committed state saved to {}",
                output.display()
            );
        }
    }

    Ok(())
}

fn load_pending(path: Option<&Path>) -> anyhow::Result<Option<DiffStakers>> {
    match path {
        Some(path) => {
            let diff = PendingFile::load(path)
                .with_context(|| format!("loading pending changes {}", path.display()))?
                .to_diff()?;
            Ok(Some(diff))
        }
        None => Ok(None),
    }
}

fn parse_key(subnet: &str, node: &str) -> anyhow::Result<(Id, NodeId)> {
    let subnet_id = Id::from_hex(subnet).context("invalid subnet ID")?;
    let node_id = NodeId::from_hex(node).context("invalid node ID")?;
    Ok((subnet_id, node_id))
}
