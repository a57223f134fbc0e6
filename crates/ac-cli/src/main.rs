//! CLI frontend for alternative critical damage.

mod commands;
mod host;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "altcrit",
    about = "Alternative critical damage: roll the dice once, add their maximum",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log tier selection and capture decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// The attack being resolved and the settings to resolve it with.
#[derive(Args)]
pub struct AttackArgs {
    /// Item JSON file
    #[arg(short, long)]
    pub item: PathBuf,

    /// Actor JSON file (ability modifiers, speaker name)
    #[arg(short, long)]
    pub actor: Option<PathBuf>,

    /// Damage JSON captured from an earlier damage roll of the same item
    #[arg(long)]
    pub capture: Option<PathBuf>,

    /// Treat the attack as a critical hit
    #[arg(short, long)]
    pub critical: bool,

    /// Outcome flag (criticalSuccess, success, failure, criticalFailure);
    /// overrides --critical
    #[arg(long)]
    pub outcome: Option<String>,

    /// Settings JSON file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Double static modifiers on a critical hit
    #[arg(long)]
    pub double_static: bool,

    /// Double static modifiers attached to dice as well
    #[arg(long)]
    pub double_all_static: bool,

    /// Switch the feature off (everything fails as disabled)
    #[arg(long)]
    pub disabled: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the alternative critical formula for an item
    Formula {
        #[command(flatten)]
        attack: AttackArgs,

        /// Print the formula parts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roll alternative damage for an item and print the chat message
    Roll {
        #[command(flatten)]
        attack: AttackArgs,

        /// RNG seed for reproducible rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Chat visibility: public, gm, blind, self
        #[arg(long, default_value = "public")]
        visibility: String,
    },

    /// Show the smallest and largest total of a formula or `{a,b}` set
    Bounds {
        /// The formula, e.g. "{(2d6+12+1)[piercing],6[untyped]}"
        formula: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Formula { attack, json } => commands::formula::run(&attack, json),
        Commands::Roll {
            attack,
            seed,
            visibility,
        } => commands::roll::run(&attack, seed, &visibility),
        Commands::Bounds { formula } => commands::bounds::run(&formula),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
