//! LIBERO CLI - task authoring and validation
//!
//! # Usage
//!
//! ```bash
//! # Write BDDL files for every task in a task list
//! libero generate tasks.toml --output-dir bddl_files
//!
//! # Parse and validate a task file
//! libero check bddl_files/KITCHEN_SCENE1_open_the_top_drawer_of_the_cabinet.bddl
//!
//! # Evaluate a goal against a recorded frame
//! libero validate task.bddl --recording episode.json
//!
//! # Teleoperation loop
//! libero teleop task.bddl --recording episode.json --device console
//!
//! # Registries and configuration
//! libero scenes list
//! libero predicates
//! libero config init
//! ```

use clap::{Parser, Subcommand};
use libero::cli::commands::{
    check::CheckArgs, config::ConfigCommand, generate::GenerateArgs, predicates::PredicatesArgs,
    scenes::ScenesCommand, teleop::TeleopArgs, validate::ValidateArgs,
};
use libero::cli::{commands, CliContext, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "libero")]
#[command(version)]
#[command(about = "LIBERO task authoring: scenes, BDDL generation and teleoperation checks", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "LIBERO_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, plain)
    #[arg(short, long, global = true, default_value = "table")]
    output_format: String,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register tasks from a TOML list and write their BDDL files
    Generate(GenerateArgs),

    /// Parse and validate a BDDL file
    Check(CheckArgs),

    /// Evaluate a task goal against a recorded frame
    Validate(ValidateArgs),

    /// Run the teleoperation validation loop
    Teleop(TeleopArgs),

    /// Scene registry
    Scenes {
        #[command(subcommand)]
        command: ScenesCommand,
    },

    /// List the predicate library
    Predicates(PredicatesArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn init_logging(verbose: bool, config_filter: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_filter))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    let output_format: OutputFormat = cli.output_format.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using table format.", e);
        OutputFormat::Table
    });

    let mut ctx = match cli.config {
        Some(path) => match CliContext::new(path) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("Error loading configuration: {}", e);
                std::process::exit(1);
            }
        },
        None => match CliContext::with_defaults() {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("Error initializing context: {}", e);
                std::process::exit(1);
            }
        },
    };

    ctx.output_format = output_format;
    ctx.quiet = cli.quiet;
    ctx.verbose = cli.verbose;
    init_logging(cli.verbose, &ctx.config.logging.filter);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(&ctx, args),
        Commands::Check(args) => commands::check::execute(&ctx, args),
        Commands::Validate(args) => commands::validate::execute(&ctx, args),
        Commands::Teleop(args) => commands::teleop::execute(&ctx, args),
        Commands::Scenes { command } => commands::scenes::execute(&ctx, command),
        Commands::Predicates(args) => commands::predicates::execute(&ctx, args),
        Commands::Config { command } => commands::config::execute(&ctx, command),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
