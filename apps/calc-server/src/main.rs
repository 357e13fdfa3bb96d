mod runtime;

use std::path::PathBuf;

use anyhow::Result;
use calc_bootstrap::{AppConfig, CliArgs, init_logging};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::runtime::ModuleConfigs;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Calculator Server - evaluates batches of calc and print commands
#[derive(Parser)]
#[command(name = "calc-server")]
#[command(about = "Calculator Server - evaluates batches of calc and print commands")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gRPC server, the REST gateway and the docs server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let args = CliArgs {
        config: cli.config.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // 1) defaults -> 2) YAML (if provided) -> 3) env (CALC__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if args.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    init_logging(&config.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Calculator server starting");

    let modules = ModuleConfigs::load(&config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => runtime::run(&config, modules).await,
        Commands::Check => check_config(&config, &modules),
    }
}

fn check_config(config: &AppConfig, modules: &ModuleConfigs) -> Result<()> {
    tracing::info!("Checking configuration...");
    modules.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}
