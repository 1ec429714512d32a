//! Chain Helper - command line demo
//!
//! Builds a chain of mock nodes from configuration and flags, sends one
//! dispatch through it and prints a summary.

use chain_helper::chain::{ChainHelper, Dispatch};
use chain_helper::config::ChainConfig;
use chain_helper::observability::{init_from_config, init_logging, parse_level, LogFormat};
use chain_helper::testing::{MockDispatch, MockNode};
use chain_helper::utilities::ReturnHelper;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};

/// Chain-of-responsibility demo runner
#[derive(Parser)]
#[command(name = "chain-helper")]
#[command(about = "Route a dispatch through a chain of versioned nodes")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a demo chain and traverse it once
    Run(RunArgs),
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of nodes to link
    #[arg(long, default_value_t = 3)]
    nodes: usize,

    /// Use an event chain (only the last node is kept)
    #[arg(long)]
    event: bool,

    /// Emit chain debug messages (also enabled by CHAIN_DEBUG or `chain.debug`)
    #[arg(long)]
    debug: bool,

    /// Make the dispatch consumable
    #[arg(long)]
    consumable: bool,

    /// Make the dispatch stateful (keep every node's result)
    #[arg(long)]
    stateful: bool,

    /// Index of the node that consumes the dispatch
    #[arg(long, value_name = "INDEX")]
    consume_at: Option<usize>,

    /// JSON payload for the dispatch
    #[arg(long, default_value = "null")]
    input: String,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    init_observability(&config, cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run_chain(&config, args),
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<ChainConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => Ok(ChainConfig::load_from_file(path)?),
        None => {
            let default_path = PathBuf::from("chain.toml");
            if default_path.exists() {
                return Ok(ChainConfig::load_from_file(&default_path)?);
            }

            let mut config = ChainConfig::default();
            config.apply_env_overrides()?;
            Ok(config)
        }
    }
}

fn init_observability(config: &ChainConfig, verbose: u8) {
    let installed = match verbose {
        0 => init_from_config(&config.logging),
        count => {
            let level = if count == 1 { Level::DEBUG } else { Level::TRACE };
            init_logging(
                level.max(parse_level(&config.logging.level).unwrap_or(Level::INFO)),
                LogFormat::parse(&config.logging.format),
                config.logging.spans,
            )
        }
    };

    if !installed {
        eprintln!("Logging subscriber already installed");
    }
}

fn run_chain(config: &ChainConfig, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = ChainHelper::new(
        args.event || config.chain.event,
        args.debug || config.chain.debug,
    );
    chain.hook_logger(|message| eprintln!("[chain] {message}"));

    for index in 0..args.nodes {
        let mut node =
            MockNode::new(&format!("node-{index}"), "1").with_result(json!({ "node": index }));
        if args.consume_at == Some(index) {
            node = node.consuming();
        }
        chain.link_node(Arc::new(node));
    }

    info!(
        nodes = chain.len(),
        event_chain = chain.is_event(),
        "Chain ready"
    );

    let payload: Value = serde_json::from_str(&args.input)?;
    let mut dispatch = MockDispatch::default();
    dispatch.initialize(&json!({
        "consumable": args.consumable,
        "stateful": args.stateful,
        "payload": payload,
    }))?;

    let mut summary: ReturnHelper = ReturnHelper::new();
    match chain.traverse(&mut dispatch, None) {
        Ok(true) => {
            summary.make_good();
            summary.add_message("Traversal completed");
        }
        Ok(false) => summary.add_message("Traversal rejected"),
        Err(e) => summary.add_message(format!("Traversal failed: {e}")),
    }

    if dispatch.is_consumed() {
        summary.add_message("Dispatch consumed");
    }

    if let Some(results) = dispatch.results() {
        summary.add_results(results.iter().cloned())?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn handle_config_command(
    config: &ChainConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    info!("Configuration is valid");

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    Ok(())
}
