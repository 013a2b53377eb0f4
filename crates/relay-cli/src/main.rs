//! relay CLI
//!
//! command host を起動し、fixture command を呼び出して結果を JSON で表示する。

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use relay_core::fixtures;
use relay_core::{CommandOutcome, Invoker, RelayConfig};

#[derive(Debug, Parser)]
#[command(name = "relay")]
#[command(about = "Invoke commands through the relay host", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Invoke one command and print its outcome
    Run {
        name: String,
        /// Arguments as a JSON value
        #[arg(long)]
        args: Option<String>,
    },
    /// Invoke every fixture in order; exits 1 only if a fixture does not
    /// produce its designed success or failure kind
    Fixtures,
    /// Print the registered command names
    List,
}

/// RUST_LOG があればそれを、なければ config の log_filter を使う
fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter {default_filter:?}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RelayConfig> {
    let config = RelayConfig::load(path).context("loading configuration")?;
    init_logging(&config.log_filter)?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// `Ok(false)` means a command did not behave as expected: for `run` the
/// command failed, for `fixtures` a fixture produced the wrong outcome.
async fn run(command: Commands, config: RelayConfig) -> anyhow::Result<bool> {
    let host = fixtures::host_builder()?.with_config(config).build()?;

    if let Commands::List = command {
        for name in host.registry().registered_names() {
            println!("{name}");
        }
        return Ok(true);
    }

    let (invoker, handle) = host.spawn();
    let result = match command {
        Commands::Run { name, args } => match parse_args(args.as_deref()) {
            Ok(arguments) => {
                let outcome = invoke_outcome(&invoker, &name, arguments).await;
                print_outcome(&name, &outcome).map(|()| outcome.is_success())
            }
            Err(e) => Err(e),
        },
        Commands::Fixtures => run_fixtures(&invoker).await,
        Commands::List => Ok(true),
    };

    handle.shutdown_and_join().await;
    info!(ok = ?result.as_ref().ok(), "done");
    result
}

async fn run_fixtures(invoker: &Invoker) -> anyhow::Result<bool> {
    let mut as_expected = true;
    for name in fixtures::NAMES {
        let outcome = invoke_outcome(invoker, name, None).await;
        print_outcome(name, &outcome)?;
        as_expected &= outcome.failure_kind() == fixtures::expected_failure(name);
    }
    Ok(as_expected)
}

fn parse_args(raw: Option<&str>) -> anyhow::Result<Option<Value>> {
    raw.map(serde_json::from_str::<Value>)
        .transpose()
        .context("--args is not valid JSON")
}

async fn invoke_outcome(invoker: &Invoker, name: &str, arguments: Option<Value>) -> CommandOutcome {
    let request = invoker.request(name, arguments);
    invoker.dispatch(request).await.outcome().await
}

fn print_outcome(name: &str, outcome: &CommandOutcome) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(outcome).context("rendering outcome")?;
    println!("{name}: {rendered}");
    Ok(())
}
