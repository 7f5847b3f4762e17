//! Confidential payout worker
//!
//! Commands:
//! - `run` (default): every stage once, then `result.txt` and `computed.json`
//! - `confidential-transfer`: the confidential transfer stage alone
//! - `confidential-balance`: decrypt the configured user's confidential balance

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use payout_config::{validate_config, ConfigLoader, LoggingConfig, RunnerConfig, WorkerEnv};
use payout_confidential::{
    read_confidential_balance, BalanceQuery, Erc7984Token, HttpRelayClient,
};
use payout_runner::{
    confidential_transfer_stage, init_tracing, write_artifacts, ArtifactPaths, LiveConnector,
    Runner, StatusDocument, RUN_FAILED_MESSAGE,
};
use payout_types::{connect_signer, parse_address};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run every stage and write the output artifacts
    Run,
    /// Run only the confidential transfer and print its receipt
    ConfidentialTransfer,
    /// Decrypt and print the confidential balance of the configured user
    ConfidentialBalance,
}

fn load_config(path: Option<&PathBuf>, worker_env: &WorkerEnv) -> anyhow::Result<RunnerConfig> {
    let config = ConfigLoader::load(path.map(PathBuf::as_path), worker_env)
        .context("failed to load configuration")?;
    validate_config(&config).context("invalid configuration")?;
    Ok(config)
}

/// Artifacts of a run that could not start; only `IEXEC_OUT` is trusted
async fn write_startup_failure(worker_env: &WorkerEnv) -> anyhow::Result<()> {
    let mut config = RunnerConfig::default();
    if let Some(dir) = &worker_env.out_dir {
        config.output.dir = dir.clone();
    }

    let paths = ArtifactPaths::new(&config.output);
    let document = StatusDocument::fold(&[], &paths.result, Some(RUN_FAILED_MESSAGE));
    write_artifacts(&document, &paths.result, &paths.computed).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Run);
    let worker_env = WorkerEnv::from_process();

    let config = match load_config(args.config.as_ref(), &worker_env) {
        Ok(config) => config,
        Err(e) => {
            let _ = init_tracing(&LoggingConfig::default());
            error!(error = %format!("{e:#}"), "worker cannot start");
            if command == Command::Run {
                write_startup_failure(&worker_env).await?;
            }
            return Err(e);
        }
    };

    init_tracing(&config.logging)?;
    info!(command = ?command, "starting confidential payout worker");

    match command {
        Command::Run => run(config, worker_env).await,
        Command::ConfidentialTransfer => confidential_transfer(config, worker_env).await,
        Command::ConfidentialBalance => confidential_balance(config, worker_env).await,
    }
}

async fn run(config: RunnerConfig, worker_env: WorkerEnv) -> anyhow::Result<()> {
    let connector = Arc::new(LiveConnector::new(worker_env.dataset_path()));
    let runner = Runner::new(config, worker_env, connector);

    let summary = runner
        .run()
        .await
        .context("failed to write output artifacts")?;

    info!(
        run_id = %summary.run_id,
        result = %summary.paths.result.display(),
        computed = %summary.paths.computed.display(),
        aborted = summary.aborted,
        "artifacts written"
    );
    Ok(())
}

async fn confidential_transfer(config: RunnerConfig, worker_env: WorkerEnv) -> anyhow::Result<()> {
    let connector = LiveConnector::new(worker_env.dataset_path());
    let sender_key = worker_env.sender_private_key();

    let output = confidential_transfer_stage(
        &connector,
        &config.confidential_transfer,
        sender_key.as_deref(),
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&output.receipt)?);
    Ok(())
}

async fn confidential_balance(config: RunnerConfig, worker_env: WorkerEnv) -> anyhow::Result<()> {
    let settings = &config.confidential_transfer;
    let sender_key = worker_env
        .sender_private_key()
        .context("Missing sender private key")?;

    let client = connect_signer(&settings.rpc_url, &sender_key).await?;
    let token = Erc7984Token::new(parse_address(&settings.token_contract)?, client.clone());
    let relay = HttpRelayClient::new(settings.relayer_url.clone());

    let query = BalanceQuery {
        account: parse_address(&settings.user_address)?,
        decimals: settings.decimals,
        verifying_contract: parse_address(&settings.decryption_contract)?,
        gateway_chain_id: settings.gateway_chain_id,
        duration_days: settings.decrypt_duration_days,
    };

    let balance = read_confidential_balance(&token, &relay, client.signer(), &query).await?;
    println!("{}", serde_json::to_string_pretty(&balance)?);
    Ok(())
}
