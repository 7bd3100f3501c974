//! CLI for the Warden governance proposal analyzer.
//!
//! Pipeline: load payload -> source simulation -> safety checks ->
//! cross-chain replay -> report.

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::sync::Arc;
use warden_core::{AnalysisPayload, CallRecord};
use warden_provider::{ExplorerClient, HttpSimulationBackend, RpcAddressState, SimulationBackend};

#[derive(Parser, Debug)]
#[command(name = "warden", version, about = "On-chain governance proposal safety analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a proposal and run the safety checks.
    Analyze {
        /// Analysis payload JSON: prepared simulation request + proposal.
        #[arg(short, long)]
        payload: std::path::PathBuf,

        #[arg(long, env = "WARDEN_BACKEND_URL")]
        backend_url: String,

        #[arg(long, env = "WARDEN_RPC_URL")]
        rpc_url: String,

        /// Explorer API endpoint for verification lookups.
        #[arg(
            long,
            env = "WARDEN_EXPLORER_URL",
            default_value = "https://api.etherscan.io/v2/api"
        )]
        explorer_url: String,

        #[arg(long, env = "WARDEN_EXPLORER_API_KEY")]
        explorer_api_key: Option<String>,

        /// Source chain id, used for verification lookups.
        #[arg(long, default_value_t = 1)]
        chain_id: u64,

        /// Trusted governance contracts (governor, timelock) exempt from
        /// bytecode scanning. Repeatable.
        #[arg(long)]
        trusted: Vec<Address>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Extract bridge messages from a saved call-trace JSON, no simulation.
    Extract {
        /// Call-trace JSON file (a single root record).
        #[arg(short, long)]
        trace: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            payload,
            backend_url,
            rpc_url,
            explorer_url,
            explorer_api_key,
            chain_id,
            trusted,
            json,
        } => {
            let raw = std::fs::read_to_string(&payload)?;
            let payload: AnalysisPayload = serde_json::from_str(&raw)?;
            payload.proposal.validate()?;

            let backend: Arc<dyn SimulationBackend> =
                Arc::new(HttpSimulationBackend::new(&backend_url)?);

            tracing::info!(
                actions = payload.proposal.targets.len(),
                network = %payload.request.network_id,
                "simulating proposal"
            );
            let source = backend.simulate(&payload.request).await?;
            tracing::info!(status = source.status, "source simulation done");

            // Candidate addresses: proposal targets plus everything the
            // simulation touched.
            let mut candidates: Vec<Address> = payload.proposal.targets.clone();
            candidates.extend(
                source
                    .contracts
                    .iter()
                    .filter_map(|raw| raw.trim().parse::<Address>().ok()),
            );
            let trusted: BTreeSet<Address> = trusted.into_iter().collect();

            let state = RpcAddressState::connect(&rpc_url).await?;
            let explorer = ExplorerClient::new(explorer_url, explorer_api_key);

            let checks = vec![
                (
                    "Target safety (selfdestruct / delegatecall)".to_string(),
                    warden_analyzer::checks::check_target_safety(&state, &candidates, &trusted)
                        .await,
                ),
                (
                    "Source verification".to_string(),
                    warden_analyzer::checks::check_verification(&explorer, &candidates, chain_id)
                        .await,
                ),
                (
                    "ETH balance changes".to_string(),
                    warden_analyzer::checks::check_eth_balance_changes(&source),
                ),
                (
                    "Emitted events".to_string(),
                    warden_analyzer::checks::check_decoded_events(&source),
                ),
            ];

            let cross_chain = warden_analyzer::analyze_cross_chain(backend, &source).await;

            if json {
                let checks: serde_json::Map<String, serde_json::Value> = checks
                    .into_iter()
                    .map(|(name, output)| (name, serde_json::to_value(output).unwrap_or_default()))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "sim": source,
                        "checks": checks,
                        "crossChain": cross_chain,
                    }))?
                );
            } else {
                print!(
                    "{}",
                    warden_analyzer::reporter::render_report(&source, &checks, &cross_chain)
                );
            }

            if cross_chain.cross_chain_failure {
                std::process::exit(1);
            }
        }

        Commands::Extract { trace } => {
            let raw = std::fs::read_to_string(&trace)?;
            let root: CallRecord = serde_json::from_str(&raw)?;

            let parsers = warden_analyzer::default_parsers();
            let messages = warden_analyzer::extract_messages(Some(&root), &parsers);

            tracing::info!(messages = messages.len(), "extraction complete");
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
    }

    Ok(())
}
