//! HTTP client for the simulation backend, with bounded retry on rate
//! limiting.

use crate::SimulationBackend;
use async_trait::async_trait;
use rand::Rng;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;
use warden_core::{SimulationRequest, SimulationResult, WardenError, WardenResult};

/// First retry delay after a 429.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
/// Give up once cumulative backoff would pass this budget.
const BACKOFF_BUDGET: Duration = Duration::from_secs(8);
/// Upper bound on the random jitter added to each retry delay.
const MAX_JITTER_MS: u64 = 250;

/// Exponential backoff schedule: doubling delays until the cumulative
/// budget is exhausted. Pure so the schedule is testable without sleeping.
#[derive(Debug)]
struct Backoff {
    next_delay: Duration,
    slept: Duration,
}

impl Backoff {
    fn new() -> Self {
        Self {
            next_delay: INITIAL_BACKOFF,
            slept: Duration::ZERO,
        }
    }

    /// The next delay to sleep, or `None` once the budget is spent.
    fn next(&mut self) -> Option<Duration> {
        let delay = self.next_delay;
        if self.slept + delay > BACKOFF_BUDGET {
            return None;
        }
        self.slept += delay;
        self.next_delay = delay * 2;
        Some(delay)
    }
}

/// Simulation service client.
///
/// ```ignore
/// let backend = HttpSimulationBackend::new("https://sim.example.com")?;
/// let result = backend.simulate(&request).await?;
/// ```
pub struct HttpSimulationBackend {
    client: reqwest::Client,
    simulate_url: Url,
    supported_chains: BTreeSet<u64>,
}

/// Chains the default deployment can simulate against: mainnet, OP Mainnet,
/// Base, Arbitrum One.
const DEFAULT_SUPPORTED_CHAINS: &[u64] = &[1, 10, 8453, 42161];

impl HttpSimulationBackend {
    pub fn new(base_url: &str) -> WardenResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| WardenError::InvalidInput(format!("invalid backend URL {base_url}: {e}")))?;
        let simulate_url = base
            .join("simulate")
            .map_err(|e| WardenError::InvalidInput(format!("invalid backend URL {base_url}: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            simulate_url,
            supported_chains: DEFAULT_SUPPORTED_CHAINS.iter().copied().collect(),
        })
    }

    /// Override the set of chains the deployment supports.
    pub fn with_supported_chains(mut self, chains: impl IntoIterator<Item = u64>) -> Self {
        self.supported_chains = chains.into_iter().collect();
        self
    }

    async fn attempt(&self, request: &SimulationRequest) -> Result<SimulationResult, Attempt> {
        let response = self
            .client
            .post(self.simulate_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| Attempt::Fatal(WardenError::Backend(format!("request failed: {e}"))))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Attempt::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Attempt::Fatal(WardenError::Backend(format!(
                "backend returned {status}: {body}"
            ))));
        }

        response
            .json::<SimulationResult>()
            .await
            .map_err(|e| Attempt::Fatal(WardenError::Backend(format!("malformed response: {e}"))))
    }
}

enum Attempt {
    RateLimited,
    Fatal(WardenError),
}

#[async_trait]
impl SimulationBackend for HttpSimulationBackend {
    fn supports_chain(&self, chain_id: u64) -> bool {
        self.supported_chains.contains(&chain_id)
    }

    async fn simulate(&self, request: &SimulationRequest) -> WardenResult<SimulationResult> {
        let mut backoff = Backoff::new();

        loop {
            match self.attempt(request).await {
                Ok(result) => {
                    tracing::debug!(
                        network = %request.network_id,
                        to = %request.to,
                        status = result.status,
                        "simulation complete"
                    );
                    return Ok(result);
                }
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::RateLimited) => match backoff.next() {
                    Some(delay) => {
                        let jitter =
                            Duration::from_millis(rand::thread_rng().gen_range(0..=MAX_JITTER_MS));
                        tracing::warn!(
                            network = %request.network_id,
                            delay_ms = delay.as_millis() as u64,
                            "backend rate limited, backing off"
                        );
                        tokio::time::sleep(delay + jitter).await;
                    }
                    None => {
                        return Err(WardenError::Backend(
                            "rate limited: backoff budget exhausted".into(),
                        ))
                    }
                },
            }
        }
    }
}
