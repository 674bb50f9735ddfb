//! Chain endpoint registry and provider construction. Endpoint selection
//! is a pure lookup keyed by chain id with a documented fallback to the
//! default chain; providers are built lazily and cached per chain.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use alloy::providers::RootProvider;
use alloy::rpc::client::RpcClient;
use alloy::transports::layers::RetryBackoffLayer;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ChainsError {
    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("no endpoint configured for default chain {0}")]
    MissingDefaultEndpoint(u64),
}

/// Chains the indexer deployment covers, with public RPC endpoints.
/// Config can override any entry or add new ones.
const DEFAULT_ENDPOINTS: &[(u64, &str)] = &[
    (1, "https://eth.llamarpc.com"),
    (137, "https://polygon-rpc.com"),
    (8453, "https://mainnet.base.org"),
    (42161, "https://arb1.arbitrum.io/rpc"),
];

const DEFAULT_CHAIN: u64 = 1;

/// Maximum retries for transient RPC errors (rate limits, null responses, etc.)
const RPC_MAX_RETRIES: u32 = 10;

/// Initial backoff duration in milliseconds before retrying
const RPC_INITIAL_BACKOFF_MS: u64 = 1000;

/// Compute units per second budget for rate limiting
const RPC_COMPUTE_UNITS_PER_SECOND: u64 = 100;

/// Creates an HTTP RPC client with a retry layer for transient errors.
pub(crate) fn http_client_with_retry(url: Url) -> RpcClient {
    let retry_layer = RetryBackoffLayer::new(
        RPC_MAX_RETRIES,
        RPC_INITIAL_BACKOFF_MS,
        RPC_COMPUTE_UNITS_PER_SECOND,
    );
    RpcClient::builder().layer(retry_layer).http(url)
}

#[derive(Debug, Clone)]
pub struct ChainRegistry {
    endpoints: BTreeMap<u64, Url>,
    default_chain: u64,
    default_endpoint: Url,
}

impl ChainRegistry {
    pub fn new(default_chain: u64, endpoints: BTreeMap<u64, Url>) -> Result<Self, ChainsError> {
        let default_endpoint = endpoints
            .get(&default_chain)
            .cloned()
            .ok_or(ChainsError::MissingDefaultEndpoint(default_chain))?;
        Ok(Self {
            endpoints,
            default_chain,
            default_endpoint,
        })
    }

    /// Registry over the built-in endpoint table.
    pub fn with_defaults() -> Result<Self, ChainsError> {
        let mut endpoints = BTreeMap::new();
        for (chain_id, raw) in DEFAULT_ENDPOINTS {
            endpoints.insert(*chain_id, Url::parse(raw)?);
        }
        Self::new(DEFAULT_CHAIN, endpoints)
    }

    /// This registry with entries replaced or added, and optionally a new
    /// default chain. The resulting default chain must have an endpoint.
    pub fn extended(
        self,
        default_chain: Option<u64>,
        overrides: impl IntoIterator<Item = (u64, Url)>,
    ) -> Result<Self, ChainsError> {
        let mut endpoints = self.endpoints;
        endpoints.extend(overrides);
        Self::new(default_chain.unwrap_or(self.default_chain), endpoints)
    }

    pub fn contains(&self, chain_id: u64) -> bool {
        self.endpoints.contains_key(&chain_id)
    }

    pub fn default_chain(&self) -> u64 {
        self.default_chain
    }

    /// Endpoint for the chain, or the default chain's endpoint when the id
    /// is not in the table.
    pub fn endpoint(&self, chain_id: u64) -> &Url {
        match self.endpoints.get(&chain_id) {
            Some(url) => url,
            None => {
                debug!(
                    chain_id,
                    default_chain = self.default_chain,
                    "unknown chain id, falling back to default chain endpoint"
                );
                &self.default_endpoint
            }
        }
    }
}

/// Lazily built providers keyed by chain id. Unknown chain ids resolve to
/// the default chain's provider, so garbage ids cannot grow the cache.
#[derive(Clone)]
pub struct ProviderCache {
    registry: Arc<ChainRegistry>,
    providers: Arc<RwLock<BTreeMap<u64, RootProvider>>>,
}

impl ProviderCache {
    pub fn new(registry: ChainRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            providers: Arc::default(),
        }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn provider_for(&self, chain_id: u64) -> RootProvider {
        let canonical = if self.registry.contains(chain_id) {
            chain_id
        } else {
            self.registry.default_chain()
        };

        {
            let guard = match self.providers.read() {
                Ok(guard) => guard,
                Err(poison) => poison.into_inner(),
            };
            if let Some(provider) = guard.get(&canonical) {
                return provider.clone();
            }
        }

        let client = http_client_with_retry(self.registry.endpoint(chain_id).clone());
        let provider = RootProvider::new(client);

        let mut guard = match self.providers.write() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        };
        guard.entry(canonical).or_insert(provider).clone()
    }

    #[cfg(test)]
    fn cached_chains(&self) -> usize {
        match self.providers.read() {
            Ok(guard) => guard.len(),
            Err(poison) => poison.into_inner().len(),
        }
    }
}
