//! External state enrichment: one batched read of a vault's live
//! quantities, then the associated pool's price slot. Failures degrade to
//! a tagged zero-equivalent result plus a warning; they never abort event
//! processing.

use alloy::primitives::{Address, U256, aliases::I24};
use alloy::providers::{MulticallError, Provider};
use async_trait::async_trait;
use tracing::warn;

use crate::bindings::{IICHIVault, IUniswapV3Pool};
use crate::chains::ProviderCache;

/// Live vault quantities captured at processing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultState {
    pub tick: I24,
    pub total_amount0: U256,
    pub total_amount1: U256,
    pub total_supply: U256,
    pub sqrt_price: U256,
}

impl VaultState {
    /// Substitute callers use after branching on a degraded enrichment.
    pub const ZERO: Self = Self {
        tick: I24::ZERO,
        total_amount0: U256::ZERO,
        total_amount1: U256::ZERO,
        total_supply: U256::ZERO,
        sqrt_price: U256::ZERO,
    };
}

/// Outcome of an enrichment read. Degradation is a tagged variant rather
/// than a zero sentinel, so callers branch explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichedVaultState {
    Fresh(VaultState),
    Degraded { reason: String },
}

impl EnrichedVaultState {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Enrichment seam for the projection handlers. The production
/// implementation reads over RPC; tests substitute stubs.
#[async_trait]
pub trait VaultStateSource: Send + Sync {
    async fn fetch_vault_state(&self, vault: Address, chain_id: u64) -> EnrichedVaultState;
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("vault state multicall failed: {0}")]
    Multicall(#[from] MulticallError),
    #[error("pool price call failed: {0}")]
    Pool(#[from] alloy::contract::Error),
}

async fn try_fetch<P: Provider>(provider: &P, vault: Address) -> Result<VaultState, FetchError> {
    let vault_contract = IICHIVault::new(vault, provider);

    let (tick, totals, total_supply, pool) = provider
        .multicall()
        .add(vault_contract.currentTick())
        .add(vault_contract.getTotalAmounts())
        .add(vault_contract.totalSupply())
        .add(vault_contract.pool())
        .aggregate()
        .await?;

    let pool_contract = IUniswapV3Pool::new(pool, provider);
    let slot0 = pool_contract.slot0().call().await?;

    Ok(VaultState {
        tick,
        total_amount0: totals.total0,
        total_amount1: totals.total1,
        total_supply,
        sqrt_price: U256::from(slot0.sqrtPriceX96),
    })
}

/// Enrichment read against an already resolved provider. Never errors:
/// any failure surfaces as [`EnrichedVaultState::Degraded`] and a warning
/// log line naming the vault, chain, and cause.
pub async fn fetch_with_provider<P: Provider>(
    provider: &P,
    vault: Address,
    chain_id: u64,
) -> EnrichedVaultState {
    match try_fetch(provider, vault).await {
        Ok(state) => EnrichedVaultState::Fresh(state),
        Err(error) => {
            warn!(vault = %vault, chain_id, %error, "vault state enrichment degraded");
            EnrichedVaultState::Degraded {
                reason: error.to_string(),
            }
        }
    }
}

/// Production [`VaultStateSource`]: resolves a provider per chain id
/// through the registry-backed cache, then performs the batched read.
#[derive(Clone)]
pub struct RpcVaultStateSource {
    providers: ProviderCache,
}

impl RpcVaultStateSource {
    pub fn new(providers: ProviderCache) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl VaultStateSource for RpcVaultStateSource {
    async fn fetch_vault_state(&self, vault: Address, chain_id: u64) -> EnrichedVaultState {
        let provider = self.providers.provider_for(chain_id);
        fetch_with_provider(&provider, vault, chain_id).await
    }
}
