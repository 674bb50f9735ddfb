//! Projection pipeline: one decoded event in, entity mutations plus an
//! immutable event record out. Records are keyed by event id, so a
//! replayed log overwrites its own record instead of duplicating it.

mod factory;
mod vault;

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::events::{EventMeta, VaultEvent};
use crate::fetcher::VaultStateSource;
use crate::store::{EntityStore, StoreError};

/// Raised by a registrar that could not start tracking a vault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("contract registration failed: {0}")]
pub struct RegistrarError(pub String);

/// Receives newly created vault addresses so their logs join the feed
/// from the creation block onward.
#[async_trait]
pub trait ContractRegistrar: Send + Sync {
    async fn watch_vault(&self, chain_id: u64, vault: Address) -> Result<(), RegistrarError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registrar(#[from] RegistrarError),
}

/// Applies decoded events to the entity store, enriching liquidity
/// events through the state source and announcing new vaults to the
/// registrar.
pub struct Projector<S, F, R> {
    store: S,
    fetcher: F,
    registrar: R,
}

impl<S, F, R> Projector<S, F, R>
where
    S: EntityStore,
    F: VaultStateSource,
    R: ContractRegistrar,
{
    pub fn new(store: S, fetcher: F, registrar: R) -> Self {
        Self {
            store,
            fetcher,
            registrar,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(event_id = %meta.event_id()))]
    pub async fn process(&self, meta: EventMeta, event: VaultEvent) -> Result<(), ProjectionError> {
        match event {
            VaultEvent::VaultCreated(event) => self.on_vault_created(meta, event).await,
            VaultEvent::FactoryOwnershipTransferred(event) => {
                self.on_factory_ownership_transferred(meta, event).await
            }
            VaultEvent::VaultOwnershipTransferred(event) => {
                self.on_vault_ownership_transferred(meta, event).await
            }
            VaultEvent::Affiliate(event) => self.on_affiliate(meta, event).await,
            VaultEvent::Approval(event) => self.on_approval(meta, event).await,
            VaultEvent::Deploy(event) => self.on_deploy(meta, event).await,
            VaultEvent::Deposit(event) => self.on_deposit(meta, event).await,
            VaultEvent::DepositMax(event) => self.on_deposit_max(meta, event).await,
            VaultEvent::Hysteresis(event) => self.on_hysteresis(meta, event).await,
            VaultEvent::MaxTotalSupply(event) => self.on_max_total_supply(meta, event).await,
            VaultEvent::Rebalance(event) => self.on_rebalance(meta, event).await,
            VaultEvent::SetTwapPeriod(event) => self.on_set_twap_period(meta, event).await,
            VaultEvent::Transfer(event) => self.on_transfer(meta, event).await,
            VaultEvent::Withdraw(event) => self.on_withdraw(meta, event).await,
        }
    }
}
