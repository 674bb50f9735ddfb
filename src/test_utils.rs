//! Shared test fixtures: stub enrichment sources, a recording
//! registrar, a fault-injecting store wrapper, and event placement
//! builders.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::entities::{User, Vault, VaultShare, VaultShareId};
use crate::event_id::EventId;
use crate::events::EventMeta;
use crate::fetcher::{EnrichedVaultState, VaultState, VaultStateSource};
use crate::handlers::{ContractRegistrar, RegistrarError};
use crate::records::EventRecord;
use crate::store::{EntityStore, MemoryStore, StoreError};

/// Enrichment source that always returns the same canned result.
pub(crate) struct StubFetcher(EnrichedVaultState);

impl StubFetcher {
    pub(crate) fn fresh(state: VaultState) -> Self {
        Self(EnrichedVaultState::Fresh(state))
    }

    pub(crate) fn degraded(reason: &str) -> Self {
        Self(EnrichedVaultState::Degraded {
            reason: reason.to_string(),
        })
    }
}

#[async_trait]
impl VaultStateSource for StubFetcher {
    async fn fetch_vault_state(&self, _vault: Address, _chain_id: u64) -> EnrichedVaultState {
        self.0.clone()
    }
}

/// Registrar that remembers every watch request it receives.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingRegistrar {
    watched: Arc<Mutex<Vec<(u64, Address)>>>,
}

impl RecordingRegistrar {
    pub(crate) fn watched(&self) -> Vec<(u64, Address)> {
        match self.watched.lock() {
            Ok(guard) => guard.clone(),
            Err(poison) => poison.into_inner().clone(),
        }
    }
}

#[async_trait]
impl ContractRegistrar for RecordingRegistrar {
    async fn watch_vault(&self, chain_id: u64, vault: Address) -> Result<(), RegistrarError> {
        match self.watched.lock() {
            Ok(mut guard) => guard.push((chain_id, vault)),
            Err(poison) => poison.into_inner().push((chain_id, vault)),
        }
        Ok(())
    }
}

/// Registrar that refuses every watch request.
#[derive(Debug, Default, Clone)]
pub(crate) struct RefusingRegistrar;

#[async_trait]
impl ContractRegistrar for RefusingRegistrar {
    async fn watch_vault(&self, _chain_id: u64, _vault: Address) -> Result<(), RegistrarError> {
        Err(RegistrarError("watch rejected".to_string()))
    }
}

/// Store wrapper that fails share reads for one poisoned position and
/// delegates everything else to an in-memory store.
pub(crate) struct ShareFaultStore {
    inner: MemoryStore,
    poisoned: VaultShareId,
}

impl ShareFaultStore {
    pub(crate) fn poisoning(poisoned: VaultShareId) -> Self {
        Self {
            inner: MemoryStore::default(),
            poisoned,
        }
    }

    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl EntityStore for ShareFaultStore {
    async fn vault(&self, id: Address) -> Result<Option<Vault>, StoreError> {
        self.inner.vault(id).await
    }

    async fn set_vault(&self, vault: Vault) -> Result<(), StoreError> {
        self.inner.set_vault(vault).await
    }

    async fn user(&self, id: Address) -> Result<Option<User>, StoreError> {
        self.inner.user(id).await
    }

    async fn set_user(&self, user: User) -> Result<(), StoreError> {
        self.inner.set_user(user).await
    }

    async fn vault_share(&self, id: &VaultShareId) -> Result<Option<VaultShare>, StoreError> {
        if *id == self.poisoned {
            return Err(StoreError::Backend("share table unavailable".to_string()));
        }
        self.inner.vault_share(id).await
    }

    async fn set_vault_share(&self, share: VaultShare) -> Result<(), StoreError> {
        self.inner.set_vault_share(share).await
    }

    async fn event(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError> {
        self.inner.event(id).await
    }

    async fn set_event(&self, record: EventRecord) -> Result<(), StoreError> {
        self.inner.set_event(record).await
    }
}

/// Store wrapper that refuses event-record writes and delegates
/// everything else to an in-memory store.
#[derive(Default)]
pub(crate) struct EventFaultStore {
    inner: MemoryStore,
}

#[async_trait]
impl EntityStore for EventFaultStore {
    async fn vault(&self, id: Address) -> Result<Option<Vault>, StoreError> {
        self.inner.vault(id).await
    }

    async fn set_vault(&self, vault: Vault) -> Result<(), StoreError> {
        self.inner.set_vault(vault).await
    }

    async fn user(&self, id: Address) -> Result<Option<User>, StoreError> {
        self.inner.user(id).await
    }

    async fn set_user(&self, user: User) -> Result<(), StoreError> {
        self.inner.set_user(user).await
    }

    async fn vault_share(&self, id: &VaultShareId) -> Result<Option<VaultShare>, StoreError> {
        self.inner.vault_share(id).await
    }

    async fn set_vault_share(&self, share: VaultShare) -> Result<(), StoreError> {
        self.inner.set_vault_share(share).await
    }

    async fn event(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError> {
        self.inner.event(id).await
    }

    async fn set_event(&self, _record: EventRecord) -> Result<(), StoreError> {
        Err(StoreError::Backend("event table unavailable".to_string()))
    }
}

/// Event placement with fixed block coordinates, varying only in chain
/// and emitting address. Tests that depend on the exact id can rely on
/// block 4931925, log index 12, and timestamp 1700000000.
pub(crate) fn meta_at(chain_id: u64, src_address: Address) -> EventMeta {
    EventMeta {
        chain_id,
        block_number: 4_931_925,
        block_timestamp: 1_700_000_000,
        log_index: 12,
        src_address,
    }
}
