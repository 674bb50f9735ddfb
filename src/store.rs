//! Entity store boundary. The durable engine lives in the host indexing
//! framework; this module specifies the interface the projection core
//! needs (async get/set per entity, read-your-writes within one event)
//! and ships an in-memory implementation for tests and embedding hosts.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use alloy::primitives::Address;

use crate::entities::{User, Vault, VaultShare, VaultShareId};
use crate::event_id::EventId;
use crate::records::EventRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn vault(&self, id: Address) -> Result<Option<Vault>, StoreError>;
    async fn set_vault(&self, vault: Vault) -> Result<(), StoreError>;

    async fn user(&self, id: Address) -> Result<Option<User>, StoreError>;
    async fn set_user(&self, user: User) -> Result<(), StoreError>;

    async fn vault_share(&self, id: &VaultShareId) -> Result<Option<VaultShare>, StoreError>;
    async fn set_vault_share(&self, share: VaultShare) -> Result<(), StoreError>;

    async fn event(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError>;
    async fn set_event(&self, record: EventRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    vaults: BTreeMap<Address, Vault>,
    users: BTreeMap<Address, User>,
    shares: BTreeMap<VaultShareId, VaultShare>,
    events: BTreeMap<EventId, EventRecord>,
}

/// In-memory [`EntityStore`]. Set overwrites by key, get clones out, so
/// read-your-writes holds trivially. Lock poisoning is recovered rather
/// than propagated: a panicking test thread must not wedge later
/// assertions against the same store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let guard = match self.tables.read() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        };
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = match self.tables.write() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        };
        f(&mut guard)
    }

    /// All share positions recorded against one vault, in key order.
    pub fn shares_for_vault(&self, vault: Address) -> Vec<VaultShare> {
        self.read(|tables| {
            tables
                .shares
                .values()
                .filter(|share| share.vault == vault)
                .cloned()
                .collect()
        })
    }

    pub fn event_count(&self) -> usize {
        self.read(|tables| tables.events.len())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn vault(&self, id: Address) -> Result<Option<Vault>, StoreError> {
        Ok(self.read(|tables| tables.vaults.get(&id).cloned()))
    }

    async fn set_vault(&self, vault: Vault) -> Result<(), StoreError> {
        self.write(|tables| tables.vaults.insert(vault.id, vault));
        Ok(())
    }

    async fn user(&self, id: Address) -> Result<Option<User>, StoreError> {
        Ok(self.read(|tables| tables.users.get(&id).copied()))
    }

    async fn set_user(&self, user: User) -> Result<(), StoreError> {
        self.write(|tables| tables.users.insert(user.id, user));
        Ok(())
    }

    async fn vault_share(&self, id: &VaultShareId) -> Result<Option<VaultShare>, StoreError> {
        Ok(self.read(|tables| tables.shares.get(id).cloned()))
    }

    async fn set_vault_share(&self, share: VaultShare) -> Result<(), StoreError> {
        self.write(|tables| tables.shares.insert(share.id.clone(), share));
        Ok(())
    }

    async fn event(&self, id: &EventId) -> Result<Option<EventRecord>, StoreError> {
        Ok(self.read(|tables| tables.events.get(id).cloned()))
    }

    async fn set_event(&self, record: EventRecord) -> Result<(), StoreError> {
        self.write(|tables| tables.events.insert(record.id().clone(), record));
        Ok(())
    }
}
