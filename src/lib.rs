pub mod bindings;
pub mod chains;
pub mod config;
pub mod entities;
pub mod event_id;
pub mod events;
pub mod fetcher;
pub mod handlers;
mod ledger;
mod reconcile;
pub mod records;
pub mod store;
mod upsert;

pub use event_id::EventId;
pub use events::{EventMeta, VaultEvent, decode_event};
pub use fetcher::{EnrichedVaultState, RpcVaultStateSource, VaultState, VaultStateSource};
pub use handlers::{ContractRegistrar, ProjectionError, Projector, RegistrarError};
pub use store::{EntityStore, MemoryStore, StoreError};

#[cfg(test)]
pub mod test_utils;
