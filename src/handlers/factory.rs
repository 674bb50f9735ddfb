//! Handlers for events emitted by the vault factory itself.

use tracing::info;

use super::{ContractRegistrar, ProjectionError, Projector};
use crate::bindings::IICHIVaultFactory;
use crate::entities::Vault;
use crate::events::EventMeta;
use crate::fetcher::VaultStateSource;
use crate::records;
use crate::records::EventRecord;
use crate::store::EntityStore;

impl<S, F, R> Projector<S, F, R>
where
    S: EntityStore,
    F: VaultStateSource,
    R: ContractRegistrar,
{
    /// Persists the vault's metadata and subscribes the new address to
    /// the log feed. Transfer events can precede creation, so holder
    /// state accumulated on a placeholder row is carried over.
    pub(super) async fn on_vault_created(
        &self,
        meta: EventMeta,
        event: IICHIVaultFactory::ICHIVaultCreated,
    ) -> Result<(), ProjectionError> {
        let address = event.ichiVault;
        let holders_count = self
            .store
            .vault(address)
            .await?
            .map(|existing| existing.holders_count)
            .unwrap_or(0);

        let vault = Vault {
            id: address,
            sender: event.sender,
            token_a: event.tokenA,
            allow_token_a: event.allowTokenA,
            token_b: event.tokenB,
            allow_token_b: event.allowTokenB,
            fee: event.fee.to::<u32>(),
            count: event.count,
            created_at_timestamp: meta.block_timestamp,
            holders_count,
        };
        self.store.set_vault(vault).await?;
        self.registrar.watch_vault(meta.chain_id, address).await?;

        let record = records::VaultCreated {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            sender: event.sender,
            ichi_vault: address,
            token_a: event.tokenA,
            allow_token_a: event.allowTokenA,
            token_b: event.tokenB,
            allow_token_b: event.allowTokenB,
            fee: event.fee.to::<u32>(),
            count: event.count,
        };
        self.store
            .set_event(EventRecord::VaultCreated(record))
            .await?;

        info!(vault = %address, chain_id = meta.chain_id, "tracking newly created vault");
        Ok(())
    }

    pub(super) async fn on_factory_ownership_transferred(
        &self,
        meta: EventMeta,
        event: IICHIVaultFactory::OwnershipTransferred,
    ) -> Result<(), ProjectionError> {
        let record = records::FactoryOwnershipTransferred {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            previous_owner: event.previousOwner,
            new_owner: event.newOwner,
        };
        self.store
            .set_event(EventRecord::FactoryOwnershipTransferred(record))
            .await?;
        Ok(())
    }
}
