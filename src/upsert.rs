//! Read-or-create helpers for the projected entities. Events routinely
//! arrive before the entity they reference has been observed, so lookups
//! materialize placeholders instead of failing.

use alloy::primitives::Address;
use tracing::error;

use crate::entities::{User, Vault, VaultShare, VaultShareId};
use crate::store::{EntityStore, StoreError};

pub(crate) async fn get_or_create_user<S: EntityStore + ?Sized>(
    store: &S,
    address: Address,
) -> Result<User, StoreError> {
    if let Some(user) = store.user(address).await? {
        return Ok(user);
    }

    let user = User { id: address };
    store.set_user(user).await?;
    Ok(user)
}

/// Returns the vault row, creating a zeroed placeholder if the creation
/// event has not been processed yet. A later creation event fills in the
/// real metadata without disturbing accumulated holder state.
pub(crate) async fn get_or_create_vault<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    timestamp: u64,
) -> Result<Vault, StoreError> {
    if let Some(existing) = store.vault(vault).await? {
        return Ok(existing);
    }

    let placeholder = Vault::placeholder(vault, timestamp);
    store.set_vault(placeholder.clone()).await?;
    Ok(placeholder)
}

async fn try_get_or_create_vault_share<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    user: Address,
    timestamp: u64,
) -> Result<VaultShare, StoreError> {
    let id = VaultShareId::new(vault, user);
    if let Some(share) = store.vault_share(&id).await? {
        return Ok(share);
    }

    get_or_create_user(store, user).await?;
    get_or_create_vault(store, vault, timestamp).await?;

    let share = VaultShare::zeroed(vault, user);
    store.set_vault_share(share.clone()).await?;
    Ok(share)
}

/// Share-position lookup used by the transfer ledger. Store faults are
/// logged and collapse to `None` so a single unreadable position skips
/// one ledger leg instead of aborting the whole event.
pub(crate) async fn get_or_create_vault_share<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    user: Address,
    timestamp: u64,
) -> Option<VaultShare> {
    match try_get_or_create_vault_share(store, vault, user, timestamp).await {
        Ok(share) => Some(share),
        Err(error) => {
            error!(vault = %vault, user = %user, %error, "failed to resolve vault share");
            None
        }
    }
}
