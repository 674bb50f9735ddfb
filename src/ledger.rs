//! Share ledger maintained from vault transfer events. Every transfer
//! carries two legs, sender and receiver; each leg adjusts one position
//! and, when that position crosses zero in the leg's own direction,
//! the vault's holder count. Mint and burn legs (the zero address) and
//! the vault's own address never hold shares and are skipped.

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing::{error, warn};

use crate::entities::ShareBalance;
use crate::store::{EntityStore, StoreError};
use crate::upsert::{get_or_create_vault, get_or_create_vault_share};

/// Vault share tokens carry eighteen decimals on every supported chain.
const SHARE_DECIMALS: u32 = 18;

#[derive(Debug, thiserror::Error)]
pub(crate) enum NormalizeError {
    #[error("raw share amount {0} exceeds representable balance range")]
    TooLarge(U256),
}

/// Converts a raw token amount into its decimal-equivalent balance,
/// preserving the fractional part exactly.
pub(crate) fn convert_token_to_decimal(raw: U256) -> Result<Decimal, NormalizeError> {
    let mantissa = i128::try_from(raw).map_err(|_| NormalizeError::TooLarge(raw))?;
    Decimal::try_from_i128_with_scale(mantissa, SHARE_DECIMALS)
        .map_err(|_| NormalizeError::TooLarge(raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Send,
    Receive,
}

/// Applies one transfer event to the share ledger. An unrepresentable
/// amount skips the balance mutation entirely (the event record itself
/// is still persisted by the caller); a faulted leg skips only itself.
pub(crate) async fn apply_transfer<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    from: Address,
    to: Address,
    raw_value: U256,
    timestamp: u64,
) -> Result<(), StoreError> {
    let value = match convert_token_to_decimal(raw_value) {
        Ok(value) => value,
        Err(error) => {
            error!(vault = %vault, %raw_value, %error, "skipping share ledger update");
            return Ok(());
        }
    };

    apply_leg(store, vault, from, value, Leg::Send, timestamp).await?;
    apply_leg(store, vault, to, value, Leg::Receive, timestamp).await
}

/// Each leg reads the position fresh, so a self-transfer settles to the
/// original balance and triggers no net holder-count change.
async fn apply_leg<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    party: Address,
    value: Decimal,
    leg: Leg,
    timestamp: u64,
) -> Result<(), StoreError> {
    if party == Address::ZERO || party == vault {
        return Ok(());
    }

    let Some(mut share) = get_or_create_vault_share(store, vault, party, timestamp).await else {
        return Ok(());
    };

    let was_holder = !share.balance.is_zero();
    let adjusted = match leg {
        Leg::Send => share.balance - ShareBalance(value),
        Leg::Receive => share.balance + ShareBalance(value),
    };
    share.balance = match adjusted {
        Ok(balance) => balance,
        Err(error) => {
            error!(vault = %vault, party = %party, %error, "skipping share ledger leg");
            return Ok(());
        }
    };
    let is_holder = !share.balance.is_zero();
    store.set_vault_share(share).await?;

    // A leg only accounts for the flip it can cause itself: sending can
    // empty a position, receiving can open one.
    match leg {
        Leg::Send if was_holder && !is_holder => decrement_holders(store, vault, timestamp).await,
        Leg::Receive if !was_holder && is_holder => {
            increment_holders(store, vault, timestamp).await
        }
        _ => Ok(()),
    }
}

async fn increment_holders<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    timestamp: u64,
) -> Result<(), StoreError> {
    let mut row = get_or_create_vault(store, vault, timestamp).await?;
    row.holders_count = row.holders_count.saturating_add(1);
    store.set_vault(row).await
}

async fn decrement_holders<S: EntityStore + ?Sized>(
    store: &S,
    vault: Address,
    timestamp: u64,
) -> Result<(), StoreError> {
    let mut row = get_or_create_vault(store, vault, timestamp).await?;
    row.holders_count = match row.holders_count.checked_sub(1) {
        Some(count) => count,
        None => {
            warn!(vault = %vault, "holder count underflow prevented");
            0
        }
    };
    store.set_vault(row).await
}
