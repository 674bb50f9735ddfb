//! Decode boundary between raw RPC logs and the typed events the
//! projection consumes. Logs without confirmed chain placement and logs
//! whose topic is not part of the tracked ABI surface are skipped.

use alloy::primitives::Address;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use tracing::debug;

use crate::bindings::{IICHIVault, IICHIVaultFactory};
use crate::event_id::EventId;

/// Chain placement of a decoded log. Identifies the event globally and
/// carries the block timestamp every projected record embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMeta {
    pub chain_id: u64,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub log_index: u64,
    pub src_address: Address,
}

impl EventMeta {
    pub fn event_id(&self) -> EventId {
        EventId::new(self.chain_id, self.block_number, self.log_index)
    }
}

/// Every event the factory and its vaults emit, in decoded form.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultEvent {
    VaultCreated(IICHIVaultFactory::ICHIVaultCreated),
    FactoryOwnershipTransferred(IICHIVaultFactory::OwnershipTransferred),
    VaultOwnershipTransferred(IICHIVault::OwnershipTransferred),
    Affiliate(IICHIVault::Affiliate),
    Approval(IICHIVault::Approval),
    Deploy(IICHIVault::DeployICHIVault),
    Deposit(IICHIVault::Deposit),
    DepositMax(IICHIVault::DepositMax),
    Hysteresis(IICHIVault::Hysteresis),
    MaxTotalSupply(IICHIVault::MaxTotalSupply),
    Rebalance(IICHIVault::Rebalance),
    SetTwapPeriod(IICHIVault::SetTwapPeriod),
    Transfer(IICHIVault::Transfer),
    Withdraw(IICHIVault::Withdraw),
}

/// Decodes one log into a tracked event plus its placement. Returns
/// `None` for pending logs, unknown topics, and malformed bodies, each
/// noted at debug level.
pub fn decode_event(chain_id: u64, factory: Address, log: &Log) -> Option<(EventMeta, VaultEvent)> {
    let (Some(block_number), Some(block_timestamp), Some(log_index)) =
        (log.block_number, log.block_timestamp, log.log_index)
    else {
        debug!(address = %log.address(), "skipping log without confirmed chain placement");
        return None;
    };

    let topic = *log.topic0()?;
    let event = if topic == IICHIVaultFactory::ICHIVaultCreated::SIGNATURE_HASH {
        VaultEvent::VaultCreated(decode(log)?)
    } else if topic == IICHIVault::OwnershipTransferred::SIGNATURE_HASH {
        // The factory and every vault share this signature; the emitting
        // address tells them apart.
        if log.address() == factory {
            VaultEvent::FactoryOwnershipTransferred(decode(log)?)
        } else {
            VaultEvent::VaultOwnershipTransferred(decode(log)?)
        }
    } else if topic == IICHIVault::Affiliate::SIGNATURE_HASH {
        VaultEvent::Affiliate(decode(log)?)
    } else if topic == IICHIVault::Approval::SIGNATURE_HASH {
        VaultEvent::Approval(decode(log)?)
    } else if topic == IICHIVault::DeployICHIVault::SIGNATURE_HASH {
        VaultEvent::Deploy(decode(log)?)
    } else if topic == IICHIVault::Deposit::SIGNATURE_HASH {
        VaultEvent::Deposit(decode(log)?)
    } else if topic == IICHIVault::DepositMax::SIGNATURE_HASH {
        VaultEvent::DepositMax(decode(log)?)
    } else if topic == IICHIVault::Hysteresis::SIGNATURE_HASH {
        VaultEvent::Hysteresis(decode(log)?)
    } else if topic == IICHIVault::MaxTotalSupply::SIGNATURE_HASH {
        VaultEvent::MaxTotalSupply(decode(log)?)
    } else if topic == IICHIVault::Rebalance::SIGNATURE_HASH {
        VaultEvent::Rebalance(decode(log)?)
    } else if topic == IICHIVault::SetTwapPeriod::SIGNATURE_HASH {
        VaultEvent::SetTwapPeriod(decode(log)?)
    } else if topic == IICHIVault::Transfer::SIGNATURE_HASH {
        VaultEvent::Transfer(decode(log)?)
    } else if topic == IICHIVault::Withdraw::SIGNATURE_HASH {
        VaultEvent::Withdraw(decode(log)?)
    } else {
        debug!(address = %log.address(), %topic, "skipping log with untracked topic");
        return None;
    };

    let meta = EventMeta {
        chain_id,
        block_number,
        block_timestamp,
        log_index,
        src_address: log.address(),
    };
    Some((meta, event))
}

fn decode<E: SolEvent + Clone>(log: &Log) -> Option<E> {
    match log.log_decode::<E>() {
        Ok(decoded) => Some(decoded.data().clone()),
        Err(error) => {
            debug!(address = %log.address(), %error, "failed to decode event body");
            None
        }
    }
}
