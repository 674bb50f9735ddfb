//! Immutable event records, one struct per on-chain event type. Field
//! mapping is mechanical: event params plus block timestamp, with
//! deposit/withdraw/rebalance additionally carrying the enrichment
//! snapshot captured at processing time.

use alloy::primitives::{Address, U256, aliases::I24};
use serde::{Deserialize, Serialize};

use crate::event_id::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCreated {
    pub id: EventId,
    pub timestamp: u64,
    pub sender: Address,
    pub ichi_vault: Address,
    pub token_a: Address,
    pub allow_token_a: bool,
    pub token_b: Address,
    pub allow_token_b: bool,
    pub fee: u32,
    pub count: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryOwnershipTransferred {
    pub id: EventId,
    pub timestamp: u64,
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultOwnershipTransferred {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultAffiliate {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub affiliate: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultApproval {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDeploy {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub pool: Address,
    pub allow_token0: bool,
    pub allow_token1: bool,
    pub owner: Address,
    pub twap_period: U256,
}

/// Deposit with the enrichment snapshot: current totals and supply read
/// from the chain, and the reconciled pre-event totals. All enrichment
/// fields are zero when the state fetch degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDeposit {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub to: Address,
    pub shares: U256,
    pub amount0: U256,
    pub amount1: U256,
    pub tick: I24,
    pub sqrt_price: U256,
    pub total_amount0: U256,
    pub total_amount1: U256,
    pub total_amount0_before_event: U256,
    pub total_amount1_before_event: U256,
    pub total_supply: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDepositMax {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub deposit0_max: U256,
    pub deposit1_max: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultHysteresis {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub hysteresis: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultMaxTotalSupply {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub max_total_supply: U256,
}

/// Rebalance keeps the totals and supply the event itself reported; tick
/// and sqrtPrice come from the enrichment read, with the event's own tick
/// as the degraded fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRebalance {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub tick: I24,
    pub total_amount0: U256,
    pub total_amount1: U256,
    pub fee_amount0: U256,
    pub fee_amount1: U256,
    pub total_supply: U256,
    pub sqrt_price: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSetTwapPeriod {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub new_twap_period: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultTransfer {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultWithdraw {
    pub id: EventId,
    pub timestamp: u64,
    pub vault: Address,
    pub sender: Address,
    pub to: Address,
    pub shares: U256,
    pub amount0: U256,
    pub amount1: U256,
    pub tick: I24,
    pub sqrt_price: U256,
    pub total_amount0: U256,
    pub total_amount1: U256,
    pub total_amount0_before_event: U256,
    pub total_amount1_before_event: U256,
    pub total_supply: U256,
}

/// Store payload covering every record type, keyed by [`EventId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRecord {
    VaultCreated(VaultCreated),
    FactoryOwnershipTransferred(FactoryOwnershipTransferred),
    VaultOwnershipTransferred(VaultOwnershipTransferred),
    Affiliate(VaultAffiliate),
    Approval(VaultApproval),
    Deploy(VaultDeploy),
    Deposit(VaultDeposit),
    DepositMax(VaultDepositMax),
    Hysteresis(VaultHysteresis),
    MaxTotalSupply(VaultMaxTotalSupply),
    Rebalance(VaultRebalance),
    SetTwapPeriod(VaultSetTwapPeriod),
    Transfer(VaultTransfer),
    Withdraw(VaultWithdraw),
}

impl EventRecord {
    pub fn id(&self) -> &EventId {
        match self {
            Self::VaultCreated(record) => &record.id,
            Self::FactoryOwnershipTransferred(record) => &record.id,
            Self::VaultOwnershipTransferred(record) => &record.id,
            Self::Affiliate(record) => &record.id,
            Self::Approval(record) => &record.id,
            Self::Deploy(record) => &record.id,
            Self::Deposit(record) => &record.id,
            Self::DepositMax(record) => &record.id,
            Self::Hysteresis(record) => &record.id,
            Self::MaxTotalSupply(record) => &record.id,
            Self::Rebalance(record) => &record.id,
            Self::SetTwapPeriod(record) => &record.id,
            Self::Transfer(record) => &record.id,
            Self::Withdraw(record) => &record.id,
        }
    }
}
