//! Handlers for events emitted by individual vaults. Liquidity events
//! are enriched with live vault state before recording; parameter and
//! ownership events record as-is; transfers additionally drive the
//! share ledger.

use alloy::primitives::U256;

use super::{ContractRegistrar, ProjectionError, Projector};
use crate::bindings::IICHIVault;
use crate::events::EventMeta;
use crate::fetcher::{EnrichedVaultState, VaultState, VaultStateSource};
use crate::ledger::apply_transfer;
use crate::reconcile::{LiquidityDirection, reconcile_before};
use crate::records;
use crate::records::EventRecord;
use crate::store::EntityStore;

impl<S, F, R> Projector<S, F, R>
where
    S: EntityStore,
    F: VaultStateSource,
    R: ContractRegistrar,
{
    async fn enriched_or_zero(&self, meta: EventMeta) -> VaultState {
        match self
            .fetcher
            .fetch_vault_state(meta.src_address, meta.chain_id)
            .await
        {
            EnrichedVaultState::Fresh(state) => state,
            EnrichedVaultState::Degraded { .. } => VaultState::ZERO,
        }
    }

    pub(super) async fn on_deposit(
        &self,
        meta: EventMeta,
        event: IICHIVault::Deposit,
    ) -> Result<(), ProjectionError> {
        let state = self.enriched_or_zero(meta).await;
        let before = reconcile_before(
            &meta.event_id(),
            state.total_amount0,
            state.total_amount1,
            event.amount0,
            event.amount1,
            LiquidityDirection::Deposit,
        );

        let record = records::VaultDeposit {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            to: event.to,
            shares: event.shares,
            amount0: event.amount0,
            amount1: event.amount1,
            tick: state.tick,
            sqrt_price: state.sqrt_price,
            total_amount0: state.total_amount0,
            total_amount1: state.total_amount1,
            total_amount0_before_event: before.total0,
            total_amount1_before_event: before.total1,
            total_supply: state.total_supply,
        };
        self.store.set_event(EventRecord::Deposit(record)).await?;
        Ok(())
    }

    pub(super) async fn on_withdraw(
        &self,
        meta: EventMeta,
        event: IICHIVault::Withdraw,
    ) -> Result<(), ProjectionError> {
        let state = self.enriched_or_zero(meta).await;
        let before = reconcile_before(
            &meta.event_id(),
            state.total_amount0,
            state.total_amount1,
            event.amount0,
            event.amount1,
            LiquidityDirection::Withdraw,
        );

        let record = records::VaultWithdraw {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            to: event.to,
            shares: event.shares,
            amount0: event.amount0,
            amount1: event.amount1,
            tick: state.tick,
            sqrt_price: state.sqrt_price,
            total_amount0: state.total_amount0,
            total_amount1: state.total_amount1,
            total_amount0_before_event: before.total0,
            total_amount1_before_event: before.total1,
            total_supply: state.total_supply,
        };
        self.store.set_event(EventRecord::Withdraw(record)).await?;
        Ok(())
    }

    /// Rebalance totals come from the event body itself; only the tick
    /// and pool price are enriched. On degraded enrichment the event's
    /// own tick stands in and the price reads as zero.
    pub(super) async fn on_rebalance(
        &self,
        meta: EventMeta,
        event: IICHIVault::Rebalance,
    ) -> Result<(), ProjectionError> {
        let (tick, sqrt_price) = match self
            .fetcher
            .fetch_vault_state(meta.src_address, meta.chain_id)
            .await
        {
            EnrichedVaultState::Fresh(state) => (state.tick, state.sqrt_price),
            EnrichedVaultState::Degraded { .. } => (event.tick, U256::ZERO),
        };

        let record = records::VaultRebalance {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            tick,
            total_amount0: event.totalAmount0,
            total_amount1: event.totalAmount1,
            fee_amount0: event.feeAmount0,
            fee_amount1: event.feeAmount1,
            total_supply: event.totalSupply,
            sqrt_price,
        };
        self.store.set_event(EventRecord::Rebalance(record)).await?;
        Ok(())
    }

    /// Ledger first, record second, so a record write failure never
    /// leaves a transfer half-recorded with no balance movement.
    pub(super) async fn on_transfer(
        &self,
        meta: EventMeta,
        event: IICHIVault::Transfer,
    ) -> Result<(), ProjectionError> {
        apply_transfer(
            &self.store,
            meta.src_address,
            event.from,
            event.to,
            event.value,
            meta.block_timestamp,
        )
        .await?;

        let record = records::VaultTransfer {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            from: event.from,
            to: event.to,
            value: event.value,
        };
        self.store.set_event(EventRecord::Transfer(record)).await?;
        Ok(())
    }

    pub(super) async fn on_vault_ownership_transferred(
        &self,
        meta: EventMeta,
        event: IICHIVault::OwnershipTransferred,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultOwnershipTransferred {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            previous_owner: event.previousOwner,
            new_owner: event.newOwner,
        };
        self.store
            .set_event(EventRecord::VaultOwnershipTransferred(record))
            .await?;
        Ok(())
    }

    pub(super) async fn on_affiliate(
        &self,
        meta: EventMeta,
        event: IICHIVault::Affiliate,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultAffiliate {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            affiliate: event.affiliate,
        };
        self.store.set_event(EventRecord::Affiliate(record)).await?;
        Ok(())
    }

    pub(super) async fn on_approval(
        &self,
        meta: EventMeta,
        event: IICHIVault::Approval,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultApproval {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            owner: event.owner,
            spender: event.spender,
            value: event.value,
        };
        self.store.set_event(EventRecord::Approval(record)).await?;
        Ok(())
    }

    pub(super) async fn on_deploy(
        &self,
        meta: EventMeta,
        event: IICHIVault::DeployICHIVault,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultDeploy {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            pool: event.pool,
            allow_token0: event.allowToken0,
            allow_token1: event.allowToken1,
            owner: event.owner,
            twap_period: event.twapPeriod,
        };
        self.store.set_event(EventRecord::Deploy(record)).await?;
        Ok(())
    }

    pub(super) async fn on_deposit_max(
        &self,
        meta: EventMeta,
        event: IICHIVault::DepositMax,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultDepositMax {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            deposit0_max: event.deposit0Max,
            deposit1_max: event.deposit1Max,
        };
        self.store
            .set_event(EventRecord::DepositMax(record))
            .await?;
        Ok(())
    }

    pub(super) async fn on_hysteresis(
        &self,
        meta: EventMeta,
        event: IICHIVault::Hysteresis,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultHysteresis {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            hysteresis: event.hysteresis,
        };
        self.store
            .set_event(EventRecord::Hysteresis(record))
            .await?;
        Ok(())
    }

    pub(super) async fn on_max_total_supply(
        &self,
        meta: EventMeta,
        event: IICHIVault::MaxTotalSupply,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultMaxTotalSupply {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            max_total_supply: event.maxTotalSupply,
        };
        self.store
            .set_event(EventRecord::MaxTotalSupply(record))
            .await?;
        Ok(())
    }

    pub(super) async fn on_set_twap_period(
        &self,
        meta: EventMeta,
        event: IICHIVault::SetTwapPeriod,
    ) -> Result<(), ProjectionError> {
        let record = records::VaultSetTwapPeriod {
            id: meta.event_id(),
            timestamp: meta.block_timestamp,
            vault: meta.src_address,
            sender: event.sender,
            new_twap_period: event.newTwapPeriod,
        };
        self.store
            .set_event(EventRecord::SetTwapPeriod(record))
            .await?;
        Ok(())
    }
}
