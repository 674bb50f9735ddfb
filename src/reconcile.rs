//! Derives pre-event vault totals from the post-event totals reported by
//! enrichment and the amounts moved by the event itself.

use alloy::primitives::U256;
use tracing::warn;

use crate::event_id::EventId;

/// Which way the event moved liquidity relative to the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityDirection {
    Deposit,
    Withdraw,
}

/// Vault totals reconstructed as of the instant before the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeTotals {
    pub total0: U256,
    pub total1: U256,
}

/// A deposit added the event amounts, so the before-state is current
/// minus delta; a withdrawal removed them, so it is current plus delta.
/// Deposit underflow clamps to zero with a warning rather than failing,
/// since degraded enrichment can report totals smaller than the delta.
pub fn reconcile_before(
    event_id: &EventId,
    current0: U256,
    current1: U256,
    delta0: U256,
    delta1: U256,
    direction: LiquidityDirection,
) -> BeforeTotals {
    match direction {
        LiquidityDirection::Deposit => BeforeTotals {
            total0: clamped_sub(event_id, "total0", current0, delta0),
            total1: clamped_sub(event_id, "total1", current1, delta1),
        },
        LiquidityDirection::Withdraw => BeforeTotals {
            total0: current0.saturating_add(delta0),
            total1: current1.saturating_add(delta1),
        },
    }
}

fn clamped_sub(event_id: &EventId, side: &'static str, current: U256, delta: U256) -> U256 {
    match current.checked_sub(delta) {
        Some(before) => before,
        None => {
            warn!(
                event_id = %event_id,
                side,
                %current,
                %delta,
                "event delta exceeds current totals, clamping before-state to zero"
            );
            U256::ZERO
        }
    }
}
