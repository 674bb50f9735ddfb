use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Normalized share balance in whole-token units (raw value divided by
/// 10^18, fractional part preserved). Conceptually unsigned; signed so a
/// transfer observed before the matching mint leaves a transient negative
/// instead of failing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ShareBalance(pub(crate) Decimal);

impl ShareBalance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Display for ShareBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ShareBalance> for Decimal {
    fn from(value: ShareBalance) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("balance arithmetic overflow: {lhs} {operation} {rhs}")]
pub struct BalanceOverflow {
    pub operation: String,
    pub lhs: ShareBalance,
    pub rhs: ShareBalance,
}

impl std::ops::Add for ShareBalance {
    type Output = Result<Self, BalanceOverflow>;

    fn add(self, rhs: Self) -> Self::Output {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| BalanceOverflow {
                operation: "+".to_string(),
                lhs: self,
                rhs,
            })
    }
}

impl std::ops::Sub for ShareBalance {
    type Output = Result<Self, BalanceOverflow>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or_else(|| BalanceOverflow {
                operation: "-".to_string(),
                lhs: self,
                rhs,
            })
    }
}

/// One vault contract, keyed by its address. Holder count is the only field
/// mutated after the initial write, and only by the transfer ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: Address,
    pub sender: Address,
    pub token_a: Address,
    pub allow_token_a: bool,
    pub token_b: Address,
    pub allow_token_b: bool,
    pub fee: u32,
    pub count: U256,
    pub created_at_timestamp: u64,
    pub holders_count: u32,
}

impl Vault {
    /// Minimal record for a vault referenced by activity before its factory
    /// creation event has been indexed. Metadata stays zeroed until that
    /// event arrives under the same key.
    pub fn placeholder(id: Address, created_at_timestamp: u64) -> Self {
        Self {
            id,
            sender: Address::ZERO,
            token_a: Address::ZERO,
            allow_token_a: false,
            token_b: Address::ZERO,
            allow_token_b: false,
            fee: 0,
            count: U256::ZERO,
            created_at_timestamp,
            holders_count: 0,
        }
    }
}

/// One wallet or contract address seen as a transfer party. Identity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Address,
}

/// Composite key for a (vault, user) share position: the two checksummed
/// addresses joined by `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultShareId(String);

impl VaultShareId {
    pub fn new(vault: Address, user: Address) -> Self {
        Self(format!("{vault}-{user}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VaultShareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Join entity between [`Vault`] and [`User`]; the only place balances live.
/// Never deleted: zero balance is a valid terminal state, not absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultShare {
    pub id: VaultShareId,
    pub vault: Address,
    pub user: Address,
    pub balance: ShareBalance,
}

impl VaultShare {
    pub fn zeroed(vault: Address, user: Address) -> Self {
        Self {
            id: VaultShareId::new(vault, user),
            vault,
            user,
            balance: ShareBalance::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::str::FromStr;

    #[test]
    fn add_succeeds() {
        let a = ShareBalance(Decimal::ONE);
        let b = ShareBalance(Decimal::TWO);

        let result = (a + b).unwrap();

        assert_eq!(result.0, Decimal::from(3));
    }

    #[test]
    fn sub_can_go_negative() {
        let a = ShareBalance(Decimal::ONE);
        let b = ShareBalance(Decimal::TWO);

        let result = (a - b).unwrap();

        assert_eq!(result.0, Decimal::NEGATIVE_ONE);
        assert!(!result.is_zero());
    }

    #[test]
    fn add_overflow_returns_error() {
        let max = ShareBalance(Decimal::MAX);
        let one = ShareBalance(Decimal::ONE);

        let err = (max + one).unwrap_err();

        assert_eq!(err.operation, "+");
        assert_eq!(err.lhs, max);
        assert_eq!(err.rhs, one);
    }

    #[test]
    fn sub_overflow_returns_error() {
        let min = ShareBalance(Decimal::MIN);
        let one = ShareBalance(Decimal::ONE);

        let err = (min - one).unwrap_err();

        assert_eq!(err.operation, "-");
    }

    #[test]
    fn fractional_balance_is_not_zero() {
        let balance = ShareBalance(Decimal::from_str("0.000000000000000001").unwrap());
        assert!(!balance.is_zero());
    }

    #[test]
    fn share_id_joins_addresses_with_dash() {
        let vault = address!("0x1111111111111111111111111111111111111111");
        let user = address!("0x2222222222222222222222222222222222222222");

        let id = VaultShareId::new(vault, user);

        assert_eq!(id.as_str(), format!("{vault}-{user}"));
        assert_ne!(id, VaultShareId::new(user, vault));
    }

    #[test]
    fn placeholder_vault_has_empty_metadata() {
        let id = address!("0x3333333333333333333333333333333333333333");

        let vault = Vault::placeholder(id, 1_700_000_000);

        assert_eq!(vault.id, id);
        assert_eq!(vault.sender, Address::ZERO);
        assert_eq!(vault.token_a, Address::ZERO);
        assert_eq!(vault.fee, 0);
        assert_eq!(vault.count, U256::ZERO);
        assert_eq!(vault.holders_count, 0);
        assert_eq!(vault.created_at_timestamp, 1_700_000_000);
    }

    #[test]
    fn zeroed_share_references_both_sides() {
        let vault = address!("0x1111111111111111111111111111111111111111");
        let user = address!("0x2222222222222222222222222222222222222222");

        let share = VaultShare::zeroed(vault, user);

        assert_eq!(share.id, VaultShareId::new(vault, user));
        assert_eq!(share.vault, vault);
        assert_eq!(share.user, user);
        assert!(share.balance.is_zero());
    }
}
