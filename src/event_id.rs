use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identity key for a single emitted log: chain id, block number, and
/// position in the block rendered in decimal and joined by `_`. Two logs
/// with the same triple are the same event, which makes this the
/// idempotency key for every downstream upsert. Ordering is the event
/// source's responsibility; this type only encodes identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(chain_id: u64, block_number: u64, log_index: u64) -> Self {
        Self(format!("{chain_id}_{block_number}_{log_index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn joins_triple_with_underscores() {
        let id = EventId::new(137, 4_931_925, 12);
        assert_eq!(id.as_str(), "137_4931925_12");
    }

    #[test]
    fn same_inputs_yield_same_id() {
        assert_eq!(EventId::new(1, 2, 3), EventId::new(1, 2, 3));
    }

    #[test]
    fn shifted_digits_do_not_collide() {
        // Decimal digits carry no underscore, so the triple is recoverable
        // from the rendered key.
        assert_ne!(EventId::new(1, 23, 4), EventId::new(12, 3, 4));
        assert_ne!(EventId::new(1, 2, 34), EventId::new(1, 23, 4));
    }

    proptest! {
        #[test]
        fn identity_is_injective(
            a in (any::<u64>(), any::<u64>(), any::<u64>()),
            b in (any::<u64>(), any::<u64>(), any::<u64>()),
        ) {
            let left = EventId::new(a.0, a.1, a.2);
            let right = EventId::new(b.0, b.1, b.2);
            prop_assert_eq!(left == right, a == b);
        }

        #[test]
        fn display_matches_key(
            chain_id in any::<u64>(),
            block_number in any::<u64>(),
            log_index in any::<u64>(),
        ) {
            let id = EventId::new(chain_id, block_number, log_index);
            prop_assert_eq!(id.to_string(), id.as_str());
        }
    }
}
