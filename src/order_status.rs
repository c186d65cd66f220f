//! Order status state machine
//!
//! The canonical lifecycle is a strictly forward progression:
//!
//! ```text
//! Order placed → Order accepted → Packed → Shipped → Delivered
//! ```
//!
//! with `Cancelled` reachable from any non-terminal status. `Delivered` and
//! `Cancelled` are absorbing: no further transitions are accepted. Inventory
//! is deducted on exactly one edge, `Order placed → Order accepted`.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Order placed")]
    Placed,
    #[serde(rename = "Order accepted")]
    Accepted,
    #[serde(rename = "Packed")]
    Packed,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: &'static [OrderStatus] = &[
        Self::Placed,
        Self::Accepted,
        Self::Packed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire/database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "Order placed",
            Self::Accepted => "Order accepted",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parse the exact canonical form; anything else is rejected
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    /// Position in the forward progression. `Cancelled` sits outside it.
    fn rank(&self) -> Option<u8> {
        match self {
            Self::Placed => Some(0),
            Self::Accepted => Some(1),
            Self::Packed => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The single edge that triggers stock deduction
    pub fn deducts_inventory(current: OrderStatus, requested: OrderStatus) -> bool {
        current == Self::Placed && requested == Self::Accepted
    }

    /// Server-side transition guard.
    ///
    /// Rejects any transition out of a terminal status, any re-entrant or
    /// backward move, and permits `Cancelled` from every non-terminal status.
    pub fn validate_transition(self, requested: OrderStatus) -> Result<(), AppError> {
        if self.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::OrderAlreadyFinal,
                format!("Order is already {}", self.as_str()),
            ));
        }

        if requested == Self::Cancelled {
            return Ok(());
        }

        match (self.rank(), requested.rank()) {
            (Some(current), Some(next)) if next > current => Ok(()),
            _ => Err(AppError::with_message(
                ErrorCode::OrderTransitionNotAllowed,
                format!(
                    "Cannot move order from {} to {}",
                    self.as_str(),
                    requested.as_str()
                ),
            )),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_forms_only() {
        assert_eq!(OrderStatus::parse("Order placed"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::parse("Packed"), Some(OrderStatus::Packed));
        assert_eq!(OrderStatus::parse("Cancelled"), Some(OrderStatus::Cancelled));
        // Non-canonical capitalization observed in one UI list is rejected
        assert_eq!(OrderStatus::parse("Order Placed"), None);
        assert_eq!(OrderStatus::parse("order placed"), None);
        assert_eq!(OrderStatus::parse("Returned"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn forward_transitions_are_allowed() {
        use OrderStatus::*;
        for (from, to) in [
            (Placed, Accepted),
            (Placed, Shipped),
            (Accepted, Packed),
            (Accepted, Delivered),
            (Packed, Shipped),
            (Shipped, Delivered),
        ] {
            assert!(from.validate_transition(to).is_ok(), "{from} -> {to}");
        }
    }

    #[test]
    fn backward_and_reentrant_transitions_are_rejected() {
        use OrderStatus::*;
        for (from, to) in [
            (Accepted, Placed),
            (Shipped, Accepted),
            (Shipped, Packed),
            (Placed, Placed),
            (Packed, Packed),
        ] {
            let err = from.validate_transition(to).unwrap_err();
            assert_eq!(err.code, ErrorCode::OrderTransitionNotAllowed, "{from} -> {to}");
        }
    }

    #[test]
    fn terminal_statuses_accept_nothing() {
        use OrderStatus::*;
        for from in [Delivered, Cancelled] {
            for to in OrderStatus::ALL {
                let err = from.validate_transition(*to).unwrap_err();
                assert_eq!(err.code, ErrorCode::OrderAlreadyFinal, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn cancellation_is_reachable_from_any_non_terminal_status() {
        use OrderStatus::*;
        for from in [Placed, Accepted, Packed, Shipped] {
            assert!(from.validate_transition(Cancelled).is_ok(), "{from}");
        }
    }

    #[test]
    fn only_the_accept_edge_deducts_inventory() {
        use OrderStatus::*;
        assert!(OrderStatus::deducts_inventory(Placed, Accepted));
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                if (*from, *to) != (Placed, Accepted) {
                    assert!(!OrderStatus::deducts_inventory(*from, *to), "{from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&OrderStatus::Placed).unwrap();
        assert_eq!(json, "\"Order placed\"");
        let back: OrderStatus = serde_json::from_str("\"Order accepted\"").unwrap();
        assert_eq!(back, OrderStatus::Accepted);
    }
}
