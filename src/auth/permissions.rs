//! Permission catalog
//!
//! Closed set of administrative capabilities. Every route declares its
//! requirement against this enum, so an operation can never reference a
//! permission that does not exist.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageOrders,
    ManageInventory,
    ManageProducts,
    ManageUsers,
    ManageAdmins,
    ManagePayments,
    ManageBrands,
    ManageCategories,
    ManageQuestions,
    ManageLivePrices,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Self::ManageOrders,
        Self::ManageInventory,
        Self::ManageProducts,
        Self::ManageUsers,
        Self::ManageAdmins,
        Self::ManagePayments,
        Self::ManageBrands,
        Self::ManageCategories,
        Self::ManageQuestions,
        Self::ManageLivePrices,
    ];

    /// Name as stored in the `permissions` table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageOrders => "manage_orders",
            Self::ManageInventory => "manage_inventory",
            Self::ManageProducts => "manage_products",
            Self::ManageUsers => "manage_users",
            Self::ManageAdmins => "manage_admins",
            Self::ManagePayments => "manage_payments",
            Self::ManageBrands => "manage_brands",
            Self::ManageCategories => "manage_categories",
            Self::ManageQuestions => "manage_questions",
            Self::ManageLivePrices => "manage_live_prices",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_permission_round_trips_through_its_name() {
        for p in Permission::ALL {
            assert_eq!(Permission::parse(p.as_str()), Some(*p));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Permission::parse("manage_everything"), None);
        assert_eq!(Permission::parse("MANAGE_ORDERS"), None);
        assert_eq!(Permission::parse(""), None);
    }

    #[test]
    fn serde_matches_table_names() {
        let json = serde_json::to_string(&Permission::ManageLivePrices).unwrap();
        assert_eq!(json, "\"manage_live_prices\"");
    }
}
