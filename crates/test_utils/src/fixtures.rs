//! Pre-built Test Fixtures
//!
//! Ready-to-use groups and balance mappings. Person ids are `p_<name>` in
//! lowercase so tests can refer to them without looking them up.

use core_kernel::{Currency, GroupId, PersonId};
use domain_settlement::{Balances, Group, GroupSnapshot};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::builders::GroupBuilder;

/// Person id used by fixtures and builders for a given name
pub fn pid(name: &str) -> PersonId {
    PersonId::from_token(format!("p_{}", name.to_lowercase()))
}

/// Balance mapping in the given order, in rupees
pub fn balances_of(entries: &[(&str, Decimal)]) -> Balances {
    Balances::from_amounts(
        Currency::INR,
        entries.iter().map(|(name, amount)| (pid(name), *amount)),
    )
}

/// Fixture groups
pub struct GroupFixtures;

impl GroupFixtures {
    /// Two people, A paid 100
    pub fn couple_dinner() -> Group {
        GroupBuilder::new()
            .with_name("Dinner")
            .with_people(&["A", "B"])
            .with_expense("Dinner", dec!(100), "A")
            .build()
    }

    /// Three people, A paid 90
    pub fn three_person_cycle() -> Group {
        GroupBuilder::new()
            .with_name("Cycle")
            .with_people(&["A", "B", "C"])
            .with_expense("Groceries", dec!(90), "A")
            .build()
    }

    /// Four friends on a weekend away with several payers
    pub fn weekend_trip() -> Group {
        GroupBuilder::new()
            .with_id(GroupId::from("g_weekend"))
            .with_name("Weekend trip")
            .with_people(&["Asha", "Ravi", "Meera", "Kabir"])
            .with_expense("Hotel", dec!(1200), "Asha")
            .with_expense("Fuel", dec!(350.50), "Ravi")
            .with_expense("Lunch", dec!(289.75), "Meera")
            .with_expense("Snacks", dec!(60), "Ravi")
            .build()
    }

    /// A group with people but no expenses
    pub fn no_expenses() -> Group {
        GroupBuilder::new()
            .with_people(&["A", "B", "C"])
            .build()
    }
}

/// Fixture snapshots
pub struct SnapshotFixtures;

impl SnapshotFixtures {
    /// JSON as a loosely typed store would return it: string and missing
    /// costs, a blank payer, and an item without recorded splits
    pub fn messy_trip_json() -> &'static str {
        r#"{
            "id": "g_messy",
            "name": "Messy trip",
            "people": [
                { "id": "p_a", "name": "A" },
                { "id": "p_b", "name": "B" },
                { "id": "p_c", "name": "C" }
            ],
            "items": [
                { "id": "i_1", "description": "Hotel", "cost": "90.00", "paid_by": "p_a", "split_with": ["p_a", "p_b", "p_c"] },
                { "id": "i_2", "description": "Taxi", "cost": 30, "paid_by": "p_b" },
                { "id": "i_3", "description": "Broken", "cost": "n/a", "paid_by": "p_c", "split_with": ["p_a", "p_b", "p_c"] },
                { "id": "i_4", "description": "No cost", "paid_by": "p_c" },
                { "id": "i_5", "description": "Tip", "cost": null, "paid_by": "" }
            ]
        }"#
    }

    /// Parsed form of [`Self::messy_trip_json`]
    pub fn messy_trip() -> GroupSnapshot {
        serde_json::from_str(Self::messy_trip_json()).expect("fixture JSON is valid")
    }

    /// Snapshot of [`GroupFixtures::three_person_cycle`]
    pub fn three_person_cycle() -> GroupSnapshot {
        GroupSnapshot::from(&GroupFixtures::three_person_cycle())
    }
}
