//! Settlement summary
//!
//! Runs both stages over one group and packages the result for display.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{GroupId, Money, PersonId};
use crate::aggregator::{aggregate, Balances};
use crate::error::SettlementError;
use crate::group::Group;
use crate::reducer::{reduce, SettlementTransaction};

/// Smallest roster for which a summary is worth showing
pub const MIN_PEOPLE_FOR_SUMMARY: usize = 2;

const UNKNOWN_PERSON: &str = "Unknown";

/// Balances and payments for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub group_id: GroupId,
    /// Total spend of the group
    pub total: Money,
    /// Share each person carries
    pub average_per_person: Money,
    pub balances: Balances,
    /// Payments in the order they were generated
    pub transactions: Vec<SettlementTransaction>,
}

impl SettlementSummary {
    /// Returns true if nobody needs to pay anybody
    pub fn is_settled(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Human-readable payment lines, e.g. `"Ravi owes Asha Rs.30.00"`
    ///
    /// Amounts are rounded to the currency's decimal places. Ids missing from
    /// the group's roster render as `"Unknown"`.
    pub fn describe(&self, group: &Group) -> Vec<String> {
        let name = |id: &PersonId| group.person_name(id).unwrap_or(UNKNOWN_PERSON).to_string();
        self.transactions
            .iter()
            .map(|t| {
                format!(
                    "{} owes {} {}",
                    name(&t.from),
                    name(&t.to),
                    t.amount.round_to_currency()
                )
            })
            .collect()
    }
}

/// Aggregates and reduces a group in one call
///
/// Total over any group, including empty ones.
pub fn settle(group: &Group) -> SettlementSummary {
    let sheet = aggregate(group.people(), group.items(), group.currency());
    let transactions = reduce(&sheet.balances);

    debug!(
        group_id = %group.id(),
        total = %sheet.total,
        transactions = transactions.len(),
        "Settled group"
    );

    SettlementSummary {
        group_id: group.id().clone(),
        total: sheet.total,
        average_per_person: sheet.per_head,
        balances: sheet.balances,
        transactions,
    }
}

impl Group {
    /// Settles the group if it has enough data to be meaningful
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::InsufficientData`] if the group has fewer
    /// than [`MIN_PEOPLE_FOR_SUMMARY`] people or no expenses
    pub fn summarize(&self) -> Result<SettlementSummary, SettlementError> {
        if self.people().len() < MIN_PEOPLE_FOR_SUMMARY || self.items().is_empty() {
            return Err(SettlementError::InsufficientData {
                required: MIN_PEOPLE_FOR_SUMMARY,
                people: self.people().len(),
                items: self.items().len(),
            });
        }
        Ok(settle(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_describe_uses_names_and_rounds() {
        let mut group = Group::new("Flat", Currency::INR);
        let a = group.add_person("Asha").unwrap();
        group.add_person("Ravi").unwrap();
        group.add_person("Meera").unwrap();
        group.add_expense("Groceries", dec!(100), &a).unwrap();

        let lines = group.summarize().unwrap().describe(&group);

        assert_eq!(lines, vec!["Ravi owes Asha Rs.33.33", "Meera owes Asha Rs.33.33"]);
    }

    #[test]
    fn test_summarize_requires_two_people() {
        let mut group = Group::new("Solo", Currency::INR);
        let a = group.add_person("Asha").unwrap();
        group.add_expense("Coffee", dec!(4), &a).unwrap();

        assert!(matches!(
            group.summarize(),
            Err(SettlementError::InsufficientData { people: 1, items: 1, .. })
        ));
    }

    #[test]
    fn test_settle_empty_group() {
        let summary = settle(&Group::new("Empty", Currency::INR));
        assert!(summary.is_settled());
        assert!(summary.total.is_zero());
        assert!(summary.balances.is_empty());
    }
}
