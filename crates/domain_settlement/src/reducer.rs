//! Settlement reduction
//!
//! Matches debtors against creditors with a greedy two-pointer sweep.
//!
//! People are classified in a single pass over the balances, in their
//! iteration order: a balance below `-ε` is a debtor, above `+ε` a creditor,
//! anything else is already settled. Neither list is sorted. At each step
//! the current debtor pays the current creditor the smaller of their two
//! remaining amounts, and a cursor moves on once its remaining amount drops
//! below `ε`. Both cursors can move in the same step.
//!
//! Every cursor that is still in range holds at least `ε`, so no payment is
//! ever smaller than `ε`, and each step retires at least one party, which
//! bounds the output at `debtors + creditors - 1` payments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{Money, PersonId, SETTLEMENT_TOLERANCE};
use crate::aggregator::Balances;

/// One peer-to-peer payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    /// Who pays
    pub from: PersonId,
    /// Who receives
    pub to: PersonId,
    /// Always at least the settlement tolerance
    pub amount: Money,
}

impl fmt::Display for SettlementTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

struct Position<'a> {
    id: &'a PersonId,
    remaining: Decimal,
}

/// Produces the payments that settle `balances`
///
/// The result is deterministic for a given mapping. Balances that do not sum
/// to zero are matched until one side runs out; the excess stays unmatched.
pub fn reduce(balances: &Balances) -> Vec<SettlementTransaction> {
    let currency = balances.currency();
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for (id, balance) in balances.iter() {
        let amount = balance.amount();
        if amount < -SETTLEMENT_TOLERANCE {
            debtors.push(Position { id, remaining: -amount });
        } else if amount > SETTLEMENT_TOLERANCE {
            creditors.push(Position { id, remaining: amount });
        }
    }

    let mut transactions = Vec::with_capacity(debtors.len() + creditors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let pay = debtor.remaining.min(creditor.remaining);

        transactions.push(SettlementTransaction {
            from: debtor.id.clone(),
            to: creditor.id.clone(),
            amount: Money::new(pay, currency),
        });

        debtor.remaining -= pay;
        creditor.remaining -= pay;

        if debtor.remaining < SETTLEMENT_TOLERANCE {
            i += 1;
        }
        if creditor.remaining < SETTLEMENT_TOLERANCE {
            j += 1;
        }
    }

    debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        transactions = transactions.len(),
        "Reduced balances to settlement transactions"
    );

    transactions
}

/// Applies payments to balances
///
/// The payer's balance rises by each amount and the payee's falls by it.
/// Applying the output of [`reduce`] to its input leaves every balance
/// settled when the input sums to zero. Payments naming someone absent from
/// `balances` are ignored for that side.
pub fn apply(balances: &Balances, transactions: &[SettlementTransaction]) -> Balances {
    let mut settled = balances.clone();
    for transaction in transactions {
        let amount = transaction.amount.amount();
        settled.adjust(&transaction.from, amount);
        settled.adjust(&transaction.to, -amount);
    }
    settled
}
