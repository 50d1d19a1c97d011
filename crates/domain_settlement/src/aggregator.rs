//! Balance aggregation
//!
//! Turns a roster and its expense items into one signed balance per person:
//! positive means the person is owed money, negative means they owe.
//!
//! Every item is split evenly across the *current* roster, whatever the
//! item's recorded split set says. The per-head share is a single
//! group-wide figure, `total / headcount`, computed once.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{Currency, Money, PersonId};
use crate::group::{ExpenseItem, Person};

/// Signed balance per person, in roster order
///
/// Iteration order is insertion order. The reducer relies on it to discover
/// debtors and creditors in the order people joined the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    currency: Currency,
    entries: IndexMap<PersonId, Decimal>,
}

impl Balances {
    /// Creates an empty balance mapping
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            entries: IndexMap::new(),
        }
    }

    /// Builds balances from `(person, amount)` pairs, keeping their order
    ///
    /// A repeated person keeps its first position and its last amount.
    pub fn from_amounts<I, P>(currency: Currency, amounts: I) -> Self
    where
        I: IntoIterator<Item = (P, Decimal)>,
        P: Into<PersonId>,
    {
        let entries = amounts
            .into_iter()
            .map(|(id, amount)| (id.into(), Money::new(amount, currency).amount()))
            .collect();
        Self { currency, entries }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.entries.contains_key(id)
    }

    /// Balance of one person
    pub fn get(&self, id: &PersonId) -> Option<Money> {
        self.entries
            .get(id)
            .map(|amount| Money::new(*amount, self.currency))
    }

    /// Iterates balances in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, Money)> + '_ {
        self.entries
            .iter()
            .map(move |(id, amount)| (id, Money::new(*amount, self.currency)))
    }

    /// Sum of all balances
    ///
    /// Zero (up to per-head rounding) when every item has a payer on the
    /// roster.
    pub fn net(&self) -> Money {
        Money::new(
            self.entries
                .values()
                .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount)),
            self.currency,
        )
    }

    /// Returns true if every balance is within the settlement tolerance
    pub fn is_settled(&self) -> bool {
        self.iter().all(|(_, balance)| balance.is_settled())
    }

    /// Sets a person's balance to zero, adding them if absent
    pub(crate) fn open(&mut self, id: PersonId) {
        self.entries.entry(id).or_insert(Decimal::ZERO);
    }

    /// Adds to an existing balance; returns false if the person is unknown
    ///
    /// Saturates at the limits of `Decimal` instead of overflowing.
    pub(crate) fn adjust(&mut self, id: &PersonId, delta: Decimal) -> bool {
        match self.entries.get_mut(id) {
            Some(amount) => {
                *amount = Money::new(amount.saturating_add(delta), self.currency).amount();
                true
            }
            None => false,
        }
    }
}

/// Output of [`aggregate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Sum of every item's cost
    pub total: Money,
    /// Group-wide share each person owes
    pub per_head: Money,
    pub balances: Balances,
}

/// Computes the total spend and every person's signed balance
///
/// The function is total. An empty roster yields empty balances and a zero
/// per-head share. Items in a currency other than `currency` count as zero,
/// as does an item that would overflow the running total. Items whose payer
/// is unset or not on the roster still count toward the total and the
/// per-head share, but nobody is credited for them.
pub fn aggregate(people: &[Person], items: &[ExpenseItem], currency: Currency) -> BalanceSheet {
    let mut balances = Balances::new(currency);
    for person in people {
        balances.open(person.id.clone());
    }

    let (total, costs) = sum_costs(items, currency);

    // An empty roster is the only zero divisor
    let per_head = total
        .divide(Decimal::from(people.len()))
        .unwrap_or_else(|_| Money::zero(currency));

    for (item, cost) in items.iter().zip(costs) {
        let Some(payer) = &item.paid_by else {
            continue;
        };
        if !balances.adjust(payer, cost) {
            warn!(
                item_id = %item.id,
                payer = %payer,
                "Payer is not on the roster; expense credited to nobody"
            );
        }
    }

    for person in people {
        balances.adjust(&person.id, -per_head.amount());
    }

    debug!(
        people = people.len(),
        items = items.len(),
        total = %total.amount(),
        per_head = %per_head.amount(),
        "Aggregated balances"
    );

    BalanceSheet {
        total,
        per_head,
        balances,
    }
}

/// Total spend and the cost each item contributes to it, in item order
pub(crate) fn sum_costs(items: &[ExpenseItem], currency: Currency) -> (Money, Vec<Decimal>) {
    let mut total = Money::zero(currency);
    let mut costs = Vec::with_capacity(items.len());

    for item in items {
        let cost = Money::new(coerced_cost(item, currency), currency);
        match total.checked_add(&cost) {
            Ok(sum) => {
                total = sum;
                costs.push(cost.amount());
            }
            Err(error) => {
                warn!(
                    item_id = %item.id,
                    cost = %cost.amount(),
                    %error,
                    "Expense counted as zero; group total would overflow"
                );
                costs.push(Decimal::ZERO);
            }
        }
    }

    (total, costs)
}

fn coerced_cost(item: &ExpenseItem, currency: Currency) -> Decimal {
    if item.cost.currency() != currency {
        warn!(
            item_id = %item.id,
            item_currency = %item.cost.currency(),
            group_currency = %currency,
            "Expense in a foreign currency counted as zero"
        );
        return Decimal::ZERO;
    }
    item.cost.amount()
}
