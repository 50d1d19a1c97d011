//! Group snapshots as fetched from a store
//!
//! A snapshot is trusted to have been validated when it was written, so it
//! bypasses the entry checks of [`Group::insert_item`]. Numeric fields are
//! decoded leniently: a cost that is missing, `null`, not a number, or
//! beyond [`MAX_AMOUNT`] is taken as zero instead of failing the whole
//! snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use tracing::warn;

use core_kernel::{Currency, ExpenseItemId, GroupId, Money, PersonId, MAX_AMOUNT};
use crate::group::{ExpenseItem, Group, Person};

/// A full group as returned by a snapshot port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub items: Vec<ItemSnapshot>,
}

/// An expense item as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ExpenseItemId,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: Decimal,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub paid_by: Option<PersonId>,
    /// `None` when the store did not record splits at all
    #[serde(default)]
    pub split_with: Option<Vec<PersonId>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientCost {
    Amount(Decimal),
    Malformed(IgnoredAny),
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientCost::deserialize(deserializer)? {
        LenientCost::Amount(amount) if amount.abs() > MAX_AMOUNT => {
            warn!(%amount, "Out-of-range expense cost coerced to zero");
            Decimal::ZERO
        }
        LenientCost::Amount(amount) => amount,
        LenientCost::Malformed(_) => {
            warn!("Malformed expense cost coerced to zero");
            Decimal::ZERO
        }
    })
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<PersonId>, D::Error>
where
    D: Deserializer<'de>,
{
    let token: Option<String> = Option::deserialize(deserializer)?;
    Ok(token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(PersonId::from_token))
}

impl GroupSnapshot {
    /// Builds the group aggregate from this snapshot
    ///
    /// `default_currency` applies when the snapshot carries none. Repeated
    /// person or item ids keep their first occurrence. Items with no
    /// recorded splits are split across the whole roster; items whose
    /// recorded split set is empty are dropped.
    pub fn into_group(self, default_currency: Currency) -> Group {
        let currency = self.currency.unwrap_or(default_currency);

        let mut seen_people = HashSet::new();
        let people: Vec<Person> = self
            .people
            .into_iter()
            .filter(|p| {
                let fresh = seen_people.insert(p.id.clone());
                if !fresh {
                    warn!(group_id = %self.id, person_id = %p.id, "Duplicate person in snapshot ignored");
                }
                fresh
            })
            .collect();
        let roster: Vec<PersonId> = people.iter().map(|p| p.id.clone()).collect();

        let mut seen_items = HashSet::new();
        let items: Vec<ExpenseItem> = self
            .items
            .into_iter()
            .filter(|item| {
                let fresh = seen_items.insert(item.id.clone());
                if !fresh {
                    warn!(group_id = %self.id, item_id = %item.id, "Duplicate item in snapshot ignored");
                }
                fresh
            })
            .filter_map(|item| {
                let split_with = match item.split_with {
                    None => roster.clone(),
                    Some(split) if split.is_empty() => {
                        warn!(group_id = %self.id, item_id = %item.id, "Item with empty split set excluded");
                        return None;
                    }
                    Some(split) => split,
                };
                Some(ExpenseItem {
                    id: item.id,
                    description: item.description,
                    cost: Money::new(item.cost, currency),
                    paid_by: item.paid_by,
                    split_with,
                    created_at: item.created_at,
                })
            })
            .collect();

        Group::from_parts(self.id, self.name, currency, people, items)
    }
}

impl From<&Group> for GroupSnapshot {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id().clone(),
            name: group.name().to_string(),
            currency: Some(group.currency()),
            people: group.people().to_vec(),
            items: group
                .items()
                .iter()
                .map(|item| ItemSnapshot {
                    id: item.id.clone(),
                    description: item.description.clone(),
                    cost: item.cost.amount(),
                    paid_by: item.paid_by.clone(),
                    split_with: Some(item.split_with.clone()),
                    created_at: item.created_at,
                })
                .collect(),
        }
    }
}
