//! Group aggregate
//!
//! A group owns an insertion-ordered roster of people and an
//! insertion-ordered list of expense items. It is the unit of settlement:
//! every computation runs over exactly one group's current state.
//!
//! # Invariants
//!
//! - Person ids and item ids are unique within the group
//! - Items created through [`Group::add_expense`] have a positive cost no
//!   larger than [`core_kernel::MAX_AMOUNT`], a payer on the roster, and a
//!   split set equal to the roster at that time
//! - After [`Group::remove_person`] no item points at the removed person

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use core_kernel::{Currency, ExpenseItemId, GroupId, Money, PersonId};
use crate::aggregator::sum_costs;
use crate::error::SettlementError;
use crate::policy::{EmptySplitPolicy, RosterPolicy};

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A paid expense
///
/// `split_with` records who was on the roster when the expense was entered.
/// The aggregator does not use it for shares; it only matters for deciding
/// whether an item still has anyone to split across.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: ExpenseItemId,
    pub description: String,
    pub cost: Money,
    pub paid_by: Option<PersonId>,
    pub split_with: Vec<PersonId>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ExpenseItem {
    /// Returns true if the item has nobody to split across
    pub fn has_empty_split(&self) -> bool {
        self.split_with.is_empty()
    }
}

/// Row of a group listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOverview {
    pub id: GroupId,
    pub name: String,
    pub people_count: usize,
    pub items_count: usize,
}

/// Outcome of removing a person from a group
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemovalReport {
    /// Items whose payer moved to the fallback payer (or to nobody)
    pub reassigned_items: Vec<ExpenseItemId>,
    /// Items deleted because nobody was left to split them
    pub deleted_items: Vec<ExpenseItemId>,
    /// The person who took over the removed person's expenses
    pub fallback_payer: Option<PersonId>,
}

/// A group of people sharing expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
    currency: Currency,
    people: Vec<Person>,
    items: Vec<ExpenseItem>,
}

impl Group {
    /// Creates an empty group with a freshly generated id
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Self::with_id(GroupId::generate(), name, currency)
    }

    /// Creates an empty group with a known id
    pub fn with_id(id: GroupId, name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id,
            name: name.into(),
            currency,
            people: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Assembles a group from already-persisted parts without entry validation
    pub(crate) fn from_parts(
        id: GroupId,
        name: String,
        currency: Currency,
        people: Vec<Person>,
        items: Vec<ExpenseItem>,
    ) -> Self {
        Self {
            id,
            name,
            currency,
            people,
            items,
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// People in insertion order
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Items in insertion order
    pub fn items(&self) -> &[ExpenseItem] {
        &self.items
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn item(&self, id: &ExpenseItemId) -> Option<&ExpenseItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn has_person(&self, id: &PersonId) -> bool {
        self.person(id).is_some()
    }

    /// Display name for a person, if they are on the roster
    pub fn person_name(&self, id: &PersonId) -> Option<&str> {
        self.person(id).map(|p| p.name.as_str())
    }

    /// Sum of all item costs in the group currency
    ///
    /// Matches the total computed by [`crate::aggregate`].
    pub fn total_spend(&self) -> Money {
        sum_costs(&self.items, self.currency).0
    }

    /// Returns the listing row for this group
    pub fn overview(&self) -> GroupOverview {
        GroupOverview {
            id: self.id.clone(),
            name: self.name.clone(),
            people_count: self.people.len(),
            items_count: self.items.len(),
        }
    }

    /// Adds a person with a generated id
    ///
    /// # Errors
    ///
    /// Returns error if the name is blank
    pub fn add_person(&mut self, name: impl Into<String>) -> Result<PersonId, SettlementError> {
        let id = PersonId::generate();
        self.insert_person(Person::new(id.clone(), name))?;
        Ok(id)
    }

    /// Adds a person with a caller-chosen id
    ///
    /// # Errors
    ///
    /// - Returns error if the name is blank
    /// - Returns error if the id is already on the roster
    pub fn insert_person(&mut self, person: Person) -> Result<(), SettlementError> {
        if person.name.trim().is_empty() {
            return Err(SettlementError::validation("Person name must not be blank"));
        }
        if self.has_person(&person.id) {
            return Err(SettlementError::DuplicatePerson(person.id.to_string()));
        }

        info!(group_id = %self.id, person_id = %person.id, "Person added");
        self.people.push(person);
        Ok(())
    }

    /// Records an expense paid by a roster member, split across everyone
    /// currently in the group
    ///
    /// # Errors
    ///
    /// See [`Group::insert_item`]
    pub fn add_expense(
        &mut self,
        description: impl Into<String>,
        cost: Decimal,
        paid_by: &PersonId,
    ) -> Result<ExpenseItemId, SettlementError> {
        let id = ExpenseItemId::generate();
        let item = ExpenseItem {
            id: id.clone(),
            description: description.into(),
            cost: Money::new(cost, self.currency),
            paid_by: Some(paid_by.clone()),
            split_with: self.people.iter().map(|p| p.id.clone()).collect(),
            created_at: Some(Utc::now()),
        };
        self.insert_item(item)?;
        Ok(id)
    }

    /// Adds a fully specified expense item
    ///
    /// # Errors
    ///
    /// - Returns error if the cost is not positive or not in the group currency
    /// - Returns [`SettlementError::Money`] if the cost exceeds
    ///   [`core_kernel::MAX_AMOUNT`]
    /// - Returns error if the description is blank
    /// - Returns error if the payer is missing or not on the roster
    /// - Returns error if the split set is empty or names someone off the roster
    /// - Returns error if the id is already used
    pub fn insert_item(&mut self, item: ExpenseItem) -> Result<(), SettlementError> {
        if item.cost.currency() != self.currency {
            return Err(SettlementError::invalid_expense(format!(
                "cost is in {} but the group uses {}",
                item.cost.currency(),
                self.currency
            )));
        }
        if !item.cost.is_positive() {
            return Err(SettlementError::invalid_expense("cost must be greater than zero"));
        }
        item.cost.check_range()?;
        if item.description.trim().is_empty() {
            return Err(SettlementError::invalid_expense("description must not be blank"));
        }
        match &item.paid_by {
            Some(payer) if self.has_person(payer) => {}
            Some(payer) => {
                return Err(SettlementError::invalid_expense(format!(
                    "payer {} is not a member of this group",
                    payer
                )));
            }
            None => return Err(SettlementError::invalid_expense("payer is required")),
        }
        if item.has_empty_split() {
            return Err(SettlementError::invalid_expense("expense must be split with at least one person"));
        }
        if let Some(stranger) = item.split_with.iter().find(|id| !self.has_person(id)) {
            return Err(SettlementError::invalid_expense(format!(
                "{} is not a member of this group",
                stranger
            )));
        }
        if self.item(&item.id).is_some() {
            return Err(SettlementError::DuplicateItem(item.id.to_string()));
        }

        info!(group_id = %self.id, item_id = %item.id, cost = %item.cost, "Expense added");
        self.items.push(item);
        Ok(())
    }

    /// Deletes an expense item
    pub fn remove_item(&mut self, id: &ExpenseItemId) -> Result<ExpenseItem, SettlementError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| SettlementError::ItemNotFound(id.to_string()))?;

        info!(group_id = %self.id, item_id = %id, "Expense removed");
        Ok(self.items.remove(index))
    }

    /// Removes a person and repairs the items that referenced them
    ///
    /// Items paid by the removed person move to the payer chosen by
    /// `policy.fallback_payer`. The person is dropped from every split set.
    /// Items with nobody left to split across are deleted, or the whole
    /// removal is refused, depending on `policy.empty_split`.
    ///
    /// # Errors
    ///
    /// - Returns error if the person is not on the roster
    /// - Returns error if the policy is [`EmptySplitPolicy::Reject`] and
    ///   some item would be orphaned; the group is left unchanged
    pub fn remove_person(
        &mut self,
        id: &PersonId,
        policy: &RosterPolicy,
    ) -> Result<RemovalReport, SettlementError> {
        let index = self
            .people
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| SettlementError::PersonNotFound(id.to_string()))?;

        let remaining: Vec<Person> = self
            .people
            .iter()
            .filter(|p| &p.id != id)
            .cloned()
            .collect();
        let fallback = policy.fallback_payer.choose(&remaining);

        let orphaned: Vec<ExpenseItemId> = self
            .items
            .iter()
            .filter(|item| {
                remaining.is_empty() || item.split_with.iter().all(|member| member == id)
            })
            .map(|item| item.id.clone())
            .collect();

        if !orphaned.is_empty() && policy.empty_split == EmptySplitPolicy::Reject {
            return Err(SettlementError::OrphanedItems {
                person: id.to_string(),
                count: orphaned.len(),
            });
        }

        let mut report = RemovalReport {
            fallback_payer: fallback.clone(),
            deleted_items: orphaned,
            ..RemovalReport::default()
        };

        self.people.remove(index);
        self.items.retain(|item| !report.deleted_items.contains(&item.id));
        for item in &mut self.items {
            item.split_with.retain(|member| member != id);
            if item.paid_by.as_ref() == Some(id) {
                item.paid_by = fallback.clone();
                report.reassigned_items.push(item.id.clone());
            }
        }

        if !report.deleted_items.is_empty() {
            warn!(
                group_id = %self.id,
                person_id = %id,
                deleted = report.deleted_items.len(),
                "Deleted expenses left without anyone to split them"
            );
        }
        info!(
            group_id = %self.id,
            person_id = %id,
            reassigned = report.reassigned_items.len(),
            "Person removed"
        );

        Ok(report)
    }

    /// Returns true if every payer is on the roster and no item has an
    /// empty split set
    pub fn is_well_formed(&self) -> bool {
        self.items.iter().all(|item| {
            !item.has_empty_split()
                && item.paid_by.as_ref().map_or(true, |payer| self.has_person(payer))
        })
    }
}
