//! Test Data Builders
//!
//! Builder patterns for constructing test groups with sensible defaults.
//! Tests name people and payers; ids follow [`crate::fixtures::pid`].

use core_kernel::{Currency, GroupId, PersonId};
use domain_settlement::{Group, GroupSnapshot, Person};
use fake::faker::name::en::FirstName;
use fake::Fake;
use rust_decimal::Decimal;

use crate::fixtures::pid;

/// Builder for constructing test groups
pub struct GroupBuilder {
    id: GroupId,
    name: String,
    currency: Currency,
    people: Vec<Person>,
    expenses: Vec<(String, Decimal, PersonId)>,
}

impl Default for GroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: GroupId::generate(),
            name: "Test group".to_string(),
            currency: Currency::INR,
            people: Vec::new(),
            expenses: Vec::new(),
        }
    }

    /// Sets the group ID
    pub fn with_id(mut self, id: GroupId) -> Self {
        self.id = id;
        self
    }

    /// Sets the group name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Adds a person whose id is `p_<name>`
    pub fn with_person(mut self, name: &str) -> Self {
        self.people.push(Person::new(pid(name), name));
        self
    }

    /// Adds several people in order
    pub fn with_people(self, names: &[&str]) -> Self {
        names.iter().fold(self, |builder, name| builder.with_person(name))
    }

    /// Adds `count` people with generated ids and fake first names
    pub fn with_random_people(mut self, count: usize) -> Self {
        for _ in 0..count {
            let name: String = FirstName().fake();
            self.people.push(Person::new(PersonId::generate(), name));
        }
        self
    }

    /// Adds an expense paid by the person named `payer`
    pub fn with_expense(mut self, description: &str, cost: Decimal, payer: &str) -> Self {
        self.expenses.push((description.to_string(), cost, pid(payer)));
        self
    }

    /// Adds an expense paid by a specific person id
    pub fn with_expense_by(mut self, description: &str, cost: Decimal, payer: PersonId) -> Self {
        self.expenses.push((description.to_string(), cost, payer));
        self
    }

    /// Builds the group, panicking on invalid test data
    pub fn build(self) -> Group {
        let mut group = Group::with_id(self.id, self.name, self.currency);
        for person in self.people {
            group.insert_person(person).expect("Failed to add test person");
        }
        for (description, cost, payer) in self.expenses {
            group
                .add_expense(description, cost, &payer)
                .expect("Failed to add test expense");
        }
        group
    }

    /// Builds the group and converts it to a snapshot
    pub fn build_snapshot(self) -> GroupSnapshot {
        GroupSnapshot::from(&self.build())
    }
}
