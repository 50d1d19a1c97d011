//! Settlement domain errors
//!
//! The aggregator and reducer are total and never fail. These errors come
//! from roster and expense management and from fetching snapshots.

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the settlement domain
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Person is not part of the group roster
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    /// Person id already used in this group
    #[error("Person already exists: {0}")]
    DuplicatePerson(String),

    /// Expense item not found
    #[error("Expense item not found: {0}")]
    ItemNotFound(String),

    /// Expense item id already used in this group
    #[error("Expense item already exists: {0}")]
    DuplicateItem(String),

    /// Expense rejected at the point of entry
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// Generic input validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Removing a person would leave items nobody can share
    #[error("Removing {person} would leave {count} expense item(s) with nobody to split them")]
    OrphanedItems {
        person: String,
        count: usize,
    },

    /// Not enough data for a meaningful summary
    #[error("Need at least {required} people and one expense to summarize, found {people} people and {items} expenses")]
    InsufficientData {
        required: usize,
        people: usize,
        items: usize,
    },

    /// Money arithmetic failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Snapshot could not be fetched
    #[error("Snapshot port error: {0}")]
    Port(#[from] PortError),
}

impl SettlementError {
    pub fn validation(message: impl Into<String>) -> Self {
        SettlementError::Validation(message.into())
    }

    pub fn invalid_expense(message: impl Into<String>) -> Self {
        SettlementError::InvalidExpense(message.into())
    }

    /// Returns true if the error was caused by bad caller input rather than
    /// a failing collaborator
    pub fn is_validation(&self) -> bool {
        !matches!(self, SettlementError::Port(_))
    }
}
