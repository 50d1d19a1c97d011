//! Core Kernel - Foundational types for the settlement system
//!
//! This crate provides the building blocks shared by the settlement domain:
//! - Money types with precise decimal arithmetic and the settlement tolerance
//! - Opaque identifiers for groups, people, and expense items
//! - Common error and port abstractions

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError, MAX_AMOUNT, SETTLEMENT_TOLERANCE};
pub use identifiers::{GroupId, PersonId, ExpenseItemId, IdentifierError};
pub use error::CoreError;
pub use ports::{PortError, DomainPort};
