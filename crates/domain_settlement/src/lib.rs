//! Settlement Domain - Shared Expense Splitting
//!
//! This crate computes who owes whom inside a group of people sharing
//! expenses. It is built from two pure stages over a group snapshot:
//!
//! 1. **Balance aggregation** ([`aggregator`]): every expense is split evenly
//!    across the group's *current* roster. Payers are credited with what they
//!    paid and everybody is debited the same per-head share.
//! 2. **Settlement reduction** ([`reducer`]): signed balances are matched with
//!    a greedy two-pointer sweep over debtors and creditors, producing at most
//!    `debtors + creditors - 1` payments.
//!
//! Balances within [`core_kernel::SETTLEMENT_TOLERANCE`] of zero count as
//! settled and never produce a payment.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::Currency;
//! use domain_settlement::{Group, settle};
//! use rust_decimal_macros::dec;
//!
//! let mut group = Group::new("Goa trip", Currency::INR);
//! let asha = group.add_person("Asha").unwrap();
//! let _ravi = group.add_person("Ravi").unwrap();
//! group.add_expense("Hotel", dec!(100), &asha).unwrap();
//!
//! let summary = settle(&group);
//! assert_eq!(summary.transactions.len(), 1);
//! assert_eq!(summary.transactions[0].to, asha);
//! ```
//!
//! Roster changes go through [`Group::remove_person`], which applies the
//! [`RosterPolicy`] so the snapshot stays well formed before it reaches the
//! aggregator.

pub mod aggregator;
pub mod reducer;
pub mod group;
pub mod policy;
pub mod summary;
pub mod snapshot;
pub mod ports;
pub mod services;
pub mod config;
pub mod error;

pub use aggregator::{aggregate, Balances, BalanceSheet};
pub use reducer::{reduce, apply, SettlementTransaction};
pub use group::{Group, Person, ExpenseItem, GroupOverview, RemovalReport};
pub use policy::{RosterPolicy, FallbackPayer, EmptySplitPolicy};
pub use summary::{settle, SettlementSummary, MIN_PEOPLE_FOR_SUMMARY};
pub use snapshot::{GroupSnapshot, ItemSnapshot};
pub use ports::GroupSnapshotPort;
pub use services::SettlementService;
pub use crate::config::SettlementConfig;
pub use error::SettlementError;
