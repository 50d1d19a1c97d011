//! Roster mutation policy
//!
//! When a person leaves a group the expenses they paid for need a new payer,
//! and any expense with nobody left to share it has to go. Both choices are
//! explicit here instead of depending on the row order of some store.

use serde::{Deserialize, Serialize};

use core_kernel::PersonId;
use crate::group::Person;

/// Who takes over as payer of a removed person's expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPayer {
    /// The earliest-added remaining person
    #[default]
    FirstInRoster,
    /// The most recently added remaining person
    LastInRoster,
}

impl FallbackPayer {
    /// Picks the fallback payer from the remaining roster
    ///
    /// `None` only when nobody remains.
    pub fn choose(&self, remaining: &[Person]) -> Option<PersonId> {
        match self {
            FallbackPayer::FirstInRoster => remaining.first().map(|p| p.id.clone()),
            FallbackPayer::LastInRoster => remaining.last().map(|p| p.id.clone()),
        }
    }
}

/// What happens to an expense left with nobody to split it across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySplitPolicy {
    /// Delete the expense along with the removal
    #[default]
    Delete,
    /// Refuse the removal and leave the group untouched
    Reject,
}

/// Policy applied by [`crate::Group::remove_person`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterPolicy {
    pub fallback_payer: FallbackPayer,
    pub empty_split: EmptySplitPolicy,
}

impl RosterPolicy {
    pub fn new(fallback_payer: FallbackPayer, empty_split: EmptySplitPolicy) -> Self {
        Self {
            fallback_payer,
            empty_split,
        }
    }
}
