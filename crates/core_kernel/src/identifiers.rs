//! Strongly-typed identifiers for settlement entities
//!
//! Identifiers are opaque string tokens. Newtype wrappers keep a person id
//! from being passed where an item id is expected, while still accepting
//! whatever token an upstream store handed out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when parsing an identifier from a string
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier must not be blank")]
    Blank,
}

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random token with this identifier's prefix
            pub fn generate() -> Self {
                Self(format!("{}_{}", $prefix, Uuid::new_v4().simple()))
            }

            /// Wraps an existing token as-is
            pub fn from_token(token: impl Into<String>) -> Self {
                Self(token.into())
            }

            /// Returns the raw token
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the identifier prefix used by [`Self::generate`]
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = s.trim();
                if token.is_empty() {
                    return Err(IdentifierError::Blank);
                }
                Ok(Self(token.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(token: &str) -> Self {
                Self(token.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(GroupId, "g");
define_id!(PersonId, "p");
define_id!(ExpenseItemId, "i");
