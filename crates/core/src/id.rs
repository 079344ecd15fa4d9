//! Strongly-typed identifiers used across the domain.
//!
//! Directory identifiers are caller-chosen slugs (`tech-team`, `qa-review`), not
//! generated values, so every constructor validates its input.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of an attendee group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

/// Identifier of a product category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

fn check_slug(raw: &str, name: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: must not be blank")));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::invalid_id(format!(
            "{name}: `{trimmed}` must not contain whitespace"
        )));
    }
    Ok(trimmed.to_string())
}

macro_rules! impl_slug_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier from a caller-chosen slug.
            ///
            /// Surrounding whitespace is trimmed; blank values and embedded
            /// whitespace are rejected.
            pub fn new(value: impl AsRef<str>) -> DomainResult<Self> {
                check_slug(value.as_ref(), $name).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_slug_newtype!(GroupId, "GroupId");
impl_slug_newtype!(CategoryId, "CategoryId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_trimmed() {
        let id = GroupId::new("  tech-team ").unwrap();
        assert_eq!(id.as_str(), "tech-team");
    }

    #[test]
    fn blank_and_spaced_slugs_are_rejected() {
        assert!(matches!(GroupId::new("   "), Err(DomainError::InvalidId(_))));
        assert!(matches!(CategoryId::new("qa review"), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let ok: CategoryId = serde_json::from_str("\"qa-review\"").unwrap();
        assert_eq!(ok.to_string(), "qa-review");

        let err = serde_json::from_str::<CategoryId>("\"\"");
        assert!(err.is_err());
    }
}
