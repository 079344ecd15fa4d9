//! Email addresses and deduplicated email sets.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // local@domain.tld, no whitespace, no second `@`.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A validated, normalized (trimmed + lower-cased) email address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: impl AsRef<str>) -> DomainResult<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if !EMAIL_RE.is_match(&normalized) {
            return Err(DomainError::validation(format!(
                "invalid email address: `{}`",
                raw.as_ref().trim()
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for EmailAddress {}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Unordered, deduplicated set of email addresses.
///
/// Serialized as a JSON array (sorted, so equal sets always serialize the same).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailSet(BTreeSet<EmailAddress>);

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every entry, failing on the first malformed address.
    pub fn parse<I, S>(raw: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(EmailAddress::parse)
            .collect::<DomainResult<BTreeSet<_>>>()
            .map(Self)
    }

    /// Parse the comma-separated form used by admin forms (`a@x.com, b@x.com`).
    ///
    /// Empty segments are skipped.
    pub fn parse_list(raw: &str) -> DomainResult<Self> {
        Self::parse(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn insert(&mut self, email: EmailAddress) -> bool {
        self.0.insert(email)
    }

    pub fn contains(&self, email: &EmailAddress) -> bool {
        self.0.contains(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmailAddress> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ValueObject for EmailSet {}

impl FromIterator<EmailAddress> for EmailSet {
    fn from_iter<T: IntoIterator<Item = EmailAddress>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EmailSet {
    type Item = &'a EmailAddress;
    type IntoIter = std::collections::btree_set::Iter<'a, EmailAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = EmailAddress::parse("  QA.Lead@Flexothene.com ").unwrap();
        assert_eq!(email.as_str(), "qa.lead@flexothene.com");
    }

    #[test]
    fn parse_rejects_malformed_addresses() {
        for raw in ["", "qa-lead", "qa@lead", "a b@x.com", "a@@x.com"] {
            assert!(
                matches!(EmailAddress::parse(raw), Err(DomainError::Validation(_))),
                "expected `{raw}` to be rejected"
            );
        }
    }

    #[test]
    fn set_deduplicates_after_normalization() {
        let set = EmailSet::parse(["a@x.com", "A@X.com", "b@x.com"]).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn parse_list_splits_and_skips_blanks() {
        let set = EmailSet::parse_list("tech.lead@flexothene.com, ,developer@flexothene.com,").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&EmailAddress::parse("developer@flexothene.com").unwrap()));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: input order never changes the resulting set.
        #[test]
        fn set_is_order_independent(
            locals in prop::collection::vec("[a-z]{1,8}", 1..8)
        ) {
            let emails: Vec<String> = locals.iter().map(|l| format!("{l}@x.com")).collect();
            let mut reversed = emails.clone();
            reversed.reverse();

            prop_assert_eq!(EmailSet::parse(&emails).unwrap(), EmailSet::parse(&reversed).unwrap());
        }
    }
}
