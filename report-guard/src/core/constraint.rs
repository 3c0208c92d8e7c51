//! Multiplicity constraints over fixed sets of allowed names.
//!
//! A [`Constraint`] pairs one [`Multiplicity`] with the names it governs.
//! Filter constraints may embed a locked value with the `key==value`
//! encoding (for example `country==US`): the key counts towards the
//! multiplicity, and when the key is present the supplied value must equal
//! the locked one.

use crate::error::{Expectation, Feature, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Separator between a filter key and its locked value.
pub const LOCKED_VALUE_SEPARATOR: &str = "==";

/// Splits a `key==value` entry into its key and optional locked value.
pub fn split_locked(entry: &str) -> (&str, Option<&str>) {
    match entry.split_once(LOCKED_VALUE_SEPARATOR) {
        Some((key, value)) => (key, Some(value)),
        None => (entry, None),
    }
}

/// How many names from a constraint's set a request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// Every name must be present.
    Required,
    /// Exactly one name must be present.
    ExactlyOne,
    /// At least one name must be present.
    OneOrMore,
    /// Names may be present; nothing is checked.
    Optional,
    /// At most one name may be present.
    ZeroOrOne,
    /// Any number of names may be present; nothing is checked.
    ZeroOrMore,
}

impl Multiplicity {
    /// Returns the expectation reported when this rule fails, or `None` for
    /// rules that never fail.
    pub fn expectation(&self) -> Option<Expectation> {
        match self {
            Multiplicity::Required => Some(Expectation::All),
            Multiplicity::ExactlyOne => Some(Expectation::ExactlyOne),
            Multiplicity::OneOrMore => Some(Expectation::AtLeastOne),
            Multiplicity::ZeroOrOne => Some(Expectation::ZeroOrOne),
            Multiplicity::Optional | Multiplicity::ZeroOrMore => None,
        }
    }

    /// Returns true if `present` names out of `total` satisfy this rule.
    pub fn is_satisfied(&self, present: usize, total: usize) -> bool {
        match self {
            Multiplicity::Required => present == total,
            Multiplicity::ExactlyOne => present == 1,
            Multiplicity::OneOrMore => present >= 1,
            Multiplicity::ZeroOrOne => present <= 1,
            Multiplicity::Optional | Multiplicity::ZeroOrMore => true,
        }
    }

    /// The snake_case name used in error payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Multiplicity::Required => "required",
            Multiplicity::ExactlyOne => "exactly_one",
            Multiplicity::OneOrMore => "one_or_more",
            Multiplicity::Optional => "optional",
            Multiplicity::ZeroOrOne => "zero_or_one",
            Multiplicity::ZeroOrMore => "zero_or_more",
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multiplicity rule over an immutable set of allowed names.
///
/// # Examples
///
/// ```rust
/// use report_guard::core::Constraint;
/// use std::collections::{BTreeMap, BTreeSet};
///
/// let dims = Constraint::exactly_one(["day", "month"]);
/// let requested: BTreeSet<String> = ["day".to_string()].into();
/// assert!(dims.validate_dimensions(&requested).is_ok());
///
/// let filters = Constraint::required(["country==US"]);
/// let us: BTreeMap<String, String> = [("country".to_string(), "US".to_string())].into();
/// assert!(filters.validate_filters(&us).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constraint {
    multiplicity: Multiplicity,
    values: BTreeSet<String>,
    keys: BTreeSet<String>,
}

impl Constraint {
    /// Creates a constraint from a multiplicity and its allowed names.
    pub fn new<I, S>(multiplicity: Multiplicity, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let keys = values
            .iter()
            .map(|v| split_locked(v).0.to_string())
            .collect();
        Self {
            multiplicity,
            values,
            keys,
        }
    }

    /// Every value must be present.
    pub fn required<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Multiplicity::Required, values)
    }

    /// Exactly one of the values must be present.
    pub fn exactly_one<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Multiplicity::ExactlyOne, values)
    }

    /// At least one of the values must be present.
    pub fn one_or_more<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Multiplicity::OneOrMore, values)
    }

    /// The values may be present; nothing is checked beyond locked values.
    pub fn optional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Multiplicity::Optional, values)
    }

    /// At most one of the values may be present.
    pub fn zero_or_one<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Multiplicity::ZeroOrOne, values)
    }

    /// Any subset of the values may be present.
    pub fn zero_or_more<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Multiplicity::ZeroOrMore, values)
    }

    /// How many of the values a request must supply.
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// The allowed names as declared, locked values included.
    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// The allowed names with any locked value stripped.
    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    /// Iterates over `(key, locked value)` pairs.
    pub fn locked(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().filter_map(|v| match split_locked(v) {
            (key, Some(value)) => Some((key, value)),
            (_, None) => None,
        })
    }

    fn check(&self, feature: Feature, present: usize) -> Result<(), ValidationError> {
        if self.multiplicity.is_satisfied(present, self.keys.len()) {
            return Ok(());
        }

        match self.multiplicity.expectation() {
            Some(expected) => Err(ValidationError::multiplicity(
                feature,
                expected,
                present,
                self.values.iter().cloned(),
            )),
            None => Ok(()),
        }
    }

    /// Validates requested dimension names against this rule.
    pub fn validate_dimensions(&self, inputs: &BTreeSet<String>) -> Result<(), ValidationError> {
        let present = self.keys.iter().filter(|k| inputs.contains(*k)).count();
        self.check(Feature::Dimension, present)
    }

    /// Validates requested filters against this rule.
    ///
    /// Multiplicity is counted on keys only; locked values are checked
    /// afterwards for the keys that are present.
    pub fn validate_filters(&self, inputs: &BTreeMap<String, String>) -> Result<(), ValidationError> {
        let present = self.keys.iter().filter(|k| inputs.contains_key(*k)).count();
        self.check(Feature::Filter, present)?;

        for (key, expected) in self.locked() {
            if let Some(actual) = inputs.get(key) {
                if actual != expected {
                    return Err(ValidationError::LockedValueMismatch {
                        key: key.to_string(),
                        expected: expected.to_string(),
                        actual: actual.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
