//! Global reference data consulted by every validator.
//!
//! The reporting API publishes four vocabularies: dimension names, filter
//! keys (each with an optional list of accepted values), metric names and,
//! for the query facade, ISO 4217 currency codes. They are plain data, so
//! they are loaded from JSON rather than compiled into the validators. The
//! crate bundles a snapshot in `data/vocabulary.json`, available through
//! [`Vocabulary::builtin`].

use crate::error::{ErrorContext, GuardError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, instrument, warn};

const BUNDLED_VOCABULARY: &str = include_str!("../data/vocabulary.json");

static BUILTIN: OnceCell<Vocabulary> = OnceCell::new();

/// Read-only reference data for dimensions, filters, metrics and currencies.
///
/// # Examples
///
/// ```rust
/// use report_guard::vocabulary::Vocabulary;
///
/// let vocab = Vocabulary::builtin().unwrap();
/// assert!(vocab.is_dimension("day"));
/// assert!(vocab.is_deprecated_dimension("7DayTotals"));
/// assert!(vocab.filter_values("country").unwrap().contains("US"));
/// assert_eq!(vocab.metrics_ordered().first().map(String::as_str), Some("views"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    dimensions: BTreeSet<String>,
    #[serde(default)]
    deprecated_dimensions: BTreeSet<String>,
    filters: BTreeMap<String, BTreeSet<String>>,
    metrics: Vec<String>,
    #[serde(default)]
    currencies: BTreeSet<String>,
}

impl Vocabulary {
    /// Returns the bundled vocabulary, parsing it on first use.
    pub fn builtin() -> Result<&'static Vocabulary> {
        BUILTIN.get_or_try_init(|| {
            Self::from_json_str(BUNDLED_VOCABULARY).context("parsing bundled vocabulary")
        })
    }

    /// Parses and checks a vocabulary from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let vocab: Vocabulary = serde_json::from_str(json)?;
        vocab.check()?;
        Ok(vocab)
    }

    /// Reads a vocabulary from a JSON file.
    ///
    /// A file that cannot be read is reported as [`GuardError::Io`]; one
    /// that parses but fails the consistency checks as
    /// [`GuardError::Configuration`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            warn!(error = %e, "Cannot read vocabulary file");
            GuardError::Io(e)
        })?;
        let vocab = Self::from_json_str(&json)?;
        debug!(
            dimensions = vocab.dimensions.len(),
            filters = vocab.filters.len(),
            metrics = vocab.metrics.len(),
            "Loaded vocabulary"
        );
        Ok(vocab)
    }

    fn check(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(GuardError::Configuration(
                "vocabulary defines no dimensions".to_string(),
            ));
        }
        if self.metrics.is_empty() {
            return Err(GuardError::Configuration(
                "vocabulary defines no metrics".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        if let Some(duplicate) = self.metrics.iter().find(|m| !seen.insert(m.as_str())) {
            return Err(GuardError::Configuration(format!(
                "metric '{duplicate}' is listed more than once"
            )));
        }

        if let Some(overlap) = self
            .deprecated_dimensions
            .intersection(&self.dimensions)
            .next()
        {
            return Err(GuardError::Configuration(format!(
                "dimension '{overlap}' is listed as both current and deprecated"
            )));
        }
        Ok(())
    }

    /// Returns true if `name` is a current dimension.
    pub fn is_dimension(&self, name: &str) -> bool {
        self.dimensions.contains(name)
    }

    /// Returns true if `name` is a dimension the API has retired.
    pub fn is_deprecated_dimension(&self, name: &str) -> bool {
        self.deprecated_dimensions.contains(name)
    }

    /// Returns true if `key` is a known filter key.
    pub fn is_filter(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    /// Returns the accepted values for a filter key.
    ///
    /// `None` means the key is unknown; an empty set means any value is accepted.
    pub fn filter_values(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.filters.get(key)
    }

    /// Returns true if `value` is acceptable for the filter `key`.
    pub fn accepts_filter_value(&self, key: &str, value: &str) -> bool {
        self.filters
            .get(key)
            .is_some_and(|values| values.is_empty() || values.contains(value))
    }

    /// Returns true if `name` is a known metric.
    pub fn is_metric(&self, name: &str) -> bool {
        self.metrics.iter().any(|m| m == name)
    }

    /// Returns every metric in the order the API documents them.
    pub fn metrics_ordered(&self) -> &[String] {
        &self.metrics
    }

    /// Returns true if `code` is a known ISO 4217 currency code.
    pub fn is_currency(&self, code: &str) -> bool {
        self.currencies.contains(code)
    }
}
