//! Error types for the report-guard validation engine.
//!
//! Two layers are exposed. [`ValidationError`] is the closed taxonomy of
//! request rejections produced by the engine itself; every variant carries
//! the fields a caller needs to render its own message (offending feature,
//! offending names, and for multiplicity failures the full allowed set and
//! the expected/actual counts). [`GuardError`] is the crate-level error that
//! additionally covers query facade argument checks and vocabulary loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kind of request feature a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Dimension,
    Filter,
    Metric,
    SortOption,
}

impl Feature {
    /// Returns the human-readable label used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Dimension => "dimension",
            Feature::Filter => "filter",
            Feature::Metric => "metric",
            Feature::SortOption => "sort option",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The count a multiplicity rule expected from its allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Every allowed name must be present.
    All,
    /// Exactly one allowed name must be present.
    ExactlyOne,
    /// At least one allowed name must be present.
    AtLeastOne,
    /// At most one allowed name may be present.
    ZeroOrOne,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Expectation::All => "all",
            Expectation::ExactlyOne => "1",
            Expectation::AtLeastOne => "at least 1",
            Expectation::ZeroOrOne => "0 or 1",
        };
        f.write_str(label)
    }
}

/// A classified rejection of a report request.
///
/// Rejections are never systemic faults: nothing inside the engine is
/// retried, and the first failing rule wins.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// No metrics were requested.
    #[error("expected at least 1 metric, got 0")]
    MissingMetrics,

    /// Names that are not part of the global vocabulary for their feature.
    #[error(
        "invalid {feature}(s) provided: {}{}",
        .names.join(", "),
        deprecated_note(.deprecated)
    )]
    InvalidNames {
        feature: Feature,
        names: Vec<String>,
        /// The subset of `names` the API once accepted but has retired.
        deprecated: Vec<String>,
    },

    /// Globally valid names the selected report type does not allow.
    #[error("unsupported {feature}(s) for selected report type: {}", .names.join(", "))]
    Unsupported { feature: Feature, names: Vec<String> },

    /// A multiplicity rule saw the wrong number of names from its set.
    #[error("expected {expected} {feature}(s) from {}, got {actual}", .allowed.join(", "))]
    Multiplicity {
        feature: Feature,
        expected: Expectation,
        actual: usize,
        allowed: Vec<String>,
    },

    /// A filter locked to a single value by the report type received another.
    #[error(
        "unsupported value for filter '{key}' for selected report type: '{actual}' (expected '{expected}')"
    )]
    LockedValueMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// A filter value outside the vocabulary's allowed values for that key.
    #[error("invalid value for filter '{key}': '{value}'")]
    InvalidFilterValue { key: String, value: String },

    /// A detailed report type was requested without a row count.
    #[error("expected a maximum number of results")]
    MissingResultCount,

    /// A detailed report type was asked for more rows than it serves.
    #[error("expected no more than {maximum} results, got {requested}")]
    ExcessiveResultCount { requested: u32, maximum: u32 },

    /// A detailed report type was requested without sort options.
    #[error("expected at least 1 sort option, got 0")]
    MissingSortOptions,

    /// The requested page runs past the report type's row ceiling.
    #[error(
        "the start index is too high: rows {start_index} to {} exceed the maximum of {maximum}",
        last_row(.start_index, .max_results)
    )]
    StartIndexTooHigh {
        start_index: u32,
        max_results: u32,
        maximum: u32,
    },

    /// Ascending sort options on a report type that only sorts descending.
    #[error(
        "dimensions and filters are incompatible with ascending sort options: {} (hint: prefix with '-')",
        .names.join(", ")
    )]
    DescendingOnly { names: Vec<String> },

    /// A filter value the dimension/filter combination cannot serve.
    #[error("dimensions and filters are incompatible with value '{value}' for filter '{key}'")]
    IncompatibleFilterValue { key: String, value: String },

    /// A filter carried several comma-joined IDs where only one is accepted.
    #[error("only one {filter} ID can be provided when '{dimension}' is a dimension")]
    MultipleIds { filter: String, dimension: String },
}

fn deprecated_note(deprecated: &[String]) -> String {
    if deprecated.is_empty() {
        String::new()
    } else {
        format!(" ({} deprecated)", deprecated.join(", "))
    }
}

fn last_row(start_index: &u32, max_results: &u32) -> u64 {
    (u64::from(*start_index) + u64::from(*max_results)).saturating_sub(1)
}

fn sorted_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    names.sort();
    names.dedup();
    names
}

impl ValidationError {
    /// Creates an invalid-name error; names are sorted for stable messages.
    pub fn invalid<I, S>(feature: Feature, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::InvalidNames {
            feature,
            names: sorted_names(names),
            deprecated: Vec::new(),
        }
    }

    /// Creates an invalid-dimension error, flagging the retired names among them.
    pub fn invalid_dimensions<I, S, D, T>(names: I, deprecated: D) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::InvalidNames {
            feature: Feature::Dimension,
            names: sorted_names(names),
            deprecated: sorted_names(deprecated),
        }
    }

    /// Creates an unsupported-for-report-type error.
    pub fn unsupported<I, S>(feature: Feature, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Unsupported {
            feature,
            names: sorted_names(names),
        }
    }

    /// Creates a multiplicity error.
    pub fn multiplicity<I, S>(feature: Feature, expected: Expectation, actual: usize, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multiplicity {
            feature,
            expected,
            actual,
            allowed: sorted_names(allowed),
        }
    }

    /// Returns the feature this error refers to, if it is feature-scoped.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            Self::MissingMetrics => Some(Feature::Metric),
            Self::InvalidNames { feature, .. }
            | Self::Unsupported { feature, .. }
            | Self::Multiplicity { feature, .. } => Some(*feature),
            Self::LockedValueMismatch { .. }
            | Self::InvalidFilterValue { .. }
            | Self::IncompatibleFilterValue { .. }
            | Self::MultipleIds { .. } => Some(Feature::Filter),
            Self::MissingSortOptions | Self::DescendingOnly { .. } => Some(Feature::SortOption),
            Self::MissingResultCount
            | Self::ExcessiveResultCount { .. }
            | Self::StartIndexTooHigh { .. } => None,
        }
    }
}

/// The crate-level error type.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The request was rejected by the validation engine.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// A query facade argument was rejected before resolution.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Reference data or logging setup was unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl GuardError {
    /// Returns the engine rejection, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// The `Result` type used throughout report-guard.
///
/// Engine-level operations use `Result<T, ValidationError>`; everything else
/// defaults to [`GuardError`].
pub type Result<T, E = GuardError> = std::result::Result<T, E>;

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            GuardError::Configuration(inner) => {
                GuardError::Configuration(format!("{}: {}", f(), inner))
            }
            other => GuardError::Configuration(format!("{}: {}", f(), other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_names_message_is_sorted() {
        let err = ValidationError::invalid(Feature::Metric, ["views2", "likes2"]);
        assert_eq!(
            err.to_string(),
            "invalid metric(s) provided: likes2, views2"
        );
        assert_eq!(err.feature(), Some(Feature::Metric));
    }

    #[test]
    fn test_deprecated_names_message() {
        let err = ValidationError::invalid_dimensions(["weekday", "7DayTotals"], ["7DayTotals"]);
        assert_eq!(
            err.to_string(),
            "invalid dimension(s) provided: 7DayTotals, weekday (7DayTotals deprecated)"
        );

        let err = ValidationError::invalid_dimensions(["weekday"], Vec::<String>::new());
        assert_eq!(err.to_string(), "invalid dimension(s) provided: weekday");
    }

    #[test]
    fn test_multiplicity_message() {
        let err = ValidationError::multiplicity(
            Feature::Filter,
            Expectation::ZeroOrOne,
            2,
            ["video", "group"],
        );
        assert_eq!(
            err.to_string(),
            "expected 0 or 1 filter(s) from group, video, got 2"
        );
    }

    #[test]
    fn test_sort_option_label() {
        let err = ValidationError::unsupported(Feature::SortOption, ["likes"]);
        assert_eq!(
            err.to_string(),
            "unsupported sort option(s) for selected report type: likes"
        );
    }

    #[test]
    fn test_start_index_message() {
        let err = ValidationError::StartIndexTooHigh {
            start_index: 20,
            max_results: 10,
            maximum: 25,
        };
        assert_eq!(
            err.to_string(),
            "the start index is too high: rows 20 to 29 exceed the maximum of 25"
        );
        assert_eq!(err.feature(), None);
    }

    #[test]
    fn test_validation_error_serializes_with_kind_tag() {
        let err = ValidationError::ExcessiveResultCount {
            requested: 100,
            maximum: 25,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "excessive_result_count");
        assert_eq!(json["requested"], 100);
        assert_eq!(json["maximum"], 25);
    }

    #[test]
    fn test_guard_error_wraps_validation() {
        let err: GuardError = ValidationError::MissingMetrics.into();
        assert_eq!(
            err.to_string(),
            "Invalid request: expected at least 1 metric, got 0"
        );
        assert_eq!(err.as_validation(), Some(&ValidationError::MissingMetrics));
    }

    #[test]
    fn test_error_context() {
        fn failing_read() -> std::result::Result<(), std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        }

        let err = failing_read().context("reading vocabulary").unwrap_err();
        assert!(matches!(err, GuardError::Configuration(_)));
        assert!(err.to_string().contains("reading vocabulary"));
    }
}
