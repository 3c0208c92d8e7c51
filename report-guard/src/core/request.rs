//! The request shape every report type validates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

fn default_start_index() -> u32 {
    1
}

/// A requested report: dimension and metric names, filter key/value pairs,
/// sort options with an optional descending marker, and paging.
///
/// # Examples
///
/// ```rust
/// use report_guard::core::ValidationRequest;
///
/// let request = ValidationRequest::new()
///     .dimensions(["day"])
///     .filter("country", "US")
///     .metrics(["views", "likes"])
///     .sort_options(["-views"])
///     .max_results(10);
///
/// assert!(request.has_dimension("day"));
/// assert_eq!(request.filter_value("country"), Some("US"));
/// assert_eq!(request.start_index, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    #[serde(default)]
    pub dimensions: BTreeSet<String>,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub metrics: BTreeSet<String>,
    #[serde(default)]
    pub sort_options: Vec<String>,
    /// Zero and `None` both mean "not set".
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default = "default_start_index")]
    pub start_index: u32,
}

impl Default for ValidationRequest {
    fn default() -> Self {
        Self {
            dimensions: BTreeSet::new(),
            filters: BTreeMap::new(),
            metrics: BTreeSet::new(),
            sort_options: Vec::new(),
            max_results: None,
            start_index: default_start_index(),
        }
    }
}

impl ValidationRequest {
    /// An empty request starting at row 1.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn filters<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.filters
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn metrics<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn sort_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Zero is treated as unset by the detailed checks.
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.contains(name)
    }

    pub fn has_filter(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    /// The value of filter `key`, if present.
    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// The requested row count, treating zero as unset.
    pub fn requested_results(&self) -> Option<u32> {
        self.max_results.filter(|&n| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ValidationRequest::default();
        assert!(request.dimensions.is_empty());
        assert_eq!(request.max_results, None);
        assert_eq!(request.start_index, 1);
    }

    #[test]
    fn test_zero_max_results_is_unset() {
        assert_eq!(ValidationRequest::new().max_results(0).requested_results(), None);
        assert_eq!(
            ValidationRequest::new().max_results(25).requested_results(),
            Some(25)
        );
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let request: ValidationRequest =
            serde_json::from_str(r#"{"dimensions": ["day"], "metrics": ["views"]}"#).unwrap();
        assert!(request.has_dimension("day"));
        assert_eq!(request.start_index, 1);
        assert!(request.sort_options.is_empty());
    }

    #[test]
    fn test_filters_overwrite_by_key() {
        let request = ValidationRequest::new()
            .filter("country", "US")
            .filters([("country", "GB"), ("video", "abc")]);
        assert_eq!(request.filter_value("country"), Some("GB"));
        assert!(request.has_filter("video"));
    }
}
