//! Per-feature validators composed into every report type.
//!
//! [`Dimensions`] and [`Filters`] aggregate [`Constraint`]s; [`Metrics`] and
//! [`SortOptions`] wrap a flat allowed set. Each `validate` checks the
//! request against the global [`Vocabulary`] first, then against what this
//! report type allows, and returns the first failure.

use super::constraint::{split_locked, Constraint};
use crate::error::{Feature, ValidationError};
use crate::vocabulary::Vocabulary;
use std::collections::{BTreeMap, BTreeSet};

/// Prefix that marks a sort option as descending.
pub const DESCENDING_MARKER: char = '-';

/// Strips the descending marker from a sort option, if present.
pub fn strip_descending(option: &str) -> &str {
    option.strip_prefix(DESCENDING_MARKER).unwrap_or(option)
}

fn same_constraints(a: &[Constraint], b: &[Constraint]) -> bool {
    a.len() == b.len() && a.iter().all(|c| b.contains(c))
}

fn union_of(constraints: &[Constraint]) -> BTreeSet<&str> {
    constraints
        .iter()
        .flat_map(|c| c.values().iter().map(String::as_str))
        .collect()
}

/// The dimensions a report type accepts.
#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    constraints: Vec<Constraint>,
}

impl PartialEq for Dimensions {
    fn eq(&self, other: &Self) -> bool {
        same_constraints(&self.constraints, &other.constraints)
    }
}

impl Eq for Dimensions {}

impl Dimensions {
    /// Groups dimension constraints for one report type.
    pub fn new(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            constraints: constraints.into_iter().collect(),
        }
    }

    /// A report type that takes no dimensions at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// The constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Every dimension any contained constraint allows.
    pub fn every(&self) -> BTreeSet<&str> {
        union_of(&self.constraints)
    }

    /// Checks requested dimensions against the vocabulary, then against
    /// these constraints.
    ///
    /// Unknown names are reported before unsupported ones. Retired names are
    /// reported as invalid and listed again in the `deprecated` field of
    /// [`ValidationError::InvalidNames`].
    pub fn validate(
        &self,
        inputs: &BTreeSet<String>,
        vocab: &Vocabulary,
    ) -> Result<(), ValidationError> {
        let unknown: Vec<&String> = inputs.iter().filter(|d| !vocab.is_dimension(d)).collect();
        if !unknown.is_empty() {
            let retired: Vec<&String> = unknown
                .iter()
                .copied()
                .filter(|d| vocab.is_deprecated_dimension(d))
                .collect();
            return Err(ValidationError::invalid_dimensions(
                unknown.into_iter().cloned(),
                retired.into_iter().cloned(),
            ));
        }

        let every = self.every();
        let unsupported: Vec<&String> = inputs
            .iter()
            .filter(|d| !every.contains(d.as_str()))
            .collect();
        if !unsupported.is_empty() {
            return Err(ValidationError::unsupported(
                Feature::Dimension,
                unsupported.into_iter().cloned(),
            ));
        }

        for constraint in &self.constraints {
            constraint.validate_dimensions(inputs)?;
        }
        Ok(())
    }
}

/// The filters a report type accepts.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    constraints: Vec<Constraint>,
}

impl PartialEq for Filters {
    fn eq(&self, other: &Self) -> bool {
        same_constraints(&self.constraints, &other.constraints)
    }
}

impl Eq for Filters {}

impl Filters {
    /// Groups filter constraints for one report type.
    pub fn new(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            constraints: constraints.into_iter().collect(),
        }
    }

    /// The constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Every declared entry, locked values included.
    pub fn every(&self) -> BTreeSet<&str> {
        union_of(&self.constraints)
    }

    /// Every allowed filter key, with locked values stripped.
    pub fn every_key(&self) -> BTreeSet<&str> {
        self.every().into_iter().map(|v| split_locked(v).0).collect()
    }

    /// The keys this report type pins to a single value.
    pub fn locked(&self) -> BTreeMap<&str, &str> {
        self.constraints.iter().flat_map(Constraint::locked).collect()
    }

    /// Checks filter keys, then filter values, then these constraints.
    pub fn validate(
        &self,
        inputs: &BTreeMap<String, String>,
        vocab: &Vocabulary,
    ) -> Result<(), ValidationError> {
        let unknown: Vec<&String> = inputs.keys().filter(|k| !vocab.is_filter(k)).collect();
        if !unknown.is_empty() {
            return Err(ValidationError::invalid(
                Feature::Filter,
                unknown.into_iter().cloned(),
            ));
        }

        // A locked key reports the lock, not the generic value table.
        let locked = self.locked();
        for (key, value) in inputs {
            if let Some(expected) = locked.get(key.as_str()) {
                if value != expected {
                    return Err(ValidationError::LockedValueMismatch {
                        key: key.clone(),
                        expected: expected.to_string(),
                        actual: value.clone(),
                    });
                }
            }
            if !vocab.accepts_filter_value(key, value) {
                return Err(ValidationError::InvalidFilterValue {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }

        let every_key = self.every_key();
        let unsupported: Vec<&String> = inputs
            .keys()
            .filter(|k| !every_key.contains(k.as_str()))
            .collect();
        if !unsupported.is_empty() {
            return Err(ValidationError::unsupported(
                Feature::Filter,
                unsupported.into_iter().cloned(),
            ));
        }

        for constraint in &self.constraints {
            constraint.validate_filters(inputs)?;
        }
        Ok(())
    }
}

/// The metrics a report type serves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    values: BTreeSet<String>,
}

impl Metrics {
    /// Creates the metric set from the given names.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The supported metric names.
    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// Returns true if `metric` is served by this report type.
    pub fn contains(&self, metric: &str) -> bool {
        self.values.contains(metric)
    }

    /// Checks that metrics were requested, that they are known and that
    /// this report type serves them.
    pub fn validate(
        &self,
        inputs: &BTreeSet<String>,
        vocab: &Vocabulary,
    ) -> Result<(), ValidationError> {
        if inputs.is_empty() {
            return Err(ValidationError::MissingMetrics);
        }

        let unknown: Vec<&String> = inputs.iter().filter(|m| !vocab.is_metric(m)).collect();
        if !unknown.is_empty() {
            return Err(ValidationError::invalid(
                Feature::Metric,
                unknown.into_iter().cloned(),
            ));
        }

        let unsupported: Vec<&String> = inputs.difference(&self.values).collect();
        if !unsupported.is_empty() {
            return Err(ValidationError::unsupported(
                Feature::Metric,
                unsupported.into_iter().cloned(),
            ));
        }
        Ok(())
    }
}

/// The sort options a report type accepts.
///
/// # Examples
///
/// ```rust
/// use report_guard::core::SortOptions;
/// use report_guard::vocabulary::Vocabulary;
///
/// let vocab = Vocabulary::builtin().unwrap();
/// let sort = SortOptions::descending_only(["views"]);
/// assert!(sort.validate(&["-views".to_string()], vocab).is_ok());
/// assert!(sort.validate(&["views".to_string()], vocab).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    values: BTreeSet<String>,
    descending_only: bool,
}

impl SortOptions {
    /// Sort options usable in either direction.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            descending_only: false,
        }
    }

    /// Sort options that must all carry the descending marker.
    pub fn descending_only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            descending_only: true,
            ..Self::new(values)
        }
    }

    /// The sortable metric names, without direction markers.
    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// Returns true if ascending sorts are rejected.
    pub fn is_descending_only(&self) -> bool {
        self.descending_only
    }

    /// Checks requested sort options, each optionally prefixed with `-`.
    pub fn validate(&self, inputs: &[String], vocab: &Vocabulary) -> Result<(), ValidationError> {
        let raw: BTreeSet<&str> = inputs.iter().map(|o| strip_descending(o)).collect();

        let unknown: Vec<&str> = raw.iter().copied().filter(|o| !vocab.is_metric(o)).collect();
        if !unknown.is_empty() {
            return Err(ValidationError::invalid(Feature::SortOption, unknown));
        }

        let unsupported: Vec<&str> = raw
            .iter()
            .copied()
            .filter(|o| !self.values.contains(*o))
            .collect();
        if !unsupported.is_empty() {
            return Err(ValidationError::unsupported(
                Feature::SortOption,
                unsupported,
            ));
        }

        if self.descending_only {
            let ascending: Vec<&String> = inputs
                .iter()
                .filter(|o| !o.starts_with(DESCENDING_MARKER))
                .collect();
            if !ascending.is_empty() {
                return Err(ValidationError::DescendingOnly {
                    names: ascending.into_iter().cloned().collect(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> &'static Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dimensions_every_is_union() {
        let dims = Dimensions::new([
            Constraint::exactly_one(["day", "month"]),
            Constraint::optional(["creatorContentType"]),
        ]);
        let every: Vec<&str> = dims.every().into_iter().collect();
        assert_eq!(every, vec!["creatorContentType", "day", "month"]);
    }

    #[test]
    fn test_dimensions_structural_equality_ignores_order() {
        let a = Dimensions::new([
            Constraint::required(["country"]),
            Constraint::optional(["creatorContentType"]),
        ]);
        let b = Dimensions::new([
            Constraint::optional(["creatorContentType"]),
            Constraint::required(["country"]),
        ]);
        assert_eq!(a, b);
        assert_ne!(a, Dimensions::none());
    }

    #[test]
    fn test_dimensions_invalid_before_unsupported() {
        let dims = Dimensions::new([Constraint::exactly_one(["day", "month"])]);
        let err = dims.validate(&set(&["day", "bogus"]), vocab()).unwrap_err();
        assert_eq!(err, ValidationError::invalid(Feature::Dimension, ["bogus"]));

        let err = dims.validate(&set(&["day", "country"]), vocab()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::unsupported(Feature::Dimension, ["country"])
        );
    }

    #[test]
    fn test_dimensions_flags_deprecated() {
        let dims = Dimensions::new([Constraint::exactly_one(["day", "month"])]);
        let err = dims.validate(&set(&["30DayTotals"]), vocab()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNames {
                feature: Feature::Dimension,
                names: vec!["30DayTotals".to_string()],
                deprecated: vec!["30DayTotals".to_string()],
            }
        );

        // Retired names stay flagged when mixed with names that never existed.
        let err = dims
            .validate(&set(&["7DayTotals", "weekday", "day"]), vocab())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNames {
                feature: Feature::Dimension,
                names: vec!["7DayTotals".to_string(), "weekday".to_string()],
                deprecated: vec!["7DayTotals".to_string()],
            }
        );
    }

    #[test]
    fn test_dimensions_delegates_to_constraints() {
        let dims = Dimensions::new([Constraint::exactly_one(["day", "month"])]);
        assert!(dims.validate(&set(&["month"]), vocab()).is_ok());
        assert!(matches!(
            dims.validate(&set(&[]), vocab()),
            Err(ValidationError::Multiplicity { .. })
        ));
    }

    #[test]
    fn test_filters_every_key_and_locked() {
        let filters = Filters::new([
            Constraint::required(["isCurated==1", "country==US"]),
            Constraint::zero_or_one(["playlist", "group"]),
        ]);
        let keys: Vec<&str> = filters.every_key().into_iter().collect();
        assert_eq!(keys, vec!["country", "group", "isCurated", "playlist"]);
        assert_eq!(filters.locked().get("country"), Some(&"US"));
    }

    #[test]
    fn test_filters_locked_value_wins_over_value_table() {
        let filters = Filters::new([Constraint::required(["country==US"])]);
        assert!(filters.validate(&map(&[("country", "US")]), vocab()).is_ok());

        let err = filters
            .validate(&map(&[("country", "GB")]), vocab())
            .unwrap_err();
        assert!(matches!(err, ValidationError::LockedValueMismatch { .. }));

        // Not even a valid country, still reported as the lock.
        let err = filters
            .validate(&map(&[("country", "ZZ")]), vocab())
            .unwrap_err();
        assert!(matches!(err, ValidationError::LockedValueMismatch { .. }));
    }

    #[test]
    fn test_filters_invalid_value() {
        let filters = Filters::new([Constraint::zero_or_one(["country", "continent"])]);
        let err = filters
            .validate(&map(&[("continent", "999")]), vocab())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidFilterValue {
                key: "continent".to_string(),
                value: "999".to_string(),
            }
        );
    }

    #[test]
    fn test_filters_unknown_and_unsupported_keys() {
        let filters = Filters::new([Constraint::zero_or_one(["video", "group"])]);
        assert!(matches!(
            filters.validate(&map(&[("nope", "x")]), vocab()),
            Err(ValidationError::InvalidNames {
                feature: Feature::Filter,
                ..
            })
        ));
        assert_eq!(
            filters
                .validate(&map(&[("country", "US")]), vocab())
                .unwrap_err(),
            ValidationError::unsupported(Feature::Filter, ["country"])
        );
    }

    #[test]
    fn test_metrics_three_tiers() {
        let metrics = Metrics::new(["views", "likes"]);
        assert_eq!(
            metrics.validate(&set(&[]), vocab()),
            Err(ValidationError::MissingMetrics)
        );
        assert_eq!(
            metrics.validate(&set(&["views", "viewz"]), vocab()),
            Err(ValidationError::invalid(Feature::Metric, ["viewz"]))
        );
        assert_eq!(
            metrics.validate(&set(&["views", "shares"]), vocab()),
            Err(ValidationError::unsupported(Feature::Metric, ["shares"]))
        );
        assert!(metrics.validate(&set(&["views", "likes"]), vocab()).is_ok());
    }

    #[test]
    fn test_sort_options_strip_marker() {
        let sort = SortOptions::new(["views", "likes"]);
        assert!(sort.validate(&strings(&["-views", "likes"]), vocab()).is_ok());
        assert_eq!(
            sort.validate(&strings(&["-shares"]), vocab()),
            Err(ValidationError::unsupported(Feature::SortOption, ["shares"]))
        );
        assert_eq!(
            sort.validate(&strings(&["-sharez"]), vocab()),
            Err(ValidationError::invalid(Feature::SortOption, ["sharez"]))
        );
    }

    #[test]
    fn test_sort_options_descending_only() {
        let sort = SortOptions::descending_only(["views"]);
        assert!(sort.validate(&strings(&["-views"]), vocab()).is_ok());
        assert_eq!(
            sort.validate(&strings(&["views"]), vocab()),
            Err(ValidationError::DescendingOnly {
                names: strings(&["views"])
            })
        );
        assert!(sort.validate(&[], vocab()).is_ok());
    }
}
