//! Report type descriptors and their validation.
//!
//! A [`ReportType`] is an immutable combination of the four feature
//! validators. Detailed report types additionally carry a [`ResultLimit`]
//! and require sort options; a few carry a [`CrossFieldRule`] that no
//! combination of constraints can express.

use super::constraint::Constraint;
use super::features::{Dimensions, Filters, Metrics, SortOptions};
use super::request::ValidationRequest;
use crate::error::ValidationError;
use crate::{log_constraint, log_debug};
use crate::logging::{truncate_field, LogConfig};
use crate::vocabulary::Vocabulary;
use once_cell::sync::Lazy;
use tracing::{instrument, warn};

/// Filters applied to by-city requests that break down by province.
static US_CITY_FILTERS: Lazy<Filters> = Lazy::new(|| {
    Filters::new([
        Constraint::required(["country==US"]),
        Constraint::zero_or_one(["video", "group"]),
    ])
});

/// Row ceiling of a detailed report type.
///
/// `enforced` is what requests are checked against. `documented` is what the
/// API reference advertises; when it is higher, requests between the two are
/// still rejected but log a warning first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimit {
    pub enforced: u32,
    pub documented: u32,
}

impl ResultLimit {
    /// A limit the API both documents and enforces.
    pub const fn new(maximum: u32) -> Self {
        Self {
            enforced: maximum,
            documented: maximum,
        }
    }

    /// Records a higher documented limit than the one enforced.
    pub const fn with_documented(mut self, documented: u32) -> Self {
        self.documented = documented;
        self
    }

    /// Returns true if `requested` is rejected but within the documented limit.
    pub fn is_undocumented_rejection(&self, requested: u32) -> bool {
        requested > self.enforced && requested <= self.documented
    }
}

/// Whether a report type carries the detailed-report rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Basic,
    Detailed(ResultLimit),
}

impl ReportKind {
    /// The result ceiling, for detailed report types only.
    pub fn limit(&self) -> Option<ResultLimit> {
        match self {
            ReportKind::Basic => None,
            ReportKind::Detailed(limit) => Some(*limit),
        }
    }
}

/// Rules spanning more than one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// A `province` dimension swaps in US-locked filters.
    CityProvinceFilters,
    /// The `insightTrafficSourceType` filter must name a type that has details.
    TrafficSourceDetailType,
    /// The `video` filter must name exactly one video.
    SingleVideo,
}

/// A named, fixed combination of dimensions, filters, metrics and sort options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportType {
    name: &'static str,
    dimensions: Dimensions,
    filters: Filters,
    metrics: Metrics,
    sort_options: SortOptions,
    kind: ReportKind,
    rule: Option<CrossFieldRule>,
}

impl ReportType {
    /// Starts describing a report type with the given API name.
    pub fn builder(name: &'static str) -> ReportTypeBuilder {
        ReportTypeBuilder::new(name)
    }

    /// The API identifier of this report type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Dimension constraints.
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Filter constraints as declared, before any cross-field rule applies.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Supported metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Sortable metrics. Defaults to the supported metrics.
    pub fn sort_options(&self) -> &SortOptions {
        &self.sort_options
    }

    /// Whether the detailed-report rules apply.
    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Shorthand for a [`ReportKind::Detailed`] kind.
    pub fn is_detailed(&self) -> bool {
        matches!(self.kind, ReportKind::Detailed(_))
    }

    /// The cross-field rule checked after every feature, if any.
    pub fn rule(&self) -> Option<CrossFieldRule> {
        self.rule
    }

    /// The filter set a request is checked against.
    ///
    /// This is the declared set except where a cross-field rule picks another
    /// one for this request. The descriptor itself is never modified.
    pub fn filters_for(&self, request: &ValidationRequest) -> &Filters {
        match self.rule {
            Some(CrossFieldRule::CityProvinceFilters) if request.has_dimension("province") => {
                &US_CITY_FILTERS
            }
            _ => &self.filters,
        }
    }

    /// Validates a request, returning the first failure.
    pub fn validate(
        &self,
        request: &ValidationRequest,
        vocab: &Vocabulary,
    ) -> Result<(), ValidationError> {
        self.validate_with(request, vocab, &LogConfig::default())
    }

    /// Validates a request with explicit logging settings.
    #[instrument(skip_all, fields(report_type = self.name))]
    pub fn validate_with(
        &self,
        request: &ValidationRequest,
        vocab: &Vocabulary,
        config: &LogConfig,
    ) -> Result<(), ValidationError> {
        if let (Some(limit), Some(requested)) = (self.kind.limit(), request.requested_results()) {
            if limit.is_undocumented_rejection(requested) {
                warn!(
                    report_type = self.name,
                    requested,
                    enforced = limit.enforced,
                    documented = limit.documented,
                    "The API documents a maximum of {} results for this report type, \
                     but only accepts {}",
                    limit.documented,
                    limit.enforced
                );
            }
        }

        log_constraint!(
            config,
            dimensions = %truncate_field(&format!("{:?}", request.dimensions), config.max_field_length),
            "Checking dimensions"
        );
        self.dimensions.validate(&request.dimensions, vocab)?;

        log_constraint!(
            config,
            filters = %truncate_field(&format!("{:?}", request.filters), config.max_field_length),
            "Checking filters"
        );
        self.filters_for(request).validate(&request.filters, vocab)?;

        log_constraint!(
            config,
            metrics = %truncate_field(&format!("{:?}", request.metrics), config.max_field_length),
            "Checking metrics"
        );
        self.metrics.validate(&request.metrics, vocab)?;
        self.sort_options.validate(&request.sort_options, vocab)?;

        if let ReportKind::Detailed(limit) = self.kind {
            validate_paging(limit, request)?;
        }

        if let Some(rule) = self.rule {
            apply_rule(rule, request, vocab)?;
        }

        log_debug!(config, report_type = self.name, "Request is valid");
        Ok(())
    }
}

fn validate_paging(limit: ResultLimit, request: &ValidationRequest) -> Result<(), ValidationError> {
    let requested = request
        .requested_results()
        .ok_or(ValidationError::MissingResultCount)?;
    if requested > limit.enforced {
        return Err(ValidationError::ExcessiveResultCount {
            requested,
            maximum: limit.enforced,
        });
    }

    if u64::from(request.start_index) + u64::from(requested) > u64::from(limit.enforced) + 1 {
        return Err(ValidationError::StartIndexTooHigh {
            start_index: request.start_index,
            max_results: requested,
            maximum: limit.enforced,
        });
    }

    if request.sort_options.is_empty() {
        return Err(ValidationError::MissingSortOptions);
    }
    Ok(())
}

fn apply_rule(
    rule: CrossFieldRule,
    request: &ValidationRequest,
    vocab: &Vocabulary,
) -> Result<(), ValidationError> {
    match rule {
        // Handled when choosing the filter set.
        CrossFieldRule::CityProvinceFilters => Ok(()),
        CrossFieldRule::TrafficSourceDetailType => {
            let key = "insightTrafficSourceType";
            match request.filter_value(key) {
                Some(value)
                    if !vocab
                        .filter_values("insightTrafficSourceDetail")
                        .is_some_and(|types| types.contains(value)) =>
                {
                    Err(ValidationError::IncompatibleFilterValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                }
                _ => Ok(()),
            }
        }
        CrossFieldRule::SingleVideo => match request.filter_value("video") {
            Some(ids) if ids.contains(',') => Err(ValidationError::MultipleIds {
                filter: "video".to_string(),
                dimension: "elapsedVideoTimeRatio".to_string(),
            }),
            _ => Ok(()),
        },
    }
}

/// Builder for [`ReportType`].
///
/// Sort options default to every metric, in any direction.
///
/// # Examples
///
/// ```rust
/// use report_guard::core::{Constraint, ReportType, ResultLimit, SortOptions};
///
/// let top = ReportType::builder("Top things")
///     .dimensions([Constraint::required(["video"])])
///     .metrics(["views", "likes"])
///     .sort_options(SortOptions::descending_only(["views"]))
///     .detailed(ResultLimit::new(200))
///     .build();
///
/// assert!(top.is_detailed());
/// assert!(top.filters().constraints().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ReportTypeBuilder {
    name: &'static str,
    dimensions: Dimensions,
    filters: Filters,
    metrics: Metrics,
    sort_options: Option<SortOptions>,
    kind: ReportKind,
    rule: Option<CrossFieldRule>,
}

impl ReportTypeBuilder {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            dimensions: Dimensions::none(),
            filters: Filters::default(),
            metrics: Metrics::default(),
            sort_options: None,
            kind: ReportKind::Basic,
            rule: None,
        }
    }

    /// Sets the dimension constraints.
    pub fn dimensions(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.dimensions = Dimensions::new(constraints);
        self
    }

    /// Sets the filter constraints.
    pub fn filters(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.filters = Filters::new(constraints);
        self
    }

    /// Sets the supported metrics.
    pub fn metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = Metrics::new(metrics);
        self
    }

    /// Overrides the default sort options.
    pub fn sort_options(mut self, sort_options: SortOptions) -> Self {
        self.sort_options = Some(sort_options);
        self
    }

    /// Applies the detailed-report rules with the given result ceiling.
    pub fn detailed(mut self, limit: ResultLimit) -> Self {
        self.kind = ReportKind::Detailed(limit);
        self
    }

    /// Attaches a cross-field rule.
    pub fn rule(mut self, rule: CrossFieldRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Finishes the report type, defaulting the sort options to the
    /// supported metrics.
    pub fn build(self) -> ReportType {
        let sort_options = self
            .sort_options
            .unwrap_or_else(|| SortOptions::new(self.metrics.values().iter().cloned()));
        ReportType {
            name: self.name,
            dimensions: self.dimensions,
            filters: self.filters,
            metrics: self.metrics,
            sort_options,
            kind: self.kind,
            rule: self.rule,
        }
    }
}
