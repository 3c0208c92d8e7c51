//! The query object client code builds from user arguments.
//!
//! [`ReportQuery`] owns everything a report request carries, including the
//! date range and currency the engine itself never looks at. Calling
//! [`ReportQuery::validate`] resolves the report type, fills in defaults and
//! gates the request, returning a [`ValidatedQuery`] ready for transport.

use crate::catalog::ReportTypeId;
use crate::core::{strip_descending, ReportType, ValidationRequest};
use crate::error::{GuardError, Result};
use crate::log_debug;
use crate::logging::LogConfig;
use crate::resolver;
use crate::vocabulary::Vocabulary;
use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{instrument, warn};

/// Days covered by the default date range.
pub const DEFAULT_RANGE_DAYS: u64 = 28;

/// Currency used for revenue metrics when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// A report request as built by client code.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    dimensions: BTreeSet<String>,
    filters: BTreeMap<String, String>,
    metrics: Vec<String>,
    sort_options: Vec<String>,
    max_results: u32,
    start_index: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    currency: String,
    include_historical_data: bool,
    log_config: LogConfig,
}

impl ReportQuery {
    /// Starts a query. Every field is optional.
    pub fn builder() -> ReportQueryBuilder {
        ReportQueryBuilder::default()
    }

    /// Requested dimensions.
    pub fn dimensions(&self) -> &BTreeSet<String> {
        &self.dimensions
    }

    /// Requested filters, keyed by filter name.
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Requested metrics, in request order. Empty means every metric.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Requested sort options, `-` prefix included.
    pub fn sort_options(&self) -> &[String] {
        &self.sort_options
    }

    /// First day of the report, as given or defaulted.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the report, as given or defaulted.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// ISO 4217 currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Resolves the report type without validating.
    pub fn report_type(&self) -> &'static ReportType {
        resolver::determine(&self.dimensions, &self.filters)
    }

    /// Checks the query and resolves it against the catalog.
    ///
    /// Argument errors are reported as [`GuardError::InvalidQuery`];
    /// rejections by the report type as [`GuardError::Validation`].
    #[instrument(skip_all, fields(dimensions = ?self.dimensions, metrics = self.metrics.len()))]
    pub fn validate(&self, vocab: &Vocabulary) -> Result<ValidatedQuery> {
        log_debug!(self.log_config, "Validating query");

        if self.end_date < self.start_date {
            return Err(GuardError::InvalidQuery(format!(
                "the start date should be earlier than the end date ({} > {})",
                self.start_date, self.end_date
            )));
        }

        let (start_date, end_date) = if self.dimensions.contains("month")
            && (self.start_date.day() != 1 || self.end_date.day() != 1)
        {
            let corrected = (first_of_month(self.start_date), first_of_month(self.end_date));
            warn!(
                start_date = %corrected.0,
                end_date = %corrected.1,
                "Correcting start and end dates: with 'month' as a dimension both \
                 should be the first day of a month"
            );
            corrected
        } else {
            (self.start_date, self.end_date)
        };
        log_debug!(self.log_config, %start_date, %end_date, "Date range set");

        if !vocab.is_currency(&self.currency) {
            return Err(GuardError::InvalidQuery(format!(
                "expected a valid ISO 4217 currency code, got '{}'",
                self.currency
            )));
        }

        if self.start_index < 1 {
            return Err(GuardError::InvalidQuery(
                "the start index should be positive".to_string(),
            ));
        }

        let id = resolver::determine_id(&self.dimensions, &self.filters);
        let report_type = id.report_type();

        let mut metrics: Vec<String> = Vec::new();
        if self.metrics.is_empty() {
            metrics.extend(
                vocab
                    .metrics_ordered()
                    .iter()
                    .filter(|m| report_type.metrics().contains(m))
                    .cloned(),
            );
        } else {
            for metric in &self.metrics {
                if !metrics.contains(metric) {
                    metrics.push(metric.clone());
                }
            }
        }
        log_debug!(self.log_config, metrics = %metrics.join(", "), "Metrics set");

        let unmatched: BTreeSet<&str> = self
            .sort_options
            .iter()
            .map(|o| strip_descending(o))
            .filter(|o| !metrics.iter().any(|m| m.as_str() == *o))
            .collect();
        if !unmatched.is_empty() {
            return Err(GuardError::InvalidQuery(format!(
                "sort options must also be requested as metrics: {}",
                unmatched.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let request = ValidationRequest {
            dimensions: self.dimensions.clone(),
            filters: self.filters.clone(),
            metrics: metrics.iter().cloned().collect(),
            sort_options: self.sort_options.clone(),
            max_results: Some(self.max_results).filter(|&n| n > 0),
            start_index: self.start_index,
        };
        report_type.validate_with(&request, vocab, &self.log_config)?;

        log_debug!(self.log_config, report_type = id.name(), "Query OK");
        Ok(ValidatedQuery {
            report_type: id,
            dimensions: self.dimensions.clone(),
            filters: self.filters.clone(),
            metrics,
            sort_options: self.sort_options.clone(),
            max_results: request.max_results,
            start_index: self.start_index,
            start_date,
            end_date,
            currency: self.currency.clone(),
            include_historical_data: self.include_historical_data,
        })
    }
}

/// Builder for [`ReportQuery`].
///
/// # Examples
///
/// ```rust
/// use report_guard::query::ReportQuery;
/// use report_guard::vocabulary::Vocabulary;
/// use chrono::NaiveDate;
///
/// let query = ReportQuery::builder()
///     .dimensions(["day"])
///     .filter("country", "US")
///     .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
///     .build();
///
/// let validated = query.validate(Vocabulary::builtin().unwrap()).unwrap();
/// assert_eq!(validated.name(), "Time-based activity");
/// assert_eq!(validated.metrics().first().map(String::as_str), Some("views"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportQueryBuilder {
    dimensions: BTreeSet<String>,
    filters: BTreeMap<String, String>,
    metrics: Vec<String>,
    sort_options: Vec<String>,
    max_results: u32,
    start_index: Option<u32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    currency: Option<String>,
    include_historical_data: bool,
    log_config: LogConfig,
}

impl ReportQueryBuilder {
    /// Adds dimensions.
    pub fn dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets one filter, replacing any earlier value for `key`.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Sets several filters.
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

    /// Metrics to request; every metric of the report type when left empty.
    pub fn metrics<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds sort options. Prefix a metric with `-` to sort descending.
    pub fn sort_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Zero leaves the row count unset.
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// One-based index of the first row. Defaults to 1.
    pub fn start_index(mut self, start_index: u32) -> Self {
        self.start_index = Some(start_index);
        self
    }

    /// Defaults to 28 days before the end date.
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Defaults to today in UTC.
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Defaults to [`DEFAULT_CURRENCY`].
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    /// Asks for data from before the channel was linked to its owner.
    pub fn include_historical_data(mut self, include: bool) -> Self {
        self.include_historical_data = include;
        self
    }

    /// Logging detail used while the query is validated.
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Applies the defaults. Nothing is checked until [`ReportQuery::validate`].
    pub fn build(self) -> ReportQuery {
        let end_date = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let start_date = self.start_date.unwrap_or_else(|| {
            end_date
                .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS))
                .unwrap_or(end_date)
        });
        ReportQuery {
            dimensions: self.dimensions,
            filters: self.filters,
            metrics: self.metrics,
            sort_options: self.sort_options,
            max_results: self.max_results,
            start_index: self.start_index.unwrap_or(1),
            start_date,
            end_date,
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            include_historical_data: self.include_historical_data,
            log_config: self.log_config,
        }
    }
}

/// A query that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedQuery {
    report_type: ReportTypeId,
    dimensions: BTreeSet<String>,
    filters: BTreeMap<String, String>,
    metrics: Vec<String>,
    sort_options: Vec<String>,
    max_results: Option<u32>,
    start_index: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    currency: String,
    include_historical_data: bool,
}

impl ValidatedQuery {
    /// The catalog entry the query resolved to.
    pub fn report_type_id(&self) -> ReportTypeId {
        self.report_type
    }

    /// The descriptor the query was checked against.
    pub fn report_type(&self) -> &'static ReportType {
        self.report_type.report_type()
    }

    /// The identifier the API knows the report type by.
    pub fn name(&self) -> &'static str {
        self.report_type.name()
    }

    pub fn dimensions(&self) -> &BTreeSet<String> {
        &self.dimensions
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// The effective metrics, defaults applied.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn sort_options(&self) -> &[String] {
        &self.sort_options
    }

    /// Row count, `None` when the query left it unset.
    pub fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    /// The effective start date, after any month correction.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn include_historical_data(&self) -> bool {
        self.include_historical_data
    }
}
