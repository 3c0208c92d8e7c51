//! The validation engine.
//!
//! ## Overview
//!
//! - **[`Constraint`]**: a [`Multiplicity`] rule over a fixed set of names
//! - **[`Dimensions`]**, **[`Filters`]**: aggregates of constraints
//! - **[`Metrics`]**, **[`SortOptions`]**: flat allowed sets
//! - **[`ReportType`]**: one of each, plus the detailed-report rules
//! - **[`ValidationRequest`]**: what a caller asks for
//!
//! ## Architecture
//!
//! ```text
//! ReportType (Basic | Detailed(ResultLimit), Option<CrossFieldRule>)
//!     ├── Dimensions
//!     │   ├── Constraint (Required)
//!     │   └── Constraint (ZeroOrMore)
//!     ├── Filters
//!     │   └── Constraint (ZeroOrOne)
//!     ├── Metrics
//!     └── SortOptions
//! ```
//!
//! ## Example
//!
//! ```rust
//! use report_guard::core::{Constraint, ReportType, ValidationRequest};
//! use report_guard::vocabulary::Vocabulary;
//!
//! let vocab = Vocabulary::builtin().unwrap();
//! let report = ReportType::builder("Time-based activity")
//!     .dimensions([Constraint::exactly_one(["day", "month"])])
//!     .filters([Constraint::zero_or_one(["video", "group"])])
//!     .metrics(["views", "likes"])
//!     .build();
//!
//! let request = ValidationRequest::new()
//!     .dimensions(["day", "month"])
//!     .metrics(["views"]);
//! let err = report.validate(&request, vocab).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "expected 1 dimension(s) from day, month, got 2"
//! );
//! ```

mod constraint;
mod features;
mod report_type;
mod request;

pub use constraint::{split_locked, Constraint, Multiplicity, LOCKED_VALUE_SEPARATOR};
pub use features::{strip_descending, Dimensions, Filters, Metrics, SortOptions, DESCENDING_MARKER};
pub use report_type::{CrossFieldRule, ReportKind, ReportType, ReportTypeBuilder, ResultLimit};
pub use request::ValidationRequest;
