//! # report-guard - Report type resolution and validation
//!
//! The YouTube Analytics API only serves fixed combinations of dimensions,
//! filters, metrics and sort options, called report types. report-guard
//! decides which report type a request maps to and checks the request
//! against it before anything goes over the wire, producing classified
//! errors that say exactly which feature and which names were at fault.
//!
//! ## Quick Start
//!
//! ```rust
//! use report_guard::prelude::*;
//!
//! # fn main() -> report_guard::error::Result<()> {
//! let vocab = Vocabulary::builtin()?;
//!
//! let query = ReportQuery::builder()
//!     .dimensions(["video"])
//!     .metrics(["views", "likes"])
//!     .sort_options(["-views"])
//!     .max_results(10)
//!     .build();
//!
//! let validated = query.validate(vocab)?;
//! assert_eq!(validated.name(), "Top videos by region");
//!
//! // Top video reports only sort in descending order.
//! let ascending = ReportQuery::builder()
//!     .dimensions(["video"])
//!     .metrics(["views"])
//!     .sort_options(["views"])
//!     .max_results(10)
//!     .build();
//! assert!(matches!(
//!     ascending.validate(vocab),
//!     Err(GuardError::Validation(ValidationError::DescendingOnly { .. }))
//! ));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`vocabulary`**: the dimension, filter, metric and currency reference
//!   data, loaded from JSON
//! - **`core`**: constraints, feature validators and report type descriptors
//! - **`catalog`**: the fixed set of report types
//! - **`resolver`**: the ordered decision table mapping requests to report types
//! - **`query`**: the builder client code fills in and validates
//! - **`logging`**: log detail settings and optional subscriber setup
//!
//! The engine is synchronous and holds no mutable state, so every function
//! may be called from any thread.

pub mod catalog;
pub mod core;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod resolver;
pub mod vocabulary;
