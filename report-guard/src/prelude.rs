//! Prelude for commonly used types in report-guard.

pub use crate::catalog::ReportTypeId;
pub use crate::core::{ReportType, ValidationRequest};
pub use crate::error::{ErrorContext, GuardError, Result, ValidationError};
pub use crate::logging::LogConfig;
pub use crate::query::{ReportQuery, ValidatedQuery};
pub use crate::vocabulary::Vocabulary;
