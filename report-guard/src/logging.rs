//! Logging configuration for report-guard.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application, optionally through [`setup::init_logging`].

use tracing::Level;

/// Controls how much detail validation logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Base log level for report-guard components
    pub base_level: Level,
    /// Whether to log each feature check with the requested names
    pub log_constraint_details: bool,
    /// Maximum length for logged field values
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_constraint_details: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Logs every feature check.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_constraint_details: true,
            max_field_length: 1024,
        }
    }

    /// Warnings only.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_constraint_details: false,
            max_field_length: 128,
        }
    }

    /// Returns true when `base_level` lets debug events through.
    pub fn debug_enabled(&self) -> bool {
        self.base_level >= Level::DEBUG
    }
}

/// Macro for debug events gated on [`LogConfig::base_level`].
#[macro_export]
macro_rules! log_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional constraint logging.
#[macro_export]
macro_rules! log_constraint {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_constraint_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates a string to at most `max_length` characters.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    match value.char_indices().nth(max_length) {
        None => value.to_string(),
        Some((end, _)) => format!("{}...(truncated)", &value[..end]),
    }
}

/// Subscriber installation for applications embedding report-guard.
pub mod setup {
    use crate::error::{GuardError, Result};
    use tracing::Level;

    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for everything else
        pub level: Level,
        /// Log level for report-guard specifically
        pub crate_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                crate_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// JSON output, warnings and city-limit advisories only.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                crate_level: Level::WARN,
                json_format: true,
                env_filter: None,
            }
        }

        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                crate_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn with_crate_level(mut self, level: Level) -> Self {
            self.crate_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter directive.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},report_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.crate_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global subscriber. `RUST_LOG` takes precedence over the
    /// configured directive.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use report_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.env_filter()))
            .map_err(|e| GuardError::Configuration(format!("invalid log filter: {e}")))?;

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| GuardError::Configuration(format!("logging already initialized: {e}")))
    }
}
