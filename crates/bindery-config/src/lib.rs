//! Shared configuration for bindery.
//!
//! Configuration is layered with `ortho_config`: command-line flags override
//! `BINDERY_*` environment variables, which override a configuration file,
//! which overrides the built-in defaults.
//!
//! ```no_run
//! use bindery_config::Config;
//!
//! let config = Config::load_from_iter(["bindery", "--log-filter", "debug"])
//!     .expect("configuration loads");
//! assert_eq!(config.log_filter(), "debug");
//! ```

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
    default_strict_identifiers,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "BINDERY")]
pub struct Config {
    /// Tracing filter directives, in `RUST_LOG` syntax.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    log_filter: String,

    /// Log output format.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    log_format: LogFormat,

    /// Reject bindings that rename an existing identifier slot.
    #[ortho_config(default = default_strict_identifiers())]
    #[serde(default = "default_strict_identifiers")]
    strict_identifiers: bool,
}

impl Config {
    /// Returns the tracing filter directives.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns whether conflicting identifier names reject the later binding.
    #[must_use]
    pub const fn strict_identifiers(&self) -> bool {
        self.strict_identifiers
    }

    /// Returns a copy with the given filter directives.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Returns a copy with the given log format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Returns a copy with the given identifier conflict policy.
    #[must_use]
    pub const fn with_strict_identifiers(mut self, strict: bool) -> Self {
        self.strict_identifiers = strict;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            strict_identifiers: default_strict_identifiers(),
        }
    }
}
