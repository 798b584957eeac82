//! Tracing output for tree construction, resolution and dispatch.
//!
//! A configured filter that is only a level, such as `debug`, is applied to
//! bindery's own targets while every other target stays at `warn`. Any other
//! filter is passed to [`EnvFilter`] unchanged.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt::{self, time::UtcTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use bindery_config::{Config, LogFormat};
use bindery_core::{BUILD_TARGET, RESOLVE_TARGET};

use crate::dispatcher::DISPATCH_TARGET;

/// Every target bindery emits events under.
pub const TARGETS: [&str; 3] = [BUILD_TARGET, RESOLVE_TARGET, DISPATCH_TARGET];

/// Level kept for other crates when the filter is a bare level.
const FOREIGN_LEVEL: &str = "warn";

static INSTALLED: OnceCell<String> = OnceCell::new();

/// Proof that the global subscriber is installed.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryHandle {
    directives: &'static str,
}

impl TelemetryHandle {
    /// Returns the filter directives the subscriber was installed with.
    #[must_use]
    pub const fn directives(&self) -> &'static str {
        self.directives
    }
}

/// Errors encountered while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directives do not parse.
    #[error("invalid log filter '{directives}': {message}")]
    Filter {
        /// Directives after bare levels were scoped.
        directives: String,
        /// Parser message.
        message: String,
    },
    /// Another subscriber was installed outside [`initialise`].
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Expands `filter` into [`EnvFilter`] directives.
///
/// # Examples
///
/// ```
/// use bindery::telemetry::directives;
///
/// assert_eq!(
///     directives("debug"),
///     "warn,bindery_core::build=debug,bindery_core::resolve=debug,bindery::dispatch=debug",
/// );
/// assert_eq!(directives("bindery::dispatch=trace"), "bindery::dispatch=trace");
/// assert_eq!(directives("off"), "off");
/// ```
#[must_use]
pub fn directives(filter: &str) -> String {
    let trimmed = filter.trim();
    trimmed
        .parse::<LevelFilter>()
        .map_or_else(|_| trimmed.to_owned(), |level| scoped(level, trimmed))
}

fn scoped(level: LevelFilter, text: &str) -> String {
    if level == LevelFilter::OFF {
        return text.to_ascii_lowercase();
    }
    let level_text = text.to_ascii_lowercase();
    let mut parts = vec![FOREIGN_LEVEL.to_owned()];
    parts.extend(TARGETS.iter().map(|target| format!("{target}={level_text}")));
    parts.join(",")
}

/// Installs the global subscriber on first use.
///
/// Later calls return the handle of the first installation, even when
/// `config` differs.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the directives do not parse and
/// [`TelemetryError::Subscriber`] when a subscriber was already installed
/// elsewhere.
///
/// # Examples
///
/// ```rust
/// use bindery::{Config, telemetry};
///
/// # fn main() -> Result<(), bindery::telemetry::TelemetryError> {
/// let handle = telemetry::initialise(&Config::default())?;
/// assert!(handle.directives().contains("bindery::dispatch=info"));
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| install(config))
        .map(|installed| TelemetryHandle {
            directives: installed.as_str(),
        })
}

fn install(config: &Config) -> Result<String, TelemetryError> {
    let expanded = directives(config.log_filter());
    let filter = EnvFilter::try_new(&expanded).map_err(|error| TelemetryError::Filter {
        directives: expanded.clone(),
        message: error.to_string(),
    })?;

    let ansi = io::stderr().is_terminal();
    let (json, compact) = match config.log_format() {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(UtcTime::rfc_3339())
                    .json()
                    .flatten_event(true),
            ),
            None,
        ),
        LogFormat::Compact => (
            None,
            Some(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(UtcTime::rfc_3339())
                    .compact(),
            ),
        ),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact);
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;
    debug!(
        target: DISPATCH_TARGET,
        directives = %expanded,
        format = %config.log_format(),
        "telemetry installed"
    );
    Ok(expanded)
}
