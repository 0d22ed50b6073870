//! Logging and tracing configuration
//!
//! Centralized subscriber setup for the simulator plus the structured event
//! macros used by the guest pipeline and the driver.

use std::io;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Error returned when the global subscriber cannot be installed
pub type LoggingError = Box<dyn std::error::Error + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json_format: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

/// Keeps the non-blocking log writers flushing until dropped
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops the background log writers"]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "hotel-guest-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Some(filter) = &self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level))
        }))
    }

    /// Initialize the global tracing subscriber
    ///
    /// Console output always goes to stderr so stdout stays free for
    /// `--print-config`. With file logging enabled, a daily rolling JSON file
    /// is written as well; hold on to the returned guard until exit.
    pub fn init(self) -> Result<LoggingGuard, LoggingError> {
        let registry = Registry::default().with(self.build_filter()?);
        let mut guard = LoggingGuard::default();

        if self.log_to_file {
            let log_dir = self.log_directory.as_deref().unwrap_or("logs");
            let file_appender = rolling::daily(log_dir, &self.log_file_prefix);
            let (file_writer, file_guard) = non_blocking(file_appender);
            let (console_writer, console_guard) = non_blocking(io::stderr());
            guard._guards.push(file_guard);
            guard._guards.push(console_guard);

            let file_layer =
                fmt::layer().json().with_writer(file_writer).with_span_events(self.span_events());

            if self.json_format {
                let console_layer = fmt::layer()
                    .json()
                    .with_writer(console_writer)
                    .with_span_events(self.span_events());
                registry.with(file_layer).with(console_layer).try_init()?;
            } else {
                let console_layer = fmt::layer()
                    .with_writer(console_writer)
                    .with_ansi(self.enable_ansi)
                    .with_thread_names(true)
                    .with_span_events(self.span_events());
                registry.with(file_layer).with(console_layer).try_init()?;
            }
        } else if self.json_format {
            let layer =
                fmt::layer().json().with_writer(io::stderr).with_span_events(self.span_events());
            registry.with(layer).try_init()?;
        } else {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_thread_names(true)
                .with_span_events(self.span_events());
            registry.with(layer).try_init()?;
        }

        info!(level = %self.level, to_file = self.log_to_file, "Logging initialized");
        Ok(guard)
    }
}

/// Emit a guest stage transition event
///
/// Every event carries the guest id, the stage, and a short outcome string,
/// followed by any extra `tracing` fields.
///
/// ```rust
/// use hotel_guest_simulator::guest_event;
/// use hotel_guest_simulator::types::{GuestId, RoomCode, Stage};
///
/// let guest = GuestId::new();
/// guest_event!(info, guest, Stage::CheckingIn, "checked in", room = %RoomCode::new(1, 4));
/// guest_event!(debug, guest, Stage::Done, "entered");
/// ```
#[macro_export]
macro_rules! guest_event {
    ($level:ident, $guest:expr, $stage:expr, $outcome:literal $(, $($field:tt)+)?) => {
        tracing::$level!(
            component = "pipeline",
            guest = %$guest,
            stage = %$stage,
            $($($field)+ ,)?
            outcome = $outcome,
            $outcome
        )
    };
}

/// Macro for creating structured log events with simulation context
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
        );
    };
}
