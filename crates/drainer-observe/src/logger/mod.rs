mod config;
mod error;
mod install;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// After this call every `tracing` macro in the process (including the worker loop events)
/// goes through the configured format and filter. Calling it twice returns
/// [`LoggerError::AlreadyInitialized`].
///
/// For [`LoggerTimeZone::Local`] call [`init_local_offset`] first, before the tokio runtime
/// starts any worker threads.
///
/// # Examples
/// ```rust
/// use drainer_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger");
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::install_text(cfg),
        LoggerFormat::Json => install::install_json(cfg),
        LoggerFormat::Journald => install::install_journald(cfg),
    }
}
