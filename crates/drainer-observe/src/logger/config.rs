use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logger configuration.
///
/// Every field has a default, so a partial document (or `{}`) is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (`"info"`, `"drainer_core=debug,info"`).
    pub level: LoggerLevel,
    /// Timezone used for timestamps.
    pub tz: LoggerTimeZone,
    /// Include the event target (module path) in each line.
    pub with_targets: bool,
    /// Allow ANSI colors for the text format.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Colors are used only when enabled in config *and* stdout is a terminal.
    ///
    /// Evaluated at install time so that a redirected worker (systemd, `> file`) never
    /// writes escape codes into its log.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
