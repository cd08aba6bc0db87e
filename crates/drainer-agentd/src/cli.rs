use clap::Parser;

use drainer_model::{
    DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS, DurationBound, IdleBackoffStrategy,
    JitterWindow, LoopConfig, QueueFilter,
};
use drainer_observe::{LoggerConfig, LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Drain queued tasks with adaptive idle backoff.
#[derive(Parser, Debug)]
#[command(name = "drainer-agentd", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Stop after this many seconds; 0 or less runs until SIGINT/SIGTERM
    #[arg(long, env = "DRAINER_DURATION", default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) duration: i64,

    /// Initial wait after an empty poll, in seconds
    #[arg(long, env = "DRAINER_SLEEP", default_value_t = 5.0)]
    pub(crate) sleep: f64,

    /// Upper bound for the idle wait, in seconds
    #[arg(long, env = "DRAINER_MAX_SLEEP", default_value_t = 120.0)]
    pub(crate) max_sleep: f64,

    /// Comma-separated queue names to drain; all queues when omitted
    #[arg(long, env = "DRAINER_QUEUE")]
    pub(crate) queue: Option<QueueFilter>,

    /// Lower bound of the pause after a task ran, in seconds
    #[arg(long, env = "DRAINER_JITTER_MIN", default_value_t = DEFAULT_JITTER_MIN_MS as f64 / 1000.0)]
    pub(crate) jitter_min: f64,

    /// Upper bound of the pause after a task ran, in seconds
    #[arg(long, env = "DRAINER_JITTER_MAX", default_value_t = DEFAULT_JITTER_MAX_MS as f64 / 1000.0)]
    pub(crate) jitter_max: f64,

    /// Route task output through the logger
    #[arg(long = "log-std", env = "DRAINER_LOG_STD")]
    pub(crate) log_std: bool,

    /// Log filter expression
    #[arg(long, env = "DRAINER_LOG_LEVEL", default_value = "info")]
    pub(crate) log_level: LoggerLevel,

    /// Log output format: text, json or journald
    #[arg(long, env = "DRAINER_LOG_FORMAT", default_value = "text")]
    pub(crate) log_format: LoggerFormat,

    /// Timezone for log timestamps: utc or local
    #[arg(long, env = "DRAINER_LOG_TZ", default_value = "utc")]
    pub(crate) log_tz: LoggerTimeZone,

    /// Seed the in-memory queue with this many demo tasks at startup
    #[arg(long, env = "DRAINER_DEMO_TASKS", default_value_t = 0)]
    pub(crate) demo: usize,

    /// Print collected metrics in Prometheus text format on exit
    #[arg(long)]
    pub(crate) dump_metrics: bool,
}

impl Cli {
    pub(crate) fn loop_config(&self) -> anyhow::Result<LoopConfig> {
        let cfg = LoopConfig::default()
            .with_duration(DurationBound::from_secs(self.duration))
            .with_backoff(IdleBackoffStrategy::from_secs_f64(self.sleep, self.max_sleep)?)
            .with_queues(self.queue.clone().unwrap_or_default());
        cfg.validate()?;
        Ok(cfg)
    }

    pub(crate) fn jitter(&self) -> anyhow::Result<JitterWindow> {
        Ok(JitterWindow::from_secs_f64(self.jitter_min, self.jitter_max)?)
    }

    pub(crate) fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            tz: self.log_tz,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["drainer-agentd"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = parse(&[]);
        let cfg = cli.loop_config().unwrap();

        assert!(!cfg.duration.is_bounded());
        assert_eq!(cfg.backoff.base(), Duration::from_secs(5));
        assert_eq!(cfg.backoff.max(), Duration::from_secs(120));
        assert!(cfg.queues.is_all());
        assert!(!cli.log_std);

        let jitter = cli.jitter().unwrap();
        assert_eq!(jitter.min_ms, DEFAULT_JITTER_MIN_MS);
        assert_eq!(jitter.max_ms, DEFAULT_JITTER_MAX_MS);
    }

    #[test]
    fn fractional_seconds_become_millis() {
        let cli = parse(&["--sleep", "0.25", "--max-sleep", "2.5", "--duration", "30"]);
        let cfg = cli.loop_config().unwrap();

        assert_eq!(cfg.backoff.base_ms, 250);
        assert_eq!(cfg.backoff.max_ms, 2500);
        assert_eq!(cfg.duration.limit(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn negative_duration_is_unbounded() {
        let cfg = parse(&["--duration", "-5"]).loop_config().unwrap();
        assert!(!cfg.duration.is_bounded());
    }

    #[test]
    fn queue_list_is_split_on_commas() {
        let cfg = parse(&["--queue", "mail,reports"]).loop_config().unwrap();
        assert_eq!(cfg.queues.len(), 2);
        assert!(cfg.queues.matches("mail"));
        assert!(!cfg.queues.matches("default"));
    }

    #[test]
    fn max_sleep_below_sleep_is_rejected() {
        let cli = parse(&["--sleep", "10", "--max-sleep", "1"]);
        assert!(cli.loop_config().is_err());
    }

    #[test]
    fn inverted_jitter_window_is_rejected() {
        let cli = parse(&["--jitter-min", "2", "--jitter-max", "1"]);
        assert!(cli.jitter().is_err());
    }

    #[test]
    fn bad_log_format_fails_parsing() {
        let res = Cli::try_parse_from(["drainer-agentd", "--log-format", "xml"]);
        assert!(res.is_err());
    }

    #[test]
    fn logger_config_carries_flags() {
        let cli = parse(&["--log-format", "json", "--log-level", "debug", "--log-std"]);
        let cfg = cli.logger_config();
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.level.as_str(), "debug");
        assert!(cli.log_std);
    }
}
