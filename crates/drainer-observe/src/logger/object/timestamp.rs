use std::fmt;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::logger::object::LoggerTimeZone;

/// RFC3339 timestamps in the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct LoggerTimestamp {
    tz: LoggerTimeZone,
}

impl LoggerTimestamp {
    pub fn new(tz: LoggerTimeZone) -> Self {
        Self { tz }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.tz.offset())
    }
}

impl FormatTime for LoggerTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        match self.now().format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => w.write_str("<invalid-time> "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_timestamps_end_with_z() {
        let ts = LoggerTimestamp::new(LoggerTimeZone::Utc).now();
        let formatted = ts.format(&Rfc3339).unwrap();
        assert!(formatted.ends_with('Z'), "got {formatted}");
    }
}
