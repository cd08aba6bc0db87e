mod format;
pub use format::LoggerFormat;

mod level;
pub use level::LoggerLevel;

mod timestamp;
pub use timestamp::LoggerTimestamp;

mod timezone;
pub use timezone::{LoggerTimeZone, init_local_offset};
