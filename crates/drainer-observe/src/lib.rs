mod logger;
pub use logger::*;

mod stdio;
pub use stdio::{StdLogWriter, StdStream};
