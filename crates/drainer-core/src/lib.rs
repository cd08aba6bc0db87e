pub mod error;
pub mod hooks;
pub mod jitter;
pub mod metrics;
pub mod queue;
pub mod shutdown;
pub mod worker;

pub use error::CoreError;
pub use hooks::{Bootstrap, HookError, IdleHook};
pub use jitter::{JitterSource, UniformJitter};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, WaitKind, noop_metrics};
pub use queue::{MemoryQueue, QueueError, TaskError, TaskQueue};
pub use shutdown::{ShutdownSignal, listen_os_signals};
pub use worker::{IdleBackoff, LoopPhase, LoopReport, StopReason, WorkerLoop};
