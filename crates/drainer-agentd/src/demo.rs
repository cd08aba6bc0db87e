//! Demo workload for the in-memory queue.
use std::{io::Write, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::info;

use drainer_core::{Bootstrap, HookError, MemoryQueue, TaskError};
use drainer_model::{QueueFilter, QueueName};
use drainer_observe::StdLogWriter;

const DEFAULT_QUEUE: &str = "default";

/// Seeds the in-memory queue before the first poll.
///
/// Tasks are spread round-robin over the configured queues (or `default`). Every fifth task
/// fails so the failure path shows up in the logs. Task output goes to stdout, or through
/// the logger when `log_std` is set.
pub(crate) struct DemoSeed {
    queue: Arc<MemoryQueue>,
    count: usize,
    targets: Vec<QueueName>,
    log_std: bool,
}

impl DemoSeed {
    pub(crate) fn new(queue: Arc<MemoryQueue>, count: usize, filter: &QueueFilter, log_std: bool) -> Self {
        let mut targets: Vec<QueueName> = filter.iter().map(str::to_string).collect();
        if targets.is_empty() {
            targets.push(DEFAULT_QUEUE.to_string());
        }
        Self {
            queue,
            count,
            targets,
            log_std,
        }
    }
}

#[async_trait]
impl Bootstrap for DemoSeed {
    fn name(&self) -> &'static str {
        "demo-seed"
    }

    async fn bootstrap(&self) -> Result<(), HookError> {
        for n in 0..self.count {
            let queue = self.targets[n % self.targets.len()].clone();
            let log_std = self.log_std;
            self.queue
                .enqueue(queue, format!("demo-{n}"), move || demo_task(n, log_std))
                .map_err(|e| HookError::failed("demo-seed", e.to_string()))?;
        }
        info!(tasks = self.count, queues = self.targets.len(), "demo tasks seeded");
        Ok(())
    }
}

async fn demo_task(n: usize, log_std: bool) -> Result<(), TaskError> {
    tokio::time::sleep(Duration::from_millis(10 * (n as u64 % 5))).await;
    if n % 5 == 4 {
        return Err(TaskError::fail(format!("demo task {n} refused to finish")));
    }

    let mut out: Box<dyn Write + Send> = if log_std {
        Box::new(StdLogWriter::stdout())
    } else {
        Box::new(std::io::stdout())
    };
    writeln!(out, "demo task {n} done").map_err(|e| TaskError::fail(e.to_string()))?;
    out.flush().map_err(|e| TaskError::fail(e.to_string()))
}
