use std::{
    collections::VecDeque,
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use drainer_model::{QueueFilter, QueueName};

use crate::hooks::{HookError, IdleHook};
use crate::queue::{QueueError, TaskError, TaskQueue};

type TaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send>>;
type TaskBody = Box<dyn FnOnce() -> TaskFuture + Send>;

struct QueuedTask {
    name: String,
    queue: QueueName,
    body: TaskBody,
}

/// Process-local FIFO task queue.
///
/// Tasks are named async closures bound to a queue name. `run_next_task` removes the oldest
/// task whose queue passes the filter and runs it on the caller's task. The internal lock
/// is only held while selecting a task, never across the task body.
///
/// Task failures ([`TaskError::Fail`]) are logged and counted; the poll still reports
/// that work was done. [`TaskError::Fatal`] surfaces as [`QueueError::TaskFatal`].
#[derive(Default)]
pub struct MemoryQueue {
    tasks: Mutex<VecDeque<QueuedTask>>,
    executed: AtomicU64,
    failed: AtomicU64,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to `queue`.
    pub fn enqueue<F, Fut>(
        &self,
        queue: impl Into<QueueName>,
        name: impl Into<String>,
        body: F,
    ) -> Result<(), QueueError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let task = QueuedTask {
            name: name.into(),
            queue: queue.into(),
            body: Box::new(move || Box::pin(body())),
        };
        trace!(task = %task.name, queue = %task.queue, "task enqueued");
        self.lock()?.push_back(task);
        Ok(())
    }

    /// Number of tasks waiting in all queues.
    pub fn len(&self) -> usize {
        self.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tasks waiting that `filter` would accept.
    pub fn pending(&self, filter: &QueueFilter) -> usize {
        self.lock()
            .map(|q| q.iter().filter(|t| filter.matches(&t.queue)).count())
            .unwrap_or(0)
    }

    /// Tasks taken from the queue so far (successful or not).
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    /// Tasks whose body returned an error.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<QueuedTask>>, QueueError> {
        self.tasks
            .lock()
            .map_err(|_| QueueError::Internal("memory queue lock poisoned".into()))
    }

    fn take_next(&self, filter: &QueueFilter) -> Result<Option<QueuedTask>, QueueError> {
        let mut tasks = self.lock()?;
        let Some(pos) = tasks.iter().position(|t| filter.matches(&t.queue)) else {
            return Ok(None);
        };
        Ok(tasks.remove(pos))
    }
}

#[async_trait]
impl TaskQueue for MemoryQueue {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn run_next_task(&self, filter: &QueueFilter) -> Result<bool, QueueError> {
        let Some(task) = self.take_next(filter)? else {
            return Ok(false);
        };
        self.executed.fetch_add(1, Ordering::Relaxed);
        debug!(task = %task.name, queue = %task.queue, "running task");

        match (task.body)().await {
            Ok(()) => {
                trace!(task = %task.name, "task completed");
                Ok(true)
            }
            Err(TaskError::Fail { reason }) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(task = %task.name, queue = %task.queue, reason = %reason, "task failed");
                Ok(true)
            }
            Err(TaskError::Fatal { reason }) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                Err(QueueError::TaskFatal {
                    task: task.name,
                    reason,
                })
            }
        }
    }
}

#[async_trait]
impl IdleHook for MemoryQueue {
    fn name(&self) -> &'static str {
        "memory-queue-shrink"
    }

    /// Give back storage grown during a burst once the queue has gone quiet.
    async fn on_idle(&self) -> Result<(), HookError> {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|_| HookError::failed("memory-queue-shrink", "lock poisoned"))?;
        let before = tasks.capacity();
        tasks.shrink_to_fit();
        if tasks.capacity() != before {
            trace!(before, after = tasks.capacity(), "released idle queue storage");
        }
        Ok(())
    }
}

impl fmt::Debug for MemoryQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQueue")
            .field("pending", &self.len())
            .field("executed", &self.executed())
            .field("failed", &self.failed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn push(queue: &MemoryQueue, q: &str, name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) {
        let log = Arc::clone(log);
        queue
            .enqueue(q, name, move || async move {
                log.lock().unwrap().push(name);
                Ok(())
            })
            .unwrap();
    }

    #[tokio::test]
    async fn empty_queue_reports_no_work() {
        let queue = MemoryQueue::new();
        assert!(!queue.run_next_task(&QueueFilter::all()).await.unwrap());
        assert_eq!(queue.executed(), 0);
    }

    #[tokio::test]
    async fn runs_tasks_in_fifo_order() {
        let queue = MemoryQueue::new();
        let log = recorder();
        push(&queue, "default", "a", &log);
        push(&queue, "default", "b", &log);

        let all = QueueFilter::all();
        assert!(queue.run_next_task(&all).await.unwrap());
        assert!(queue.run_next_task(&all).await.unwrap());
        assert!(!queue.run_next_task(&all).await.unwrap());

        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(queue.executed(), 2);
    }

    #[tokio::test]
    async fn filter_skips_other_queues() {
        let queue = MemoryQueue::new();
        let log = recorder();
        push(&queue, "reports", "r1", &log);
        push(&queue, "mail", "m1", &log);

        let mail: QueueFilter = "mail".parse().unwrap();
        assert_eq!(queue.pending(&mail), 1);
        assert!(queue.run_next_task(&mail).await.unwrap());
        assert!(!queue.run_next_task(&mail).await.unwrap());

        assert_eq!(*log.lock().unwrap(), vec!["m1"]);
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn failed_task_still_counts_as_work() {
        let queue = MemoryQueue::new();
        queue
            .enqueue("default", "broken", || async { Err(TaskError::fail("boom")) })
            .unwrap();

        assert!(queue.run_next_task(&QueueFilter::all()).await.unwrap());
        assert_eq!(queue.failed(), 1);
    }

    #[tokio::test]
    async fn fatal_task_error_escalates() {
        let queue = MemoryQueue::new();
        queue
            .enqueue("default", "doomed", || async { Err(TaskError::fatal("disk gone")) })
            .unwrap();

        let err = queue.run_next_task(&QueueFilter::all()).await.unwrap_err();
        assert!(matches!(err, QueueError::TaskFatal { ref task, .. } if task == "doomed"));
    }

    #[tokio::test]
    async fn idle_hook_releases_capacity() {
        let queue = MemoryQueue::new();
        let log = recorder();
        for _ in 0..64 {
            push(&queue, "default", "t", &log);
        }
        let all = QueueFilter::all();
        while queue.run_next_task(&all).await.unwrap() {}

        queue.on_idle().await.unwrap();
        assert!(queue.tasks.lock().unwrap().capacity() < 64);
    }
}
