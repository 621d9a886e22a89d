//! Deferred task queue for idle processing.
//!
//! Components that batch work (such as the wrap-list engine) never run it
//! inside the notification that made it necessary. They hand a closure to an
//! [`IdleScheduler`] instead, and the host runs it once the current burst of
//! events is over.
//!
//! [`IdleQueue`] is the stock scheduler: the host event loop calls
//! [`IdleQueue::run_pending`] once per tick.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::SchedulerError;
use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed idle task.
pub type IdleTask = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a closure later, once the caller's stack unwinds.
///
/// Implementations must never run the task synchronously inside
/// `schedule_idle`.
pub trait IdleScheduler: Send + Sync {
    /// Queue `task` for a later idle slot.
    fn schedule_idle(&self, task: IdleTask) -> Result<TaskId, SchedulerError>;

    /// Drop a queued task before it runs.
    ///
    /// Returns `false` if the task already ran or was never queued here.
    fn cancel_idle(&self, id: TaskId) -> bool;
}

struct TaskData {
    id: TaskId,
    task: IdleTask,
}

/// FIFO of deferred tasks, guarded by [`IdleQueue`].
struct TaskQueue {
    tasks: VecDeque<TaskData>,
    /// Maximum number of tasks to process per idle cycle.
    batch_size: usize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: 10,
        }
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// Post a task to be executed during idle time.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Remove up to `batch_size` tasks from the front, without running them.
    fn take_batch(&mut self) -> Vec<TaskData> {
        let count = self.tasks.len().min(self.batch_size);
        self.tasks.drain(..count).collect()
    }

    /// Remove every queued task, without running them.
    fn take_all(&mut self) -> Vec<TaskData> {
        self.tasks.drain(..).collect()
    }

    /// Set the batch size for idle processing.
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe idle queue driven by the host event loop.
///
/// Tasks run outside the queue lock, so a running task may schedule more
/// work. Such work lands in the next tick, never in the one being drained.
pub struct IdleQueue {
    inner: Mutex<TaskQueue>,
    closed: AtomicBool,
}

impl IdleQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TaskQueue::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            inner: Mutex::new(TaskQueue::with_batch_size(batch_size)),
            closed: AtomicBool::new(false),
        }
    }

    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lock().post(task)
    }

    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.lock().cancel(id)
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().has_pending()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    /// Run every task queued before this call.
    ///
    /// Returns the number of tasks run.
    #[tracing::instrument(skip_all, target = "wrapview_core::task", level = "trace")]
    pub fn run_pending(&self) -> usize {
        let batch = self.inner.lock().take_all();
        Self::run(batch)
    }

    /// Run at most one batch of queued tasks.
    pub fn run_batch(&self) -> usize {
        let batch = self.inner.lock().take_batch();
        Self::run(batch)
    }

    /// Drain the queue until it stays empty, including tasks posted by tasks.
    ///
    /// `max_ticks` bounds the number of drains so a task that keeps
    /// rescheduling itself cannot spin forever. Returns the number of tasks
    /// run.
    pub fn run_until_idle(&self, max_ticks: usize) -> usize {
        let mut total = 0;
        for _ in 0..max_ticks {
            let ran = self.run_pending();
            if ran == 0 {
                break;
            }
            total += ran;
        }
        total
    }

    /// Refuse further tasks. Already-queued tasks are dropped unrun.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let dropped = self.inner.lock().take_all().len();
        tracing::debug!(target: targets::TASK, dropped, "idle queue closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn set_batch_size(&self, size: usize) {
        self.inner.lock().set_batch_size(size);
    }

    fn run(batch: Vec<TaskData>) -> usize {
        let count = batch.len();
        for task_data in batch {
            tracing::trace!(target: targets::TASK, id = task_data.id.as_u64(), "running idle task");
            (task_data.task)();
        }
        count
    }
}

impl Default for IdleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleScheduler for IdleQueue {
    fn schedule_idle(&self, task: IdleTask) -> Result<TaskId, SchedulerError> {
        if self.is_closed() {
            return Err(SchedulerError::Closed);
        }
        let id = self.post(task);
        tracing::trace!(target: targets::TASK, id = id.as_u64(), "idle task scheduled");
        Ok(id)
    }

    fn cancel_idle(&self, id: TaskId) -> bool {
        self.cancel(id)
    }
}

static_assertions::assert_impl_all!(IdleQueue: Send, Sync);
