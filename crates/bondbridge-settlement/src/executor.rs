//! Serializing executor.
//!
//! Ledger operations must apply one at a time: each is a single indivisible
//! unit, and their effects depend on order. [`LedgerExecutor`] owns the
//! ledger state on one tokio task and drains a FIFO queue of operations,
//! replying to each caller over a oneshot channel. Handles are cheap to
//! clone; the task stops once every handle is dropped and hands the state
//! back through its `JoinHandle`.

use bondbridge_types::{BridgeError, Result, constants};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Handle to a task that applies operations to `S` in submission order.
pub struct LedgerExecutor<S> {
    queue: mpsc::Sender<Job<S>>,
}

impl<S> Clone for LedgerExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<S: Send + 'static> LedgerExecutor<S> {
    /// Spawn the executor task with the default queue depth.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(state: S) -> (Self, JoinHandle<S>) {
        Self::with_queue_depth(state, constants::DEFAULT_EXECUTOR_QUEUE_DEPTH)
    }

    /// Spawn with an explicit queue depth. Submitters wait while the queue
    /// is full.
    pub fn with_queue_depth(mut state: S, depth: usize) -> (Self, JoinHandle<S>) {
        let (queue, mut jobs) = mpsc::channel::<Job<S>>(depth.max(1));
        let task = tokio::spawn(async move {
            let mut applied: u64 = 0;
            while let Some(job) = jobs.recv().await {
                job(&mut state);
                applied += 1;
            }
            tracing::debug!(applied, "Ledger executor stopped");
            state
        });
        (Self { queue }, task)
    }

    /// Queue `op` and wait for its result.
    ///
    /// # Errors
    /// Returns `ExecutorClosed` if the task has stopped.
    pub async fn execute<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut S) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply, result) = oneshot::channel();
        let job: Job<S> = Box::new(move |state| {
            // The caller may have gone away; the operation still applied.
            let _ = reply.send(op(state));
        });
        self.queue
            .send(job)
            .await
            .map_err(|_| BridgeError::ExecutorClosed)?;
        result.await.map_err(|_| BridgeError::ExecutorClosed)
    }

    /// Queue a fallible ledger operation and flatten its result.
    ///
    /// # Errors
    /// `ExecutorClosed`, or whatever `op` returns.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut S) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.execute(op).await?
    }

    /// Whether the executor task has stopped accepting operations.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}
