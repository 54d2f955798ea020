use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, error, info, instrument, warn};

use super::{DeliveryError, DeliverySettings, DispatchOutcome, Dispatcher, RequestItem, Transport};
use crate::services::bridge::RequestSink;

const WORKER_THREAD_NAME: &str = "delivery-worker";

struct QueueState {
    items: VecDeque<RequestItem>,
    running: bool,
}

/// Deque plus running flag, guarded together
///
/// The lock is never held across a network call.
struct SharedQueue {
    state: Mutex<QueueState>,
    changed: Condvar,
}

impl SharedQueue {
    fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                running: true,
            }),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_back(&self, item: RequestItem) -> usize {
        let mut state = self.lock();
        state.items.push_back(item);
        let depth = state.items.len();
        drop(state);
        self.changed.notify_one();
        depth
    }

    /// Return an item to the head; refused once stopped
    fn push_front(&self, item: RequestItem) -> Result<(), RequestItem> {
        let mut state = self.lock();
        if !state.running {
            return Err(item);
        }
        state.items.push_front(item);
        drop(state);
        self.changed.notify_one();
        Ok(())
    }

    /// Block until an item is available; `None` once stopped
    fn next(&self) -> Option<RequestItem> {
        let mut state = self.lock();
        loop {
            if !state.running {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Sleep for `duration` unless stopped first; returns whether still running
    fn pause(&self, duration: Duration) -> bool {
        let state = self.lock();
        let (state, _) = self
            .changed
            .wait_timeout_while(state, duration, |state| state.running)
            .unwrap_or_else(PoisonError::into_inner);
        state.running
    }

    /// Clear the running flag and drop queued items; returns how many
    fn stop(&self) -> usize {
        let mut state = self.lock();
        state.running = false;
        let dropped = state.items.len();
        state.items.clear();
        drop(state);
        self.changed.notify_all();
        dropped
    }

    fn snapshot(&self) -> Vec<RequestItem> {
        self.lock().items.iter().cloned().collect()
    }
}

/// FIFO of outbound requests drained by one background worker
///
/// Producers never block on I/O. Failed requests headed for a GitHub
/// Codespace trigger a wake request and return to the head of the queue.
pub struct DeliveryQueue {
    queue: Arc<SharedQueue>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DeliveryQueue {
    /// Start the worker thread
    ///
    /// # Errors
    /// Returns [`DeliveryError::WorkerSpawn`] if the thread cannot be created
    #[instrument(skip_all, fields(url = %settings.resource_url))]
    pub fn start(
        settings: DeliverySettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DeliveryError> {
        let queue = Arc::new(SharedQueue::new());
        let worker_queue = Arc::clone(&queue);
        let mut dispatcher = Dispatcher::new(settings, transport);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(&worker_queue, &mut dispatcher))
            .map_err(DeliveryError::WorkerSpawn)?;

        info!("Delivery queue started");
        Ok(Self {
            queue,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Append a request and wake the worker
    pub fn enqueue(&self, item: RequestItem) {
        let hint = item.hint.clone();
        let depth = self.queue.push_back(item);
        debug!(depth, "Queued: {hint}");
    }

    /// Copies of the queued requests, head first
    pub fn pending(&self) -> Vec<RequestItem> {
        self.queue.snapshot()
    }

    /// Stop the worker and wait for it
    ///
    /// Queued requests are dropped. An in-flight request finishes or times
    /// out first. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let dropped = self.queue.stop();
        if dropped > 0 {
            warn!(dropped, "Delivery queue stopped with undelivered requests");
        }

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Delivery worker panicked");
            }
            info!("Delivery queue shut down");
        }
    }
}

impl RequestSink for DeliveryQueue {
    fn enqueue(&self, item: RequestItem) {
        DeliveryQueue::enqueue(self, item);
    }
}

impl Drop for DeliveryQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(queue: &SharedQueue, dispatcher: &mut Dispatcher) {
    debug!("Delivery worker running");
    let success_pause = dispatcher.settings().success_pause;
    let retry_pause = dispatcher.settings().retry_pause;

    while let Some(item) = queue.next() {
        let pause = match dispatcher.dispatch(item) {
            DispatchOutcome::Delivered => success_pause,
            DispatchOutcome::Requeue(item) => {
                if let Err(item) = queue.push_front(item) {
                    warn!("Delivery queue stopped, dropping in-flight request: {}", item.hint);
                    break;
                }
                retry_pause
            }
            DispatchOutcome::Abandoned => retry_pause,
            DispatchOutcome::Skipped => continue,
        };

        if !queue.pause(pause) {
            break;
        }
    }
    debug!("Delivery worker finished");
}
