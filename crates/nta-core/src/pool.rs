//! Checksum worker pool: lazily created, capacity-capped, reusable.
//!
//! The pool is a process-wide singleton constructed on first use; its size
//! is fixed by whichever call constructs it, clamped to [`POOL_CAP`]. Items
//! are submitted fire-and-forget over a channel shared by the worker
//! threads; tasks queue when all workers are busy. Each task hashes one
//! item and reports {worker, item, digest} through the log. `wait_idle`
//! lets the CLI and tests block until all submitted tasks have finished
//! without changing the submission contract.

use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread;

use crate::checksum;

/// Hard upper bound on pool workers regardless of the requested size.
pub const POOL_CAP: usize = 3;

static POOL: OnceLock<ChecksumPool> = OnceLock::new();

/// In-flight task count, so callers can wait for quiescence.
#[derive(Default)]
struct PendingTasks {
    count: Mutex<usize>,
    drained: Condvar,
}

impl PendingTasks {
    fn start_one(&self) {
        *self.count.lock().unwrap() += 1;
    }

    fn finish_one(&self) {
        let mut count = self.count.lock().unwrap();
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn wait_drained(&self) {
        let mut count = self.count.lock().unwrap();
        while *count > 0 {
            count = self.drained.wait(count).unwrap();
        }
    }
}

/// Fixed-size pool of checksum workers fed from one submission channel.
pub struct ChecksumPool {
    workers: usize,
    tx: Sender<String>,
    pending: Arc<PendingTasks>,
    completed: Arc<AtomicUsize>,
}

impl ChecksumPool {
    /// Returns the process-wide pool, constructing it on first call with
    /// `requested` workers clamped to 1..=[`POOL_CAP`]. Later callers share
    /// the instance already built; their requested size is ignored (the
    /// size is fixed by whichever call wins construction).
    pub fn get_or_create(requested: usize) -> &'static ChecksumPool {
        POOL.get_or_init(|| ChecksumPool::new(requested))
    }

    fn new(requested: usize) -> ChecksumPool {
        let workers = requested.clamp(1, POOL_CAP);
        let (tx, rx) = mpsc::channel::<String>();
        let rx = Arc::new(Mutex::new(rx));
        let pending = Arc::new(PendingTasks::default());
        let completed = Arc::new(AtomicUsize::new(0));

        for n in 0..workers {
            let rx = Arc::clone(&rx);
            let pending = Arc::clone(&pending);
            let completed = Arc::clone(&completed);
            thread::spawn(move || worker_loop(n, &rx, &pending, &completed));
        }

        ChecksumPool {
            workers,
            tx,
            pending,
            completed,
        }
    }

    /// Number of workers the pool was built with.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Cumulative count of tasks that reached a terminal state (succeeded
    /// or failed) since the pool was created.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Submits one hashing task per usable item and returns the number
    /// submitted. Empty identifiers are skipped before submission. Does not
    /// wait for any task to run.
    pub fn dispatch<I, S>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut submitted = 0;
        for item in items {
            let item: String = item.into();
            if item.is_empty() {
                continue;
            }
            self.pending.start_one();
            if self.tx.send(item).is_err() {
                self.pending.finish_one();
                break;
            }
            submitted += 1;
        }
        submitted
    }

    /// Blocks until every submitted task has reached a terminal state.
    /// Returns immediately if nothing is pending.
    pub fn wait_idle(&self) {
        self.pending.wait_drained();
    }
}

fn worker_loop(
    worker: usize,
    rx: &Mutex<Receiver<String>>,
    pending: &PendingTasks,
    completed: &AtomicUsize,
) {
    loop {
        // Hold the receiver lock only while taking the next item.
        let next = rx.lock().unwrap().recv();
        let Ok(item) = next else {
            break;
        };
        run_task(worker, &item);
        completed.fetch_add(1, Ordering::Relaxed);
        pending.finish_one();
    }
}

/// Runs one hashing task: digest the item and report the result. A panic in
/// the digest path is contained so the worker and sibling tasks keep going.
fn run_task(worker: usize, item: &str) {
    match panic::catch_unwind(AssertUnwindSafe(|| checksum::sha256_hex(item))) {
        Ok(digest) => {
            tracing::info!(worker, item, digest = %digest, "checksum computed");
        }
        Err(_) => {
            tracing::error!(worker, item, "checksum task failed");
        }
    }
}

/// Extracts work-item identifiers from a fetched document: `items[].uid`.
/// A document without an `items` array, or entries without a usable `uid`,
/// contributes nothing; malformed shapes are skipped, not reported.
pub fn extract_items(root: &Value) -> Vec<String> {
    let Some(items) = root.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.get("uid").and_then(Value::as_str))
        .filter(|uid| !uid.is_empty())
        .map(str::to_string)
        .collect()
}
