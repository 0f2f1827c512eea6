//! Query execution against the persistence handle.
//!
//! Four shapes of query are offered by [`QueryExecutor`]:
//! * a blocking fetch returning the ordered records,
//! * an asynchronous fetch, run on a background thread and delivered
//!   through a [`CallbackContext`],
//! * a store-side count,
//! * a store-side sum of an integer field.
//!
//! Asynchronous fetches carry a [`CancelToken`] and a [`Generation`]. A
//! result is only handed to the completion callback while the fetch is
//! neither cancelled nor superseded by a newer generation, and that check
//! is repeated on the callback context right before the callback runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::persist::Store;
use crate::query::{Predicate, QueryDescriptor};
use crate::record::{Entity, Field, Venue};

/// Cancellation token shared with the worker thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ------------- Generations -------------
/// Hands out monotonically increasing generation tokens. Only the most
/// recently issued generation is current.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: Arc<AtomicU64>,
}
impl Generations {
    pub fn new() -> Self {
        Self::default()
    }
    /// Issues a new generation, superseding every earlier one.
    pub fn advance(&self) -> Generation {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            token,
            latest: Arc::clone(&self.latest),
        }
    }
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    token: u64,
    latest: Arc<AtomicU64>,
}
impl Generation {
    pub fn token(&self) -> u64 {
        self.token
    }
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.token
    }
}

// ------------- Callback contexts -------------
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where completion callbacks of asynchronous fetches are run.
pub trait CallbackContext: Send + Sync {
    fn post(&self, job: Job);
}

/// Runs callbacks right away, on the worker thread that finished the fetch.
#[derive(Debug, Default)]
pub struct ImmediateContext;
impl CallbackContext for ImmediateContext {
    fn post(&self, job: Job) {
        job();
    }
}

/// Queues callbacks until the owning thread drains them, the way a UI
/// event loop would.
#[derive(Default)]
pub struct QueueContext {
    queue: Mutex<VecDeque<Job>>,
}
impl QueueContext {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
    /// Runs every queued callback on the calling thread and returns how many ran.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        loop {
            // the lock is released before the job runs, jobs may post again
            let job = self.queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}
impl CallbackContext for QueueContext {
    fn post(&self, job: Job) {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).push_back(job);
    }
}

// ------------- Asynchronous fetches -------------
/// Opaque fetch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchId(u64);

/// How an asynchronous fetch ended on its worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was posted to the callback context.
    Completed,
    Cancelled,
    /// A newer generation was issued before the result was ready.
    Superseded,
}

/// Handle to a running or finished asynchronous fetch.
pub struct FetchHandle {
    id: FetchId,
    generation: u64,
    cancel: CancelToken,
    started: Instant,
    join: JoinHandle<Result<FetchOutcome>>,
}
impl FetchHandle {
    /// Request cancellation. The callback will not run after this returns,
    /// unless it is already running.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
    pub fn id(&self) -> FetchId {
        self.id
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
    /// Waits for the worker and reports how it ended. Store failures come
    /// back here, as the same error a blocking fetch would have returned.
    pub fn wait(self) -> Result<FetchOutcome> {
        let id = self.id;
        self.join
            .join()
            .map_err(|_| StoreError::Worker(format!("fetch {:?} panicked", id)))?
    }
}

// ------------- Executor -------------
pub struct QueryExecutor {
    store: Arc<dyn Store>,
    entity: Entity,
    next_id: AtomicU64,
}
impl QueryExecutor {
    pub fn new(store: Arc<dyn Store>, entity: Entity) -> Self {
        Self {
            store,
            entity,
            next_id: AtomicU64::new(0),
        }
    }
    pub fn store(&self) -> Arc<dyn Store> {
        Arc::clone(&self.store)
    }
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Blocking fetch of the records described.
    pub fn fetch(&self, descriptor: &QueryDescriptor) -> Result<Vec<Venue>> {
        let started = Instant::now();
        let venues = self.store.fetch(descriptor)?;
        debug!(
            query = %descriptor,
            rows = venues.len(),
            ms = started.elapsed().as_secs_f64() * 1000.0,
            "fetch complete"
        );
        Ok(venues)
    }

    /// Runs the fetch on a background thread. `on_complete` is posted to
    /// `context` once the full result is materialized, and only runs if the
    /// fetch has not been cancelled and `generation` is still current.
    pub fn fetch_async<F>(
        &self,
        descriptor: QueryDescriptor,
        generation: Generation,
        context: Arc<dyn CallbackContext>,
        on_complete: F,
    ) -> Result<FetchHandle>
    where
        F: FnOnce(Vec<Venue>) + Send + 'static,
    {
        let id = FetchId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let cancel = CancelToken::new();
        let token = generation.token();
        let store = Arc::clone(&self.store);
        let cancel_for_thread = cancel.clone();
        let join = thread::Builder::new()
            .name(format!("venue-fetch-{}", id.0))
            .spawn(move || {
                let started = Instant::now();
                let venues = match store.fetch_cancellable(&descriptor, &cancel_for_thread) {
                    Ok(Some(venues)) => venues,
                    Ok(None) => {
                        debug!(generation = token, "fetch cancelled before completion");
                        return Ok(FetchOutcome::Cancelled);
                    }
                    Err(e) => {
                        warn!(error = %e, query = %descriptor, generation = token, "asynchronous fetch failed");
                        return Err(e);
                    }
                };
                if cancel_for_thread.is_cancelled() {
                    debug!(generation = token, "fetch cancelled before delivery");
                    return Ok(FetchOutcome::Cancelled);
                }
                if !generation.is_current() {
                    debug!(generation = token, latest = generation.latest.load(Ordering::SeqCst), "fetch superseded");
                    return Ok(FetchOutcome::Superseded);
                }
                debug!(
                    query = %descriptor,
                    rows = venues.len(),
                    generation = token,
                    ms = started.elapsed().as_secs_f64() * 1000.0,
                    "asynchronous fetch complete"
                );
                context.post(Box::new(move || {
                    if cancel_for_thread.is_cancelled() || !generation.is_current() {
                        debug!(generation = token, "stale fetch result discarded");
                        return;
                    }
                    on_complete(venues);
                }));
                Ok(FetchOutcome::Completed)
            })
            .map_err(|e| StoreError::Worker(format!("could not start fetch {}: {}", id.0, e)))?;
        Ok(FetchHandle {
            id,
            generation: token,
            cancel,
            started: Instant::now(),
            join,
        })
    }

    /// Number of records matching the predicate, counted by the store.
    pub fn count(&self, predicate: Option<&Predicate>) -> Result<u64> {
        let count = self.store.count(self.entity, predicate)?;
        debug!(predicate = predicate.map(|p| p.name()), count, "count complete");
        Ok(count)
    }

    /// Sum of an integer field across all records, computed by the store.
    ///
    /// # Panics
    /// If `field` is not an integer field.
    pub fn aggregate_sum(&self, field: Field) -> Result<i64> {
        let total = self.store.sum(self.entity, field)?;
        debug!(%field, total, "sum complete");
        Ok(total)
    }

    pub fn aggregate(&self, name: &str, field: Field) -> Result<AggregateResult> {
        Ok(AggregateResult {
            name: name.to_string(),
            field,
            total: self.aggregate_sum(field)?,
        })
    }
}

/// A named total computed inside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub name: String,
    pub field: Field,
    pub total: i64,
}
