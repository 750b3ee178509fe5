//! Single-assignment resource broker.
//!
//! A [`ResourceBroker`] mediates access to a resource that is created lazily
//! by one owner and consumed by any number of independent readers. Readers
//! may ask for the resource before it exists; their continuations are queued
//! and run exactly once, in registration order, when the owner publishes.
//!
//! # Semantics
//!
//! - `publish` assigns the resource once. Later calls are no-ops and the
//!   first value is retained.
//! - `when_ready` runs the continuation immediately if the resource is
//!   already published, otherwise queues it.
//! - `wait` is the future-shaped form of `when_ready`. It never fails and has
//!   no timeout: a resource that is never published leaves the future
//!   pending forever.
//!
//! Continuations registered while the queue is being flushed (for example
//! from inside another continuation) are appended to the queue so strict
//! registration order holds across the whole flush.
//!
//! A continuation that panics unwinds out of whichever call is flushing.
//! Continuations queued behind it stay queued and are flushed by the next
//! `when_ready`, ahead of the new one.
//!
//! # Example
//!
//! ```ignore
//! use bufferpick::broker::ResourceBroker;
//!
//! let broker = ResourceBroker::new("map");
//! let pending = broker.wait();           // registered now
//! broker.publish(42);
//! assert_eq!(pending.await, 42);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// A queued continuation.
type Continuation<T> = Box<dyn FnOnce(T) + Send + 'static>;

struct BrokerState<T> {
    published: Option<T>,
    pending: VecDeque<Continuation<T>>,
    /// True while queued continuations are being run.
    draining: bool,
}

/// Clears the draining flag if a continuation unwinds mid-flush.
struct DrainGuard<'a, T> {
    state: &'a Mutex<BrokerState<T>>,
}

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.state.lock().draining = false;
        }
    }
}

/// Single-assignment, future-like holder for a lazily created resource.
///
/// Cloning the published value must be cheap; brokers are normally
/// instantiated with `Arc<dyn Trait>` handles.
pub struct ResourceBroker<T> {
    name: String,
    state: Mutex<BrokerState<T>>,
}

impl<T> ResourceBroker<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an empty broker identified by `name` in logs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(BrokerState {
                published: None,
                pending: VecDeque::new(),
                draining: false,
            }),
        }
    }

    /// Returns the broker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a continuation to run with the published resource.
    ///
    /// Runs synchronously on the calling thread if the resource is already
    /// available, otherwise on the thread that calls [`publish`](Self::publish).
    pub fn when_ready<F>(&self, continuation: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        let value = {
            let mut state = self.state.lock();
            match state.published.clone() {
                Some(value) if !state.draining && state.pending.is_empty() => value,
                Some(value) if !state.draining => {
                    // Left behind by a continuation that panicked; run them first.
                    state.pending.push_back(Box::new(continuation));
                    state.draining = true;
                    drop(state);
                    let flushed = self.drain(value);
                    debug!(broker = %self.name, flushed, "Stranded continuations flushed");
                    return;
                }
                _ => {
                    state.pending.push_back(Box::new(continuation));
                    trace!(
                        broker = %self.name,
                        pending = state.pending.len(),
                        "Continuation queued"
                    );
                    return;
                }
            }
        };

        continuation(value);
    }

    /// Returns a future resolving to the published resource.
    ///
    /// The continuation is registered when `wait` is called, not when the
    /// future is first polled, so the call site fixes the resolution order.
    pub fn wait(&self) -> impl Future<Output = T> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.when_ready(move |value| {
            // The waiter may have been dropped; nothing to deliver to then.
            let _ = tx.send(value);
        });

        async move {
            match rx.await {
                Ok(value) => value,
                // Broker dropped before publication: keep waiting forever.
                Err(_) => std::future::pending().await,
            }
        }
    }

    /// Publishes the resource and flushes queued continuations.
    ///
    /// Returns `false` without touching the stored value if a resource was
    /// already published.
    pub fn publish(&self, value: T) -> bool {
        {
            let mut state = self.state.lock();
            if state.published.is_some() {
                debug!(broker = %self.name, "Resource already published, ignoring");
                return false;
            }
            state.published = Some(value.clone());
            state.draining = true;
        }

        let flushed = self.drain(value);
        debug!(broker = %self.name, flushed, "Resource published");
        true
    }

    /// Runs queued continuations one at a time until the queue is empty.
    ///
    /// The caller must have set `draining`.
    fn drain(&self, value: T) -> usize {
        let _guard = DrainGuard { state: &self.state };
        let mut flushed = 0usize;
        loop {
            let continuation = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some(continuation) => continuation,
                    None => {
                        state.draining = false;
                        break;
                    }
                }
            };
            continuation(value.clone());
            flushed += 1;
        }
        flushed
    }

    /// Returns the published resource without waiting.
    pub fn get(&self) -> Option<T> {
        self.state.lock().published.clone()
    }

    /// Returns true once a resource has been published.
    pub fn is_published(&self) -> bool {
        self.state.lock().published.is_some()
    }

    /// Number of continuations waiting for publication.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}

impl<T> fmt::Debug for ResourceBroker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResourceBroker")
            .field("name", &self.name)
            .field("published", &state.published.is_some())
            .field("pending", &state.pending.len())
            .finish()
    }
}
