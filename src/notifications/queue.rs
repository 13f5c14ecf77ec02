// SPDX-License-Identifier: MPL-2.0
//! Observable toast queue with self-expiring entries.
//!
//! The [`ToastQueue`] owns the ordered sequence of live notifications. Every
//! change is published to subscribers; each entry carries the abort handle of
//! its expiry timer so it can be dismissed before it fires.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use slotmap::{DefaultKey, SlotMap};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use super::notification::{Category, Notification, NotificationId};
use crate::config::Config;
use crate::diagnostics::{
    DiagnosticEventKind, DiagnosticsHandle, ErrorEvent, RemovalReason, WarningEvent,
};
use crate::domain::ToastDuration;
use crate::error::Result;

type Callback = Arc<Mutex<dyn FnMut(&[Notification]) + Send>>;

/// Shared, observable sequence of live notifications.
///
/// Cloning yields another handle to the same queue. Entries are kept in
/// insertion order and removed when their lifetime elapses.
///
/// # Example
///
/// ```
/// use ciclomappa::notifications::{Category, ToastQueue};
/// use ciclomappa::domain::ToastDuration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ciclomappa::error::Result<()> {
/// let queue = ToastQueue::new()?;
/// let subscription = queue.subscribe(|toasts| println!("{} toast(s)", toasts.len()));
///
/// queue.enqueue_with("Saved", Category::Success, ToastDuration::from_millis(100));
/// assert_eq!(queue.len(), 1);
///
/// subscription.unsubscribe();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ToastQueue {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    runtime: Handle,
}

struct State {
    entries: Vec<Entry>,
    /// Last published sequence.
    snapshot: Arc<[Notification]>,
    subscribers: SlotMap<DefaultKey, Callback>,
    /// Deliveries not yet handed to their subscriber, oldest first.
    pending: VecDeque<Delivery>,
    /// Set while some caller is draining `pending`.
    delivering: bool,
    default_duration: ToastDuration,
    diagnostics: Option<DiagnosticsHandle>,
}

struct Entry {
    notification: Notification,
    expiry: AbortHandle,
}

struct Delivery {
    subscriber: DefaultKey,
    value: Arc<[Notification]>,
}

impl ToastQueue {
    /// Creates an empty queue whose timers run on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Runtime` when called outside of a tokio runtime.
    pub fn new() -> Result<Self> {
        Ok(Self::with_runtime(Handle::try_current()?))
    }

    /// Creates an empty queue whose timers run on `runtime`.
    #[must_use]
    pub fn with_runtime(runtime: Handle) -> Self {
        let state = State {
            entries: Vec::new(),
            snapshot: Arc::from(Vec::new()),
            subscribers: SlotMap::new(),
            pending: VecDeque::new(),
            delivering: false,
            default_duration: ToastDuration::default(),
            diagnostics: None,
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                runtime,
            }),
        }
    }

    /// Creates a queue on the current runtime using the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Runtime` when called outside of a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let queue = Self::new()?;
        queue.set_default_duration(config.toast_duration());
        Ok(queue)
    }

    /// Sets the diagnostics handle used to log queue activity.
    pub fn set_diagnostics(&self, handle: DiagnosticsHandle) {
        self.shared.lock().diagnostics = Some(handle);
    }

    /// Sets the lifetime used by [`enqueue`](Self::enqueue) and
    /// [`enqueue_as`](Self::enqueue_as).
    pub fn set_default_duration(&self, duration: ToastDuration) {
        self.shared.lock().default_duration = duration;
    }

    #[must_use]
    pub fn default_duration(&self) -> ToastDuration {
        self.shared.lock().default_duration
    }

    /// Enqueues an `info` toast with the default lifetime.
    pub fn enqueue(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue_as(message, Category::default())
    }

    /// Enqueues a toast of `category` with the default lifetime.
    pub fn enqueue_as(
        &self,
        message: impl Into<String>,
        category: impl Into<Category>,
    ) -> NotificationId {
        let duration = self.default_duration();
        self.enqueue_with(message, category, duration)
    }

    /// Enqueues a toast that expires after `duration`.
    pub fn enqueue_with(
        &self,
        message: impl Into<String>,
        category: impl Into<Category>,
        duration: ToastDuration,
    ) -> NotificationId {
        self.push(Notification::new(category, message).with_duration(duration))
    }

    /// Appends `notification`, publishes the new sequence and schedules its
    /// expiry after [`Notification::duration`].
    pub fn push(&self, notification: Notification) -> NotificationId {
        let id = notification.id();
        {
            let mut state = self.shared.lock();

            if let Some(handle) = &state.diagnostics {
                log_shown(handle, &notification);
            }

            // Spawned under the lock so the timer can never observe the
            // queue before the entry is in it.
            let expiry = self
                .shared
                .runtime
                .spawn(expire(
                    Arc::downgrade(&self.shared),
                    id,
                    notification.duration(),
                ))
                .abort_handle();

            state.entries.push(Entry {
                notification,
                expiry,
            });
            state.publish();
        }
        self.shared.deliver();
        id
    }

    /// Removes a notification before it expires.
    ///
    /// Returns `false` if no live notification has this id.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.shared.remove(id, RemovalReason::Dismissed)
    }

    /// Removes every notification and cancels their timers.
    pub fn clear(&self) {
        {
            let mut state = self.shared.lock();
            if state.entries.is_empty() {
                return;
            }

            let count = state.entries.len();
            for entry in state.entries.drain(..) {
                entry.expiry.abort();
            }
            if let Some(handle) = &state.diagnostics {
                handle.log(DiagnosticEventKind::NotificationsCleared { count });
            }
            state.publish();
        }
        self.shared.deliver();
    }

    /// Registers `callback` to observe the sequence.
    ///
    /// The callback runs with the current sequence before this returns and
    /// again after every change. Callbacks may use the queue themselves;
    /// changes they make are delivered once they return.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&[Notification]) + Send + 'static,
    {
        let callback: Callback = Arc::new(Mutex::new(callback));
        let key = {
            let mut state = self.shared.lock();
            let key = state.subscribers.insert(callback);
            let value = Arc::clone(&state.snapshot);
            state.pending.push_back(Delivery {
                subscriber: key,
                value,
            });
            key
        };
        self.shared.deliver();

        Subscription {
            shared: Arc::downgrade(&self.shared),
            key: Some(key),
        }
    }

    /// Returns the current sequence.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Notification]> {
        Arc::clone(&self.shared.lock().snapshot)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock().entries.is_empty()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().subscribers.len()
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("ToastQueue")
            .field("notifications", &state.snapshot)
            .field("subscribers", &state.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes the entry with `id`. Missing entries are a no-op and publish nothing.
    fn remove(&self, id: NotificationId, reason: RemovalReason) -> bool {
        {
            let mut state = self.lock();
            let Some(position) = state
                .entries
                .iter()
                .position(|entry| entry.notification.id() == id)
            else {
                return false;
            };

            let entry = state.entries.remove(position);
            if reason == RemovalReason::Dismissed {
                entry.expiry.abort();
            }
            if let Some(handle) = &state.diagnostics {
                handle.log_notification_removed(id.value(), reason);
            }
            state.publish();
        }
        self.deliver();
        true
    }

    /// Hands pending deliveries to their subscribers, outside the state lock.
    ///
    /// Only one caller drains at a time; a nested call (from inside a
    /// callback) returns immediately and its deliveries are picked up by the
    /// outer loop.
    fn deliver(&self) {
        {
            let mut state = self.lock();
            if state.delivering {
                return;
            }
            state.delivering = true;
        }

        let mut guard = DeliveryGuard {
            shared: self,
            finished: false,
        };

        loop {
            let (callback, value) = {
                let mut state = self.lock();
                let Some(delivery) = state.pending.pop_front() else {
                    state.delivering = false;
                    guard.finished = true;
                    return;
                };
                match state.subscribers.get(delivery.subscriber) {
                    Some(callback) => (Arc::clone(callback), delivery.value),
                    // Unsubscribed after the delivery was queued.
                    None => continue,
                }
            };

            let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
            (&mut *callback)(&value[..]);
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for entry in &state.entries {
            entry.expiry.abort();
        }
    }
}

impl State {
    /// Rebuilds the snapshot and queues it for every subscriber.
    fn publish(&mut self) {
        let snapshot: Arc<[Notification]> = self
            .entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect();
        self.snapshot = snapshot;

        for subscriber in self.subscribers.keys() {
            self.pending.push_back(Delivery {
                subscriber,
                value: Arc::clone(&self.snapshot),
            });
        }
    }
}

/// Releases the delivery flag if a callback panics mid-drain.
struct DeliveryGuard<'a> {
    shared: &'a Shared,
    finished: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.lock().delivering = false;
        }
    }
}

async fn expire(shared: Weak<Shared>, id: NotificationId, lifetime: ToastDuration) {
    tokio::time::sleep(lifetime.as_duration()).await;
    if let Some(shared) = shared.upgrade() {
        shared.remove(id, RemovalReason::Expired);
    }
}

fn log_shown(handle: &DiagnosticsHandle, notification: &Notification) {
    let id = notification.id().value();
    handle.log_notification_shown(
        id,
        notification.category().as_str(),
        notification.duration().as_millis(),
    );

    match notification.category() {
        Category::Warning => handle.log_warning(WarningEvent {
            notification_id: id,
            message: notification.message().to_string(),
        }),
        Category::Error => handle.log_error(ErrorEvent {
            notification_id: id,
            message: notification.message().to_string(),
        }),
        Category::Info | Category::Success | Category::Custom(_) => {}
    }
}

/// Registration of a subscriber callback.
///
/// Dropping the handle unsubscribes; use [`detach`](Self::detach) to keep
/// the callback for the lifetime of the queue.
#[must_use = "dropping a Subscription unsubscribes its callback"]
pub struct Subscription {
    shared: Weak<Shared>,
    key: Option<DefaultKey>,
}

impl Subscription {
    /// Deregisters the callback. It receives no further invocations.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keeps the callback registered for as long as the queue lives.
    pub fn detach(mut self) {
        self.key = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        match (self.key, self.shared.upgrade()) {
            (Some(key), Some(shared)) => shared.lock().subscribers.contains_key(key),
            _ => false,
        }
    }

    fn release(&mut self) {
        if let (Some(key), Some(shared)) = (self.key.take(), self.shared.upgrade()) {
            shared.lock().subscribers.remove(key);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
