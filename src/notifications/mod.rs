// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Toasts are short messages (saved route, lost GPS signal, offline tiles
//! ready) that appear for a few seconds and then disappear on their own.
//!
//! # Components
//!
//! - [`Notification`] - message, [`Category`] tag, lifetime and identifier
//! - [`ToastQueue`] - the observable, self-expiring sequence of live toasts
//! - [`Subscription`] - handle returned by [`ToastQueue::subscribe`]
//!
//! # Usage
//!
//! ```ignore
//! use ciclomappa::notifications::{Category, ToastQueue};
//!
//! // Owned by the application root and passed to presentation code
//! let queue = ToastQueue::new()?;
//!
//! // Presentation layer re-renders on every change
//! let subscription = queue.subscribe(|toasts| render(toasts));
//!
//! // Producers fire and forget
//! queue.enqueue_as("Route saved", Category::Success);
//! ```

mod notification;
mod queue;

pub use notification::{Category, Notification, NotificationId};
pub use queue::{Subscription, ToastQueue};
