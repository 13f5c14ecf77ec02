// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value types with ZERO external dependencies.
//!
//! Types here enforce their valid ranges at construction so the rest of the
//! crate never has to re-validate them.
//!
//! - [`ToastDuration`]: lifetime of a toast notification
//! - [`BufferCapacity`]: capacity of the diagnostics event buffer

mod newtypes;

pub use newtypes::{buffer_capacity_bounds, toast_duration_bounds, BufferCapacity, ToastDuration};
