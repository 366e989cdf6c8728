use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod clipboard;
pub mod controller;
pub mod error;
pub mod form_guard;
pub mod markup;
pub mod notification;
pub mod notifier;
pub mod page;
pub mod renderer;

pub use error::ValidationError;
pub use notification::{Notification, Severity};
pub use page::Page;

// Every page mutation is a short synchronous section, so a poisoned lock
// still holds a usable page.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
