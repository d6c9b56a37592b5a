//! # Core observer trait
//!
//! `Observe` is the extension point for reacting to notifications. Observers
//! are invoked synchronously, in registration order, on the poster's thread,
//! with exclusive access to the notification being delivered.
//!
//! ## Contract
//! - Observers may mutate the notification's info; later observers and the
//!   poster see the change.
//! - Observers may [`cancel`](crate::Notification::cancel) the notification;
//!   observers not yet invoked are skipped.
//! - Observers may register/remove observers or post *other* notifications
//!   while running. Locking the handle of the notification being delivered
//!   deadlocks.
//!
//! ## Identity
//! Each registration carries an [`ObserverId`] supplied by the caller. It is
//! the key used to replace, look up and remove registrations, so it must be
//! stable for the same logical observer.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::notifications::Notification;

/// Contract for notification observers.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use postmaster::{Notification, Observe};
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl Observe for Counter {
///     fn on_notification(&self, _n: &mut Notification) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
///     fn name(&self) -> &'static str { "counter" }
/// }
/// ```
pub trait Observe: Send + Sync + 'static {
    /// Handle one delivered notification.
    fn on_notification(&self, notification: &mut Notification);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared reference to an observer.
pub type ObserverRef = Arc<dyn Observe>;

/// Caller-supplied identity of a registration.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(Arc<str>);

impl ObserverId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObserverId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObserverId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&ObserverId> for ObserverId {
    fn from(id: &ObserverId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for ObserverId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObserverId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ObserverId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ObserverId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_id_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(ObserverId::from("audit"), 1);
        assert_eq!(map.get("audit"), Some(&1));
        assert_eq!(ObserverId::from(String::from("audit")), "audit");
        assert_eq!(format!("{:?}", ObserverId::from("a")), "\"a\"");
    }
}
