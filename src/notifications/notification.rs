//! # Notifications: one posted event occurrence.
//!
//! A [`Notification`] carries the event name, the optional associated object,
//! a mutable JSON payload, a cancellation flag and a delivery counter.
//!
//! One post produces exactly one notification instance. It is wrapped in a
//! [`NotificationRef`] and that **same** handle is what observers see, what
//! pending stores retain, what bubbles into parent dispatchers and what the
//! poster gets back. Mutations made by one observer are therefore visible to
//! the next one and to the poster.
//!
//! ## Ordering
//! Each notification takes a globally unique, monotonically increasing `seq`
//! at construction, which can be used to order diagnostics.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use postmaster::{Notification, Tag};
//!
//! let mut n = Notification::new("onSave")
//!     .with_object(Tag::arc("Document"))
//!     .with_info(json!({ "path": "/tmp/a" }));
//!
//! assert_eq!(n.name(), "onSave");
//! assert_eq!(n.object_class(), Some("Document"));
//! n.cancel();
//! assert!(n.is_cancelled());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::{Mutex, MutexGuard};
use serde_json::{Map, Value};

use super::subject::SubjectRef;

/// Global sequence counter for notification ordering.
static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// One event occurrence.
pub struct Notification {
    seq: u64,
    name: Arc<str>,
    object: Option<SubjectRef>,
    info: Value,
    cancelled: bool,
    delivery_count: u32,
}

impl Notification {
    /// Creates a notification with no object and an empty info object.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            seq: NOTIFICATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            name: name.into(),
            object: None,
            info: Value::Object(Map::new()),
            cancelled: false,
            delivery_count: 0,
        }
    }

    /// Attaches the associated object.
    #[inline]
    pub fn with_object(mut self, object: SubjectRef) -> Self {
        self.object = Some(object);
        self
    }

    /// Attaches an optional associated object.
    #[inline]
    pub fn with_object_opt(mut self, object: Option<SubjectRef>) -> Self {
        self.object = object;
        self
    }

    /// Replaces the info payload.
    #[inline]
    pub fn with_info(mut self, info: Value) -> Self {
        self.info = info;
        self
    }

    /// Sequence number assigned at construction.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Event name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Associated object, if any.
    #[inline]
    pub fn object(&self) -> Option<&SubjectRef> {
        self.object.as_ref()
    }

    /// Class tag of the associated object.
    #[inline]
    pub fn object_class(&self) -> Option<&str> {
        self.object.as_deref().map(|o| o.class_name())
    }

    /// Payload shared between the poster and all observers.
    #[inline]
    pub fn info(&self) -> &Value {
        &self.info
    }

    /// Mutable payload access.
    #[inline]
    pub fn info_mut(&mut self) -> &mut Value {
        &mut self.info
    }

    /// Replaces the payload.
    #[inline]
    pub fn set_info(&mut self, info: Value) {
        self.info = info;
    }

    /// Stops delivery to every observer that has not been invoked yet.
    ///
    /// The observer calling this still runs to completion; the poster still
    /// receives the notification.
    #[inline]
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of observer invocations so far (diagnostics only).
    #[inline]
    pub fn delivery_count(&self) -> u32 {
        self.delivery_count
    }

    #[inline]
    pub(crate) fn increase_delivery_count(&mut self) {
        self.delivery_count = self.delivery_count.saturating_add(1);
    }

    /// True if this notification should reach an entry filtered on `class`.
    ///
    /// No filter matches everything; a filter never matches a notification
    /// without an object.
    pub(crate) fn matches_class(&self, class: Option<&str>) -> bool {
        match class {
            None => true,
            Some(class) => self
                .object
                .as_deref()
                .is_some_and(|object| object.is_class(class)),
        }
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("seq", &self.seq)
            .field("name", &self.name)
            .field("object", &self.object_class())
            .field("info", &self.info)
            .field("cancelled", &self.cancelled)
            .field("delivery_count", &self.delivery_count)
            .finish()
    }
}

thread_local! {
    /// Notifications this thread currently holds for delivery, by handle address.
    static IN_FLIGHT: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Shared handle to one posted notification.
///
/// Cheap to clone; clones point at the same notification.
///
/// ## Locking
/// Every accessor locks the notification. While an observer runs, the
/// notification it was handed is locked by the observer's own thread, so
/// accessors called on *that* handle from inside the observer would never
/// return; they panic instead. Use the `&mut Notification` the observer
/// received. Other threads simply wait for the delivery step to finish.
#[derive(Clone)]
pub struct NotificationRef(Arc<Mutex<Notification>>);

impl NotificationRef {
    /// Wraps a freshly built notification.
    pub fn new(notification: Notification) -> Self {
        Self(Arc::new(Mutex::new(notification)))
    }

    /// Locks the notification for reading or mutation.
    ///
    /// # Panics
    /// If the current thread is delivering this notification (see [Locking](Self#locking)).
    #[track_caller]
    pub fn lock(&self) -> MutexGuard<'_, Notification> {
        assert!(
            !self.in_flight_here(),
            "notification is being delivered on this thread; use the observer's &mut Notification"
        );
        self.0.lock()
    }

    /// Locks the notification if nobody holds it right now.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Notification>> {
        self.0.try_lock()
    }

    /// True if both handles refer to the same notification.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// True if the current thread is delivering this notification.
    pub fn in_flight_here(&self) -> bool {
        let key = self.key();
        IN_FLIGHT.with(|set| set.borrow().contains(&key))
    }

    /// Locks for one delivery step and marks the notification as in flight
    /// on this thread until the guard drops.
    ///
    /// Returns `None` if this thread is already delivering it; blocks while
    /// another thread holds it.
    pub(crate) fn lock_for_delivery(&self) -> Option<DeliveryGuard<'_>> {
        if self.in_flight_here() {
            return None;
        }
        let guard = self.0.lock();
        let key = self.key();
        IN_FLIGHT.with(|set| set.borrow_mut().push(key));
        Some(DeliveryGuard { guard, key })
    }

    fn key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// # Panics
    /// If the current thread is delivering this notification.
    #[track_caller]
    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.lock().name)
    }

    /// # Panics
    /// If the current thread is delivering this notification.
    #[track_caller]
    pub fn seq(&self) -> u64 {
        self.lock().seq
    }

    /// # Panics
    /// If the current thread is delivering this notification.
    #[track_caller]
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// # Panics
    /// If the current thread is delivering this notification.
    #[track_caller]
    pub fn delivery_count(&self) -> u32 {
        self.lock().delivery_count
    }

    /// Snapshot of the payload.
    ///
    /// # Panics
    /// If the current thread is delivering this notification.
    #[track_caller]
    pub fn info(&self) -> Value {
        self.lock().info.clone()
    }

    /// # Panics
    /// If the current thread is delivering this notification.
    #[track_caller]
    pub fn cancel(&self) {
        self.lock().cancel();
    }
}

/// Exclusive access to a notification during one delivery step.
pub(crate) struct DeliveryGuard<'a> {
    guard: MutexGuard<'a, Notification>,
    key: usize,
}

impl Deref for DeliveryGuard<'_> {
    type Target = Notification;

    fn deref(&self) -> &Notification {
        &self.guard
    }
}

impl DerefMut for DeliveryGuard<'_> {
    fn deref_mut(&mut self) -> &mut Notification {
        &mut self.guard
    }
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        IN_FLIGHT.with(|set| {
            let mut set = set.borrow_mut();
            if let Some(pos) = set.iter().rposition(|k| *k == self.key) {
                set.swap_remove(pos);
            }
        });
    }
}

impl From<Notification> for NotificationRef {
    fn from(notification: Notification) -> Self {
        Self::new(notification)
    }
}

impl fmt::Debug for NotificationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_lock() {
            Some(n) => fmt::Debug::fmt(&*n, f),
            None => f.write_str("Notification { <in delivery> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::subject::Tag;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let n = Notification::new("onFoo");
        assert_eq!(n.name(), "onFoo");
        assert!(n.object().is_none());
        assert_eq!(n.info(), &json!({}));
        assert!(!n.is_cancelled());
        assert_eq!(n.delivery_count(), 0);
    }

    #[test]
    fn test_seq_is_monotonic() {
        let a = Notification::new("a");
        let b = Notification::new("b");
        assert!(b.seq() > a.seq(), "seq must grow: {} vs {}", a.seq(), b.seq());
    }

    #[test]
    fn test_matches_class() {
        let n = Notification::new("x").with_object(Tag::arc("Order"));
        assert!(n.matches_class(None));
        assert!(n.matches_class(Some("order")));
        assert!(!n.matches_class(Some("Invoice")));

        let bare = Notification::new("x");
        assert!(bare.matches_class(None));
        assert!(!bare.matches_class(Some("Order")));
    }

    #[test]
    fn test_handle_shares_state() {
        let h = NotificationRef::new(Notification::new("x"));
        let other = h.clone();
        {
            let mut n = other.lock();
            n.info_mut()["k"] = json!(1);
            n.increase_delivery_count();
        }
        other.cancel();

        assert!(h.ptr_eq(&other));
        assert_eq!(h.info(), json!({ "k": 1 }));
        assert_eq!(h.delivery_count(), 1);
        assert!(h.is_cancelled());
    }

    #[test]
    fn test_delivery_guard_marks_in_flight() {
        let h = NotificationRef::new(Notification::new("x"));
        {
            let mut n = h.lock_for_delivery().unwrap();
            n.increase_delivery_count();
            assert!(h.in_flight_here());
            assert!(h.lock_for_delivery().is_none(), "same thread must not relock");

            let other = h.clone();
            let seen = std::thread::spawn(move || other.in_flight_here()).join().unwrap();
            assert!(!seen, "in-flight marks are per thread");
        }
        assert!(!h.in_flight_here());
        assert_eq!(h.delivery_count(), 1);
    }

    #[test]
    #[should_panic(expected = "being delivered on this thread")]
    fn test_accessor_on_in_flight_handle_panics() {
        let h = NotificationRef::new(Notification::new("x"));
        let _n = h.lock_for_delivery().unwrap();
        let _ = h.delivery_count();
    }

    #[test]
    fn test_try_lock_reports_delivery_in_progress() {
        let h = NotificationRef::new(Notification::new("x"));
        let guard = h.lock();
        assert!(h.try_lock().is_none());
        assert_eq!(format!("{h:?}"), "Notification { <in delivery> }");
        drop(guard);
        assert!(h.try_lock().is_some());
    }
}
