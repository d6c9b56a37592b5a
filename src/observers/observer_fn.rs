//! # Function-backed observer (`ObserverFn`)
//!
//! [`ObserverFn`] wraps a closure `F: Fn(&mut Notification)` so ad-hoc
//! callbacks can be registered without declaring a type. If the closure needs
//! state, capture it explicitly (`Arc<Mutex<..>>`, atomics).
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use postmaster::{Notification, Observe, ObserverFn, ObserverRef};
//!
//! let stamp: ObserverRef = ObserverFn::arc("stamp", |n: &mut Notification| {
//!     n.info_mut()["stamped"] = json!(true);
//! });
//!
//! let mut n = Notification::new("onSave");
//! stamp.on_notification(&mut n);
//! assert_eq!(n.info()["stamped"], json!(true));
//! assert_eq!(stamp.name(), "stamp");
//! ```

use std::sync::Arc;

use crate::notifications::Notification;
use crate::observers::observe::Observe;

/// Function-backed observer implementation.
#[derive(Debug)]
pub struct ObserverFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(&mut Notification) + Send + Sync + 'static,
{
    /// Creates a new function-backed observer.
    ///
    /// Prefer [`ObserverFn::arc`] when you immediately need an
    /// [`ObserverRef`](crate::ObserverRef).
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the observer and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Observe for ObserverFn<F>
where
    F: Fn(&mut Notification) + Send + Sync + 'static,
{
    fn on_notification(&self, notification: &mut Notification) {
        (self.f)(notification)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
