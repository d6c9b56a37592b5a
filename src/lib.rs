//! # postmaster
//!
//! **Postmaster** is an in-process notification dispatcher for Rust.
//!
//! Producers post named *notifications* carrying an associated object and a
//! JSON payload; observers register by notification name and an optional
//! object-class filter. A [`Dispatcher`] delivers matching notifications
//! synchronously, in registration order. Dispatchers are named, created on
//! demand by a [`Registry`], and can be nested so that notifications posted
//! to a child also reach its ancestors ("bubbling").
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer ──► Registry::get_instance("orders") ──► Dispatcher "orders"
//!                                                         │
//!        post(object, "onCreate", info)                   │
//!                 │                                       │
//!                 ▼                                       ▼
//!        NotificationClasses ──► Notification ──► NotificationRef (one per post)
//!                                                         │
//! ┌───────────────────────────────────────────────────────┴──────────────────┐
//! │ Dispatcher "orders"                                                      │
//! │  1. pending["onCreate"].push(n)             (if pending)                 │
//! │  2. bucket["onCreate"]: O1 ─► O2 ─► ...     (class filter, cancellation) │
//! │  3. bucket[GLOBAL]:     G1 ─► ...                                        │
//! └───────────────────────────────────────────────────────┬──────────────────┘
//!                                                         │ (if bubble, not cancelled)
//!                                                         ▼
//!                              nested Dispatcher "app" ── same steps, same n
//!                                                         │
//!                                                         ▼
//!                                               returned to the producer
//! ```
//!
//! ### Late registrants
//! ```text
//! post(n, pending=true) ──► pending[name] = [n, ...]
//!
//! add_observer(id, O, name, class)
//!   ├─► bucket[name][id] = O          (replaces an existing id in place)
//!   └─► for p in pending[name]:  !p.cancelled && class matches ─► O(&mut p)
//! ```
//!
//! ## Features
//! | Area               | Description                                                  | Key types / traits                         |
//! |--------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Dispatching**    | Register, match, deliver, cancel and bubble notifications.   | [`Dispatcher`], [`PostOptions`], [`GLOBAL`] |
//! | **Observers**      | Plug in handlers as trait objects or closures.               | [`Observe`], [`ObserverFn`], [`ObserverId`] |
//! | **Notifications**  | Shared event record, class-tagged objects, custom classes.   | [`Notification`], [`NotificationRef`], [`Subject`] |
//! | **Registry**       | Name-keyed dispatchers, process-wide instance, setup builder. | [`Registry`], [`RegistryBuilder`]          |
//! | **Configuration**  | Post defaults and bubbling behavior.                         | [`Config`], [`BubblePending`]              |
//! | **Errors**         | Typed configuration errors.                                  | [`DispatchError`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] observer _(demo/reference only)_.
//!
//! ## Logging
//! Dispatchers emit [`tracing`] events (`debug` for registration and
//! nesting changes, `trace` for each delivery). Install any subscriber to
//! see them.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use postmaster::{Config, GLOBAL, Notification, ObserverFn, Registry, Tag};
//!
//! let registry = Registry::new(Config::default());
//! let orders = registry.get_instance("orders");
//! let app = registry.get_instance("app");
//! orders.add_nested_dispatcher(&app).unwrap();
//!
//! orders.add_observer(
//!     "mark-x",
//!     ObserverFn::arc("mark-x", |n: &mut Notification| {
//!         n.info_mut()["trace"].as_array_mut().unwrap().push(json!("x"));
//!     }),
//!     "onFoo",
//!     None,
//! );
//! app.add_observer(
//!     "mark-y",
//!     ObserverFn::arc("mark-y", |n: &mut Notification| {
//!         n.info_mut()["trace"].as_array_mut().unwrap().push(json!("y"));
//!     }),
//!     "onFoo",
//!     None,
//! );
//!
//! let n = orders
//!     .post(Some(Tag::arc("Order")), "onFoo", json!({ "trace": [] }))
//!     .unwrap();
//!
//! assert_eq!(n.info()["trace"], json!(["x", "y"]));
//! assert_eq!(n.delivery_count(), 2);
//! assert!(orders.observers(GLOBAL, None).is_empty());
//! ```
mod core;
mod dispatcher;
mod error;
mod notifications;
mod observers;

// ---- Public re-exports ----

pub use crate::core::{BubblePending, Config, Registry, RegistryBuilder};
pub use dispatcher::{Dispatcher, GLOBAL, PostOptions};
pub use error::DispatchError;
pub use notifications::{
    DEFAULT_CLASS, Notification, NotificationClasses, NotificationFactory, NotificationRef,
    Subject, SubjectRef, Tag,
};
pub use observers::{Observe, ObserverFn, ObserverId, ObserverRef};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
