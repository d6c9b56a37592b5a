//! # Notification observers.
//!
//! This module provides the [`Observe`] trait, the [`ObserverId`] used as the
//! registration key, and built-in implementations.
//!
//! ## Delivery
//! ```text
//!   Dispatcher::post(object, name, info)
//!        │
//!        ├──► bucket[name]   ──► entry 1 ──► entry 2 ──► ...   (registration order)
//!        ├──► bucket[GLOBAL] ──► entry 1 ──► ...               (wildcard observers)
//!        └──► nested dispatchers (same notification, recursively)
//!
//!   each entry: class filter matches? ──► Observe::on_notification(&mut Notification)
//! ```
//!
//! ## Implementing custom observers
//! ```no_run
//! use postmaster::{Notification, Observe};
//!
//! struct Veto;
//!
//! impl Observe for Veto {
//!     fn on_notification(&self, n: &mut Notification) {
//!         if n.info()["forbidden"] == true {
//!             n.cancel();
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod observe;
mod observer_fn;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observe::{Observe, ObserverId, ObserverRef};
pub use observer_fn::ObserverFn;
