//! Notification data model.
//!
//! ## Contents
//! - [`Notification`], [`NotificationRef`] one event occurrence and its shared handle
//! - [`Subject`], [`SubjectRef`], [`Tag`] class-tagged associated objects
//! - [`NotificationClasses`], [`NotificationFactory`] named notification constructors

mod factory;
mod notification;
mod subject;

pub use factory::{DEFAULT_CLASS, NotificationClasses, NotificationFactory};
pub use notification::{Notification, NotificationRef};
pub use subject::{Subject, SubjectRef, Tag};
