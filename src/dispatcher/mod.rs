//! Dispatchers: registration, matching, delivery and bubbling.
//!
//! ## Contents
//! - [`Dispatcher`] the mediator; owns its registration table, pending store and nested set
//! - [`PostOptions`] per-post `pending` / `bubble` flags
//! - [`GLOBAL`] the wildcard notification name
//!
//! Internal modules:
//! - `table`: ordered registration buckets and class-filter rules;
//! - `pending`: retained notifications for late registrants.

#[allow(clippy::module_inception)]
mod dispatcher;
mod options;
mod pending;
mod table;

pub use dispatcher::Dispatcher;
pub use options::PostOptions;
pub use table::GLOBAL;
