//! Registry core: configuration and the name-keyed dispatcher set.
//!
//! Internal modules:
//! - [`config`]: defaults applied to every dispatcher a registry creates;
//! - [`registry`]: lazy, name-keyed dispatchers and shared notification classes;
//! - [`builder`]: one-shot setup of classes, nesting and the global registry.

mod builder;
mod config;
mod registry;

pub use builder::RegistryBuilder;
pub use config::{BubblePending, Config};
pub use registry::Registry;
