//! # Dispatcher registry - name-keyed set of dispatchers.
//!
//! A [`Registry`] hands out one [`Dispatcher`] per name, creating it on first
//! lookup, and keeps it for as long as the registry lives. It also owns the
//! notification classes shared by its dispatchers and the default class new
//! dispatchers start with.
//!
//! ## Architecture
//! ```text
//! Registry
//!   ├─► dispatchers: name → Dispatcher   (lazy, one per name)
//!   ├─► classes: NotificationClasses     (shared by every dispatcher)
//!   └─► default class                    (captured by dispatchers at creation)
//! ```
//!
//! ## Rules
//! - `get_instance(name)` always returns the same dispatcher for the same name.
//! - Changing the default class only affects dispatchers created afterwards.
//! - [`Registry::global`] is a lazily initialized, process-lifetime instance;
//!   [`RegistryBuilder::install`](crate::RegistryBuilder::install) can configure
//!   it before first use and [`Registry::reset`] empties it (for tests).

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};

use crate::dispatcher::Dispatcher;
use crate::notifications::{NotificationClasses, NotificationFactory};

use super::builder::RegistryBuilder;
use super::config::Config;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Name-keyed set of dispatchers.
///
/// # Example
/// ```
/// use serde_json::json;
/// use postmaster::{Config, Registry};
///
/// let registry = Registry::new(Config::default());
/// let orders = registry.get_instance("orders");
/// assert!(orders.ptr_eq(&registry.get_instance("orders")));
///
/// let n = orders.post(None, "onCreate", json!({ "id": 1 })).unwrap();
/// assert_eq!(n.delivery_count(), 0);
/// assert_eq!(registry.names(), ["orders"]);
/// ```
pub struct Registry {
    dispatchers: Mutex<HashMap<String, Dispatcher>>,
    classes: Arc<NotificationClasses>,
    default_class: RwLock<String>,
    config: Config,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new(config: Config) -> Self {
        Self {
            dispatchers: Mutex::new(HashMap::new()),
            classes: Arc::new(NotificationClasses::new()),
            default_class: RwLock::new(config.notification_class.clone()),
            config,
        }
    }

    /// Starts a [`RegistryBuilder`].
    pub fn builder(config: Config) -> RegistryBuilder {
        RegistryBuilder::new(config)
    }

    /// The process-wide registry (default [`Config`] unless installed first).
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(|| Registry::new(Config::default()))
    }

    /// Installs `registry` as the process-wide registry.
    ///
    /// Returns it back if the global registry was already initialized.
    pub(crate) fn install(registry: Registry) -> Result<&'static Registry, Registry> {
        GLOBAL_REGISTRY.set(registry)?;
        Ok(Self::global())
    }

    /// Returns the dispatcher called `name`, creating it on first access.
    pub fn get_instance(&self, name: &str) -> Dispatcher {
        let mut dispatchers = self.dispatchers.lock();
        if let Some(existing) = dispatchers.get(name) {
            return existing.clone();
        }

        let class = self.default_class.read().clone();
        let dispatcher = Dispatcher::new(name, &self.config, class, Arc::clone(&self.classes));
        dispatchers.insert(name.to_string(), dispatcher.clone());
        drop(dispatchers);

        tracing::debug!(dispatcher = name, "dispatcher created");
        dispatcher
    }

    /// Returns the dispatcher named by `Config::default_dispatcher`.
    pub fn default_instance(&self) -> Dispatcher {
        self.get_instance(&self.config.default_dispatcher)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dispatchers.lock().contains_key(name)
    }

    /// Returns sorted list of dispatcher names.
    pub fn names(&self) -> Vec<String> {
        let dispatchers = self.dispatchers.lock();
        let mut names: Vec<String> = dispatchers.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.dispatchers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatchers.lock().is_empty()
    }

    /// Forgets every dispatcher; later lookups create fresh ones.
    ///
    /// Handles obtained earlier keep working but are no longer reachable by name.
    /// Returns how many dispatchers were dropped.
    pub fn reset(&self) -> usize {
        let dropped = {
            let mut dispatchers = self.dispatchers.lock();
            let n = dispatchers.len();
            dispatchers.clear();
            n
        };
        tracing::debug!(dropped, "registry reset");
        dropped
    }

    /// Registers (or replaces) a notification class for every dispatcher.
    pub fn register_notification_class(&self, class: &str, factory: NotificationFactory) {
        self.classes.register(class, factory);
    }

    /// Sets the class that dispatchers created from now on start with.
    pub fn set_default_notification_class(&self, class: &str) {
        *self.default_class.write() = class.to_string();
        tracing::debug!(class, "default notification class set");
    }

    pub fn default_notification_class(&self) -> String {
        self.default_class.read().clone()
    }

    pub fn classes(&self) -> &NotificationClasses {
        &self.classes
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{Notification, SubjectRef};
    use serde_json::{Value, json};

    #[test]
    fn test_get_instance_is_lazy_and_stable() {
        let reg = Registry::default();
        assert!(reg.is_empty());
        assert!(!reg.contains("a"));

        let a = reg.get_instance("a");
        let again = reg.get_instance("a");
        let b = reg.get_instance("b");
        assert!(a.ptr_eq(&again));
        assert!(!a.ptr_eq(&b));
        assert_eq!(reg.names(), ["a", "b"]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_default_instance() {
        let reg = Registry::default();
        assert_eq!(reg.default_instance().name(), "__dispatcher");
        assert!(reg.contains("__dispatcher"));
    }

    #[test]
    fn test_default_class_applies_to_new_dispatchers_only() {
        let reg = Registry::default();
        let before = reg.get_instance("before");
        reg.register_notification_class(
            "Tagged",
            Arc::new(|name: &str, _: Option<SubjectRef>, _: Value| {
                Notification::new(name).with_info(json!("tagged"))
            }),
        );
        reg.set_default_notification_class("Tagged");
        let after = reg.get_instance("after");

        assert_eq!(reg.default_notification_class(), "Tagged");
        assert_eq!(before.notification_class(), "Notification");
        assert_eq!(after.notification_class(), "Tagged");
        assert_eq!(after.post(None, "x", json!({})).unwrap().info(), json!("tagged"));
        assert_eq!(before.post(None, "x", json!({})).unwrap().info(), json!({}));
    }

    #[test]
    fn test_reset_forgets_dispatchers() {
        let reg = Registry::default();
        let old = reg.get_instance("a");
        assert_eq!(reg.reset(), 1);
        assert!(reg.is_empty());
        assert!(!old.ptr_eq(&reg.get_instance("a")));
    }

    #[test]
    fn test_global_shorthand() {
        let via_registry = Registry::global().get_instance("registry-test-global");
        let via_dispatcher = Dispatcher::get_instance("registry-test-global");
        assert!(via_registry.ptr_eq(&via_dispatcher));
    }
}
