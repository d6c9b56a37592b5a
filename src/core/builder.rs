#[cfg(test)]
use std::sync::Arc;

use crate::core::{Config, Registry};
use crate::error::DispatchError;
use crate::notifications::NotificationFactory;

/// Builder for constructing a [`Registry`] with classes and dispatchers ready.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use serde_json::{Value, json};
/// use postmaster::{Config, Notification, Registry, SubjectRef};
///
/// let registry = Registry::builder(Config::default())
///     .with_notification_class(
///         "Audited",
///         Arc::new(|name: &str, object: Option<SubjectRef>, info: Value| {
///             Notification::new(name).with_object_opt(object).with_info(info)
///         }),
///     )
///     .with_default_notification_class("Audited")
///     .with_nesting("orders", "app")
///     .build()
///     .unwrap();
///
/// let orders = registry.get_instance("orders");
/// assert_eq!(orders.notification_class(), "Audited");
/// assert_eq!(orders.nested_dispatchers(), ["app"]);
/// ```
pub struct RegistryBuilder {
    cfg: Config,
    classes: Vec<(String, NotificationFactory)>,
    default_class: Option<String>,
    nesting: Vec<(String, String)>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            classes: Vec::new(),
            default_class: None,
            nesting: Vec::new(),
        }
    }

    /// Registers a notification class.
    pub fn with_notification_class(mut self, class: &str, factory: NotificationFactory) -> Self {
        self.classes.push((class.to_string(), factory));
        self
    }

    /// Overrides `Config::notification_class`.
    pub fn with_default_notification_class(mut self, class: &str) -> Self {
        self.default_class = Some(class.to_string());
        self
    }

    /// Creates both dispatchers and makes `child` bubble into `parent`.
    pub fn with_nesting(mut self, child: &str, parent: &str) -> Self {
        self.nesting.push((child.to_string(), parent.to_string()));
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    /// [`DispatchError::NestingCycle`] if the requested nesting loops.
    pub fn build(self) -> Result<Registry, DispatchError> {
        let registry = Registry::new(self.cfg);
        for (class, factory) in self.classes {
            registry.register_notification_class(&class, factory);
        }
        if let Some(class) = self.default_class {
            registry.set_default_notification_class(&class);
        }
        for (child, parent) in &self.nesting {
            let parent = registry.get_instance(parent);
            registry.get_instance(child).add_nested_dispatcher(&parent)?;
        }
        Ok(registry)
    }

    /// Builds the registry and installs it as [`Registry::global`].
    ///
    /// # Errors
    /// [`DispatchError::GlobalInstalled`] if the global registry was already
    /// initialized (explicitly or by a first lookup).
    pub fn install(self) -> Result<&'static Registry, DispatchError> {
        let registry = self.build()?;
        Registry::install(registry).map_err(|_| DispatchError::GlobalInstalled)
    }
}

impl From<Config> for RegistryBuilder {
    fn from(cfg: Config) -> Self {
        Self::new(cfg)
    }
}
