//! # Notification classes.
//!
//! Dispatchers build notifications through a named constructor, the
//! *notification class*. [`NotificationClasses`] maps class names
//! (case-insensitively) to [`NotificationFactory`] closures and is shared by
//! every dispatcher of a registry.
//!
//! The built-in class [`DEFAULT_CLASS`] builds a plain [`Notification`].
//! Custom classes typically pre-populate the payload:
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use serde_json::Value;
//! use postmaster::{Notification, NotificationClasses, NotificationFactory, SubjectRef};
//!
//! let classes = NotificationClasses::new();
//! let audited: NotificationFactory = Arc::new(|name: &str, object: Option<SubjectRef>, info: Value| {
//!     Notification::new(name)
//!         .with_object_opt(object)
//!         .with_info(json!({ "audited": true, "payload": info }))
//! });
//! classes.register("Audited", audited);
//!
//! assert!(classes.contains("audited"));
//! let build = classes.get("AUDITED").unwrap();
//! let n = build("onLogin", None, json!(1));
//! assert_eq!(n.info()["audited"], json!(true));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::notification::Notification;
use super::subject::SubjectRef;

/// Name of the built-in notification class.
pub const DEFAULT_CLASS: &str = "Notification";

/// Constructor used by `post` to build notifications.
///
/// Receives the notification name, the associated object and the payload.
pub type NotificationFactory =
    Arc<dyn Fn(&str, Option<SubjectRef>, Value) -> Notification + Send + Sync>;

/// Case-insensitive table of notification classes.
pub struct NotificationClasses {
    factories: RwLock<HashMap<String, NotificationFactory>>,
}

impl NotificationClasses {
    /// Creates a table holding only [`DEFAULT_CLASS`].
    pub fn new() -> Self {
        let mut factories: HashMap<String, NotificationFactory> = HashMap::new();
        factories.insert(DEFAULT_CLASS.to_ascii_lowercase(), Arc::new(plain));
        Self {
            factories: RwLock::new(factories),
        }
    }

    /// Registers (or replaces) a class.
    pub fn register(&self, class: &str, factory: NotificationFactory) {
        tracing::debug!(class, "notification class registered");
        self.factories
            .write()
            .insert(class.to_ascii_lowercase(), factory);
    }

    /// Looks up the constructor for `class`.
    pub fn get(&self, class: &str) -> Option<NotificationFactory> {
        self.factories
            .read()
            .get(&class.to_ascii_lowercase())
            .cloned()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.factories
            .read()
            .contains_key(&class.to_ascii_lowercase())
    }
}

impl Default for NotificationClasses {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort_unstable();
        f.debug_struct("NotificationClasses")
            .field("classes", &names)
            .finish()
    }
}

fn plain(name: &str, object: Option<SubjectRef>, info: Value) -> Notification {
    Notification::new(name).with_object_opt(object).with_info(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::subject::Tag;
    use serde_json::json;

    #[test]
    fn test_default_class_is_present() {
        let classes = NotificationClasses::new();
        assert!(classes.contains(DEFAULT_CLASS));
        assert!(classes.contains("notification"));
        assert!(classes.get("Missing").is_none());

        let build = classes.get(DEFAULT_CLASS).unwrap();
        let n = build("onFoo", Some(Tag::arc("Order")), json!({ "a": 1 }));
        assert_eq!(n.name(), "onFoo");
        assert_eq!(n.object_class(), Some("Order"));
        assert_eq!(n.info(), &json!({ "a": 1 }));
    }

    #[test]
    fn test_register_replaces() {
        let classes = NotificationClasses::new();
        classes.register(
            "Custom",
            Arc::new(|name: &str, _: Option<SubjectRef>, _: Value| Notification::new(name)),
        );
        classes.register(
            "CUSTOM",
            Arc::new(|name: &str, _: Option<SubjectRef>, _: Value| {
                Notification::new(name).with_info(json!("second"))
            }),
        );

        let build = classes.get("custom").unwrap();
        assert_eq!(build("x", None, json!(null)).info(), &json!("second"));
    }
}
