//! # Associated objects.
//!
//! Every notification may carry the object that produced it. Dispatchers never
//! inspect that object beyond its [`Subject::class_name`], which is compared
//! (ASCII case-insensitively) against the class filter of each registration.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type tag capability for objects attached to notifications.
///
/// # Example
/// ```
/// use std::any::Any;
/// use postmaster::Subject;
///
/// struct Order { id: u64 }
///
/// impl Subject for Order {
///     fn class_name(&self) -> &str { "Order" }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let order = Order { id: 7 };
/// let subject: &dyn Subject = &order;
/// assert_eq!(subject.class_name(), "Order");
/// assert_eq!(subject.downcast_ref::<Order>().map(|o| o.id), Some(7));
/// ```
pub trait Subject: Send + Sync + 'static {
    /// Class tag matched against registration class filters.
    fn class_name(&self) -> &str;

    /// Access to the concrete value, for observers that need more than the tag.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to an associated object.
pub type SubjectRef = Arc<dyn Subject>;

impl dyn Subject {
    /// Returns the concrete object if it is a `T`.
    pub fn downcast_ref<T: Subject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// True if the class tag equals `class`, ignoring ASCII case.
    #[inline]
    pub fn is_class(&self, class: &str) -> bool {
        self.class_name().eq_ignore_ascii_case(class)
    }
}

impl fmt::Debug for dyn Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subject").field(&self.class_name()).finish()
    }
}

/// Object that is nothing but a class tag.
///
/// Handy for producers that have no domain value to attach but still want
/// class-filtered observers to see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(pub String);

impl Tag {
    /// Creates a tag object wrapped in a [`SubjectRef`].
    pub fn arc(class: impl Into<String>) -> SubjectRef {
        Arc::new(Tag(class.into()))
    }
}

impl Subject for Tag {
    fn class_name(&self) -> &str {
        &self.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Invoice;

    impl Subject for Invoice {
        fn class_name(&self) -> &str {
            "Invoice"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_is_class_ignores_ascii_case() {
        let s: SubjectRef = Arc::new(Invoice);
        assert!(s.is_class("invoice"));
        assert!(s.is_class("INVOICE"));
        assert!(!s.is_class("Invoices"));
    }

    #[test]
    fn test_downcast() {
        let s: SubjectRef = Arc::new(Invoice);
        assert!(s.downcast_ref::<Invoice>().is_some());
        assert!(s.downcast_ref::<Tag>().is_none());

        let t = Tag::arc("Widget");
        assert_eq!(t.downcast_ref::<Tag>(), Some(&Tag("Widget".into())));
        assert_eq!(format!("{t:?}"), "Subject(\"Widget\")");
    }
}
