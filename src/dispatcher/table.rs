//! # Registration table.
//!
//! Maps a notification name to an ordered bucket of registrations. The
//! [`GLOBAL`] name is the wildcard bucket whose observers see every
//! notification.
//!
//! ## Rules
//! - Within a bucket, insertion order is delivery order.
//! - Re-registering an [`ObserverId`] in a bucket replaces the entry **in place**
//!   (its position does not change).
//! - Removing an entry does not reorder the rest; a bucket that becomes empty
//!   is dropped from the table.
//! - Class filters compare ASCII case-insensitively; an empty filter is no filter.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::observers::{ObserverId, ObserverRef};

/// Wildcard notification name.
pub const GLOBAL: &str = "";

/// One registration.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) id: ObserverId,
    pub(crate) observer: ObserverRef,
    pub(crate) class: Option<Arc<str>>,
}

impl Entry {
    pub(crate) fn new(id: ObserverId, observer: ObserverRef, class: Option<&str>) -> Self {
        Self {
            id,
            observer,
            class: normalize_class(class).map(Arc::from),
        }
    }
}

/// Treats `Some("")` as "no filter".
#[inline]
fn normalize_class(class: Option<&str>) -> Option<&str> {
    class.filter(|c| !c.is_empty())
}

#[derive(Default)]
pub(crate) struct RegistrationTable {
    buckets: HashMap<Arc<str>, IndexMap<ObserverId, Entry>>,
}

impl RegistrationTable {
    /// Inserts or replaces an entry; returns true if it replaced one.
    pub(crate) fn insert(&mut self, name: &str, entry: Entry) -> bool {
        self.buckets
            .entry(Arc::from(name))
            .or_default()
            .insert(entry.id.clone(), entry)
            .is_some()
    }

    /// Removes the entry for `id` if the query filter accepts it.
    pub(crate) fn remove(&mut self, name: &str, id: &str, class: Option<&str>) -> bool {
        let Some(bucket) = self.buckets.get_mut(name) else {
            return false;
        };
        let accepted = bucket
            .get(id)
            .is_some_and(|entry| query_matches(class, entry.class.as_deref()));
        if !accepted {
            return false;
        }

        bucket.shift_remove(id);
        if bucket.is_empty() {
            self.buckets.remove(name);
        }
        true
    }

    /// Same matching rule as [`remove`](Self::remove), without side effects.
    pub(crate) fn contains(&self, name: &str, id: &str, class: Option<&str>) -> bool {
        self.buckets
            .get(name)
            .and_then(|bucket| bucket.get(id))
            .is_some_and(|entry| query_matches(class, entry.class.as_deref()))
    }

    /// Identities in `name`'s bucket compatible with `class`.
    ///
    /// Unlike lookups, an entry with no stored filter is listed for any query.
    pub(crate) fn ids(&self, name: &str, class: Option<&str>) -> Vec<ObserverId> {
        let class = normalize_class(class);
        self.buckets
            .get(name)
            .map(|bucket| {
                bucket
                    .values()
                    .filter(|entry| match (class, entry.class.as_deref()) {
                        (None, _) | (_, None) => true,
                        (Some(query), Some(stored)) => query.eq_ignore_ascii_case(stored),
                    })
                    .map(|entry| entry.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copy of a bucket, in delivery order.
    pub(crate) fn snapshot(&self, name: &str) -> Vec<Entry> {
        self.buckets
            .get(name)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn has_bucket(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }
}

/// Lookup rule shared by removal and `observer_registered`.
fn query_matches(query: Option<&str>, stored: Option<&str>) -> bool {
    match normalize_class(query) {
        None => true,
        Some(query) => stored.is_some_and(|stored| query.eq_ignore_ascii_case(stored)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Notification;
    use crate::observers::ObserverFn;

    fn entry(id: &str, class: Option<&str>) -> Entry {
        Entry::new(
            ObserverId::from(id),
            ObserverFn::arc("noop", |_: &mut Notification| {}),
            class,
        )
    }

    fn order(table: &RegistrationTable, name: &str) -> Vec<String> {
        table
            .snapshot(name)
            .into_iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    #[test]
    fn test_insert_preserves_order_and_replaces_in_place() {
        let mut t = RegistrationTable::default();
        assert!(!t.insert("onFoo", entry("a", None)));
        assert!(!t.insert("onFoo", entry("b", None)));
        assert!(!t.insert("onFoo", entry("c", None)));
        assert!(t.insert("onFoo", entry("a", Some("Order"))));

        assert_eq!(order(&t, "onFoo"), ["a", "b", "c"]);
        assert_eq!(t.snapshot("onFoo")[0].class.as_deref(), Some("Order"));
    }

    #[test]
    fn test_remove_keeps_order_and_drops_empty_bucket() {
        let mut t = RegistrationTable::default();
        t.insert("onFoo", entry("a", None));
        t.insert("onFoo", entry("b", None));
        t.insert("onFoo", entry("c", None));

        assert!(t.remove("onFoo", "b", None));
        assert_eq!(order(&t, "onFoo"), ["a", "c"]);
        assert!(!t.remove("onFoo", "b", None), "second removal must fail");

        assert!(t.remove("onFoo", "a", None));
        assert!(t.remove("onFoo", "c", None));
        assert!(!t.has_bucket("onFoo"), "empty bucket must be dropped");
    }

    #[test]
    fn test_remove_respects_filter() {
        let mut t = RegistrationTable::default();
        t.insert("onFoo", entry("a", Some("Order")));
        t.insert("onFoo", entry("b", None));

        assert!(!t.remove("onFoo", "a", Some("Invoice")));
        assert!(!t.remove("onFoo", "b", Some("Order")));
        assert!(t.contains("onFoo", "a", Some("ORDER")));
        assert!(t.contains("onFoo", "a", Some("")));
        assert!(t.remove("onFoo", "a", Some("order")));
        assert!(!t.contains("onFoo", "a", None));
    }

    #[test]
    fn test_ids_filtering() {
        let mut t = RegistrationTable::default();
        t.insert(GLOBAL, entry("order", Some("Order")));
        t.insert(GLOBAL, entry("any", None));
        t.insert(GLOBAL, entry("invoice", Some("Invoice")));

        assert_eq!(t.ids(GLOBAL, None), ["order", "any", "invoice"]);
        assert_eq!(t.ids(GLOBAL, Some("order")), ["order", "any"]);
        assert!(t.ids("missing", None).is_empty());
    }

    #[test]
    fn test_empty_class_is_no_filter() {
        let e = entry("a", Some(""));
        assert!(e.class.is_none());
    }
}
