//! # Pending notification store.
//!
//! Keeps every notification posted with `pending = true`, keyed by name, so
//! observers registering later can be replayed past events. Nothing expires on
//! its own; entries leave only through explicit pruning.

use std::collections::HashMap;
use std::sync::Arc;

use crate::notifications::NotificationRef;

#[derive(Default)]
pub(crate) struct PendingStore {
    by_name: HashMap<Arc<str>, Vec<NotificationRef>>,
}

impl PendingStore {
    pub(crate) fn record(&mut self, name: Arc<str>, notification: NotificationRef) {
        self.by_name.entry(name).or_default().push(notification);
    }

    /// Pending notifications for `name`, oldest first.
    pub(crate) fn snapshot(&self, name: &str) -> Vec<NotificationRef> {
        self.by_name.get(name).cloned().unwrap_or_default()
    }

    /// Drops pending notifications for `name`, or all of them; returns how many.
    pub(crate) fn clear(&mut self, name: Option<&str>) -> usize {
        match name {
            Some(name) => self.by_name.remove(name).map_or(0, |v| v.len()),
            None => self.by_name.drain().map(|(_, v)| v.len()).sum(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Notification;

    fn handle(name: &str) -> NotificationRef {
        NotificationRef::new(Notification::new(name))
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut store = PendingStore::default();
        let first = handle("onFoo");
        let second = handle("onFoo");
        store.record(first.name(), first.clone());
        store.record(second.name(), second.clone());
        store.record(Arc::from("onBar"), handle("onBar"));

        let snap = store.snapshot("onFoo");
        assert_eq!(snap.len(), 2);
        assert!(snap[0].ptr_eq(&first));
        assert!(snap[1].ptr_eq(&second));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut store = PendingStore::default();
        store.record(Arc::from("a"), handle("a"));
        store.record(Arc::from("a"), handle("a"));
        store.record(Arc::from("b"), handle("b"));

        assert_eq!(store.clear(Some("missing")), 0);
        assert_eq!(store.clear(Some("a")), 2);
        assert!(store.snapshot("a").is_empty());
        assert_eq!(store.clear(None), 1);
        assert_eq!(store.len(), 0);
    }
}
