//! # Dispatcher: matches posted notifications to observers.
//!
//! A [`Dispatcher`] owns a registration table, a pending store, a set of
//! nested (parent) dispatchers and the name of the notification class it uses
//! to build notifications on [`post`](Dispatcher::post).
//!
//! ## Post algorithm
//! ```text
//! post_notification(n, opts)
//!   ├─► opts.pending?  pending[n.name].push(n)    (same lock as the snapshot below)
//!   ├─► for entry in snapshot(bucket[n.name]):  cancelled? ──► return n
//!   │                                          class ok?  ──► observer(&mut n), n.deliveries += 1
//!   ├─► for entry in snapshot(bucket[GLOBAL]):  (same)
//!   ├─► !opts.bubble? ──► return n
//!   └─► for parent in nested:  cancelled? ──► return n
//!                              n = parent.post_notification(n, forwarded opts)
//! ```
//!
//! ## Rules
//! - Delivery is synchronous and in registration order.
//! - Cancellation is checked before each observer, so the observer that
//!   cancels still completes.
//! - No dispatcher lock is held while observers run; observers may register,
//!   remove or post re-entrantly.
//! - A notification is locked by one thread at a time for each delivery step.
//! - The same [`NotificationRef`] travels through every level and is returned.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::core::{BubblePending, Config, Registry};
use crate::error::DispatchError;
use crate::notifications::{NotificationClasses, NotificationRef, SubjectRef};
use crate::observers::{ObserverId, ObserverRef};

use super::options::PostOptions;
use super::pending::PendingStore;
use super::table::{Entry, GLOBAL, RegistrationTable};

/// Named notification dispatcher.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    name: Arc<str>,
    state: RwLock<State>,
    classes: Arc<NotificationClasses>,
    defaults: PostOptions,
    bubble_pending: BubblePending,
}

struct State {
    registrations: RegistrationTable,
    pending: PendingStore,
    nested: IndexMap<Arc<str>, Dispatcher>,
    notification_class: String,
}

impl Dispatcher {
    pub(crate) fn new(
        name: &str,
        cfg: &Config,
        notification_class: String,
        classes: Arc<NotificationClasses>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: Arc::from(name),
                state: RwLock::new(State {
                    registrations: RegistrationTable::default(),
                    pending: PendingStore::default(),
                    nested: IndexMap::new(),
                    notification_class,
                }),
                classes,
                defaults: cfg.post_options(),
                bubble_pending: cfg.bubble_pending,
            }),
        }
    }

    /// Returns the process-wide dispatcher called `name`, creating it on first use.
    ///
    /// Shorthand for `Registry::global().get_instance(name)`.
    pub fn get_instance(name: &str) -> Dispatcher {
        Registry::global().get_instance(name)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// True if both handles refer to the same dispatcher.
    pub fn ptr_eq(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers `observer` under `id` for notifications called `name`.
    ///
    /// - `name = GLOBAL` observes every notification.
    /// - `class` restricts delivery to notifications whose object has that class tag.
    /// - An existing registration with the same `id` in the same bucket is replaced.
    ///
    /// Every pending notification called `name` that is not cancelled and
    /// passes the filter is delivered to `observer` right away, oldest first.
    /// A pending notification another thread is delivering is replayed once
    /// that delivery step ends; one this thread is delivering (registration
    /// from inside an observer) is skipped.
    pub fn add_observer(
        &self,
        id: impl Into<ObserverId>,
        observer: ObserverRef,
        name: &str,
        class: Option<&str>,
    ) {
        let entry = Entry::new(id.into(), observer, class);
        let (replaced, pending) = {
            let mut st = self.inner.state.write();
            let replaced = st.registrations.insert(name, entry.clone());
            (replaced, st.pending.snapshot(name))
        };
        tracing::debug!(
            dispatcher = %self.inner.name,
            observer = %entry.id,
            notification = name,
            class = entry.class.as_deref(),
            replaced,
            "observer registered"
        );

        for handle in pending {
            // Blocks while another thread delivers it; skipped if this thread is.
            let Some(mut n) = handle.lock_for_delivery() else {
                tracing::trace!(
                    dispatcher = %self.inner.name,
                    observer = %entry.id,
                    "pending notification in delivery on this thread; replay skipped"
                );
                continue;
            };
            if n.is_cancelled() || !n.matches_class(entry.class.as_deref()) {
                continue;
            }
            entry.observer.on_notification(&mut n);
            n.increase_delivery_count();
        }
    }

    /// Removes the registration `id` from `name`'s bucket.
    ///
    /// With a `class`, only a registration stored with that filter is removed.
    /// Returns `false` if nothing matched.
    pub fn remove_observer(&self, id: &str, name: &str, class: Option<&str>) -> bool {
        let removed = self
            .inner
            .state
            .write()
            .registrations
            .remove(name, id, class);
        if removed {
            tracing::debug!(
                dispatcher = %self.inner.name,
                observer = id,
                notification = name,
                "observer removed"
            );
        }
        removed
    }

    /// True if [`remove_observer`](Self::remove_observer) with the same
    /// arguments would remove something.
    pub fn observer_registered(&self, id: &str, name: &str, class: Option<&str>) -> bool {
        self.inner
            .state
            .read()
            .registrations
            .contains(name, id, class)
    }

    /// Identities registered for `name`, in delivery order.
    ///
    /// Entries without a stored filter are always listed; with a `class`, filtered
    /// entries are listed only if their filter equals it.
    pub fn observers(&self, name: &str, class: Option<&str>) -> Vec<ObserverId> {
        self.inner.state.read().registrations.ids(name, class)
    }

    // ---------------------------
    // Posting
    // ---------------------------

    /// Builds a notification with this dispatcher's notification class and
    /// posts it with the registry's default [`PostOptions`].
    ///
    /// # Errors
    /// [`DispatchError::UnknownNotificationClass`] if the class has no constructor.
    pub fn post(
        &self,
        object: Option<SubjectRef>,
        name: &str,
        info: Value,
    ) -> Result<NotificationRef, DispatchError> {
        self.post_with(object, name, info, self.inner.defaults)
    }

    /// Like [`post`](Self::post) with explicit options.
    pub fn post_with(
        &self,
        object: Option<SubjectRef>,
        name: &str,
        info: Value,
        options: PostOptions,
    ) -> Result<NotificationRef, DispatchError> {
        let class = self.notification_class();
        let Some(build) = self.inner.classes.get(&class) else {
            tracing::warn!(
                dispatcher = %self.inner.name,
                class = %class,
                "no constructor for notification class"
            );
            return Err(DispatchError::UnknownNotificationClass {
                class,
                dispatcher: self.inner.name.to_string(),
            });
        };

        let notification = NotificationRef::new(build(name, object, info));
        Ok(self.post_notification(notification, options))
    }

    /// Delivers an existing notification, then bubbles it to nested dispatchers.
    ///
    /// Returns the same handle after every reachable observer has run.
    ///
    /// The named bucket runs first, then the [`GLOBAL`] bucket. A notification
    /// whose name is `GLOBAL` goes through the wildcard bucket once, so each
    /// wildcard observer sees it once.
    ///
    /// Posting a handle from inside one of its own observers delivers nothing
    /// and returns it unchanged.
    pub fn post_notification(
        &self,
        notification: NotificationRef,
        options: PostOptions,
    ) -> NotificationRef {
        if notification.in_flight_here() {
            tracing::warn!(
                dispatcher = %self.inner.name,
                "notification re-posted from its own observer; ignored"
            );
            return notification;
        }
        let name = notification.name();
        // One lock for both: a concurrent add_observer either replays this
        // notification or is in the snapshot, never both.
        let named = {
            let mut st = self.inner.state.write();
            if options.pending {
                st.pending.record(Arc::clone(&name), notification.clone());
            }
            st.registrations.snapshot(&name)
        };
        tracing::trace!(
            dispatcher = %self.inner.name,
            notification = %name,
            pending = options.pending,
            bubble = options.bubble,
            "posting"
        );

        if !self.deliver(named, &notification) {
            return notification;
        }
        if &*name != GLOBAL {
            let wildcard = self.inner.state.read().registrations.snapshot(GLOBAL);
            if !self.deliver(wildcard, &notification) {
                return notification;
            }
        }
        if !options.bubble {
            return notification;
        }

        let parents: Vec<Dispatcher> = self.inner.state.read().nested.values().cloned().collect();
        let forwarded = PostOptions::new(self.inner.bubble_pending.forward(options.pending), true);
        let mut notification = notification;
        for parent in parents {
            if notification.is_cancelled() {
                tracing::debug!(
                    dispatcher = %self.inner.name,
                    notification = %name,
                    parent = %parent.inner.name,
                    "cancelled; bubbling stopped"
                );
                break;
            }
            notification = parent.post_notification(notification, forwarded);
        }
        notification
    }

    /// Runs one bucket snapshot; returns `false` if delivery stopped.
    fn deliver(&self, entries: Vec<Entry>, notification: &NotificationRef) -> bool {
        for entry in entries {
            let Some(mut n) = notification.lock_for_delivery() else {
                return false;
            };
            if n.is_cancelled() {
                tracing::debug!(
                    dispatcher = %self.inner.name,
                    notification = n.name(),
                    skipped_observer = %entry.id,
                    "cancelled; delivery stopped"
                );
                return false;
            }
            if n.matches_class(entry.class.as_deref()) {
                tracing::trace!(
                    dispatcher = %self.inner.name,
                    notification = n.name(),
                    observer = %entry.id,
                    handler = entry.observer.name(),
                    "delivering"
                );
                entry.observer.on_notification(&mut n);
                n.increase_delivery_count();
            }
        }
        true
    }

    // ---------------------------
    // Pending store
    // ---------------------------

    /// Pending notifications called `name`, oldest first.
    pub fn pending(&self, name: &str) -> Vec<NotificationRef> {
        self.inner.state.read().pending.snapshot(name)
    }

    /// Number of pending notifications across all names.
    pub fn pending_len(&self) -> usize {
        self.inner.state.read().pending.len()
    }

    /// Drops pending notifications called `name` (or all, with `None`).
    ///
    /// Returns how many were dropped.
    pub fn clear_pending(&self, name: Option<&str>) -> usize {
        let cleared = self.inner.state.write().pending.clear(name);
        tracing::debug!(
            dispatcher = %self.inner.name,
            notification = name,
            cleared,
            "pending notifications cleared"
        );
        cleared
    }

    // ---------------------------
    // Nesting
    // ---------------------------

    /// Makes `parent` receive every notification that bubbles out of this dispatcher.
    ///
    /// Nested dispatchers are keyed by name; adding another dispatcher with
    /// the same name replaces the previous one.
    ///
    /// # Errors
    /// [`DispatchError::NestingCycle`] if `parent` is this dispatcher or
    /// already bubbles into it.
    pub fn add_nested_dispatcher(&self, parent: &Dispatcher) -> Result<(), DispatchError> {
        if parent.ptr_eq(self) || parent.bubbles_into(self) {
            return Err(DispatchError::NestingCycle {
                child: self.inner.name.to_string(),
                parent: parent.inner.name.to_string(),
            });
        }

        let replaced = self
            .inner
            .state
            .write()
            .nested
            .insert(Arc::clone(&parent.inner.name), parent.clone())
            .is_some();
        tracing::debug!(
            dispatcher = %self.inner.name,
            parent = %parent.inner.name,
            replaced,
            "nested dispatcher added"
        );
        Ok(())
    }

    /// Removes a nested dispatcher by handle or by name.
    ///
    /// Returns `false` if no nested dispatcher had that name.
    pub fn remove_nested_dispatcher(&self, parent: impl AsRef<str>) -> bool {
        let parent = parent.as_ref();
        let removed = self
            .inner
            .state
            .write()
            .nested
            .shift_remove(parent)
            .is_some();
        if removed {
            tracing::debug!(dispatcher = %self.inner.name, parent, "nested dispatcher removed");
        }
        removed
    }

    /// Names of the nested dispatchers, in bubbling order.
    pub fn nested_dispatchers(&self) -> Vec<String> {
        self.inner
            .state
            .read()
            .nested
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    /// True if a post here (with bubbling) can reach `target`.
    fn bubbles_into(&self, target: &Dispatcher) -> bool {
        let parents: Vec<Dispatcher> = self.inner.state.read().nested.values().cloned().collect();
        parents
            .iter()
            .any(|p| p.ptr_eq(target) || p.bubbles_into(target))
    }

    // ---------------------------
    // Notification class
    // ---------------------------

    /// Selects the notification class used by [`post`](Self::post).
    ///
    /// The class is resolved at post time; an unknown class makes `post` fail.
    pub fn set_notification_class(&self, class: &str) {
        self.inner.state.write().notification_class = class.to_string();
        tracing::debug!(dispatcher = %self.inner.name, class, "notification class set");
    }

    pub fn notification_class(&self) -> String {
        self.inner.state.read().notification_class.clone()
    }
}

impl AsRef<str> for Dispatcher {
    fn as_ref(&self) -> &str {
        &self.inner.name
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.inner.state.read();
        f.debug_struct("Dispatcher")
            .field("name", &self.inner.name)
            .field("notification_class", &st.notification_class)
            .field("pending", &st.pending.len())
            .field("nested", &st.nested.keys().collect::<Vec<_>>())
            .finish()
    }
}
