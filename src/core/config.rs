//! # Global dispatcher configuration.
//!
//! Provides [`Config`], the settings a [`Registry`](crate::Registry) applies to
//! every dispatcher it creates.
//!
//! Config is used in two ways:
//! 1. **Registry creation**: `Registry::new(config)` / `Registry::builder(config)`
//! 2. **Post defaults**: `Dispatcher::post` uses [`Config::post_options`]

use crate::dispatcher::PostOptions;
use crate::notifications::DEFAULT_CLASS;

/// How the `pending` flag travels when a notification bubbles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BubblePending {
    /// Ancestors record the notification only if the original post did.
    #[default]
    Inherit,
    /// Ancestors always record the notification as pending, whatever the
    /// original post requested.
    Always,
}

impl BubblePending {
    /// The `pending` flag used when forwarding a post made with `pending`.
    #[inline]
    pub fn forward(self, pending: bool) -> bool {
        match self {
            BubblePending::Inherit => pending,
            BubblePending::Always => true,
        }
    }
}

/// Configuration shared by all dispatchers of a registry.
///
/// ## Field semantics
/// - `default_dispatcher`: name returned by `Registry::default_instance`
/// - `notification_class`: initial default notification class for new dispatchers
/// - `pending` / `bubble`: default [`PostOptions`] for `Dispatcher::post`
/// - `bubble_pending`: pending behavior at ancestors while bubbling
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the default dispatcher.
    pub default_dispatcher: String,

    /// Notification class captured by each dispatcher at creation.
    ///
    /// Can be changed later per registry
    /// (`Registry::set_default_notification_class`) or per dispatcher
    /// (`Dispatcher::set_notification_class`).
    pub notification_class: String,

    /// Record posted notifications for replay unless told otherwise.
    pub pending: bool,

    /// Forward posted notifications to nested dispatchers unless told otherwise.
    pub bubble: bool,

    /// See [`BubblePending`].
    pub bubble_pending: BubblePending,
}

impl Config {
    /// Default options for `Dispatcher::post`.
    #[inline]
    pub fn post_options(&self) -> PostOptions {
        PostOptions::new(self.pending, self.bubble)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `default_dispatcher = "__dispatcher"`
    /// - `notification_class = "Notification"` (the built-in class)
    /// - `pending = true`, `bubble = true`
    /// - `bubble_pending = BubblePending::Inherit`
    fn default() -> Self {
        Self {
            default_dispatcher: "__dispatcher".to_string(),
            notification_class: DEFAULT_CLASS.to_string(),
            pending: true,
            bubble: true,
            bubble_pending: BubblePending::default(),
        }
    }
}
