//! Per-post delivery options.

/// Controls how a single post is recorded and propagated.
///
/// - `pending`: retain the notification so later registrants get it replayed.
/// - `bubble`: forward the notification to nested (parent) dispatchers.
///
/// Both default to `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostOptions {
    pub pending: bool,
    pub bubble: bool,
}

impl PostOptions {
    #[inline]
    pub fn new(pending: bool, bubble: bool) -> Self {
        Self { pending, bubble }
    }

    /// Sets the `pending` flag.
    #[inline]
    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Sets the `bubble` flag.
    #[inline]
    pub fn with_bubble(mut self, bubble: bool) -> Self {
        self.bubble = bubble;
        self
    }
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            pending: true,
            bubble: true,
        }
    }
}
