//! Error types used by dispatchers and the registry.
//!
//! Most dispatcher operations have no failure mode: lookups and removals of
//! things that do not exist return `false` or an empty list. [`DispatchError`]
//! covers the remaining misconfigurations, which must not be swallowed.

use thiserror::Error;

/// # Errors produced by dispatchers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The dispatcher's notification class has no registered constructor.
    #[error("dispatcher {dispatcher:?}: unknown notification class {class:?}")]
    UnknownNotificationClass {
        /// Class name configured on the dispatcher.
        class: String,
        /// Name of the dispatcher that attempted the post.
        dispatcher: String,
    },

    /// Nesting `parent` under `child` would make bubbling loop forever.
    #[error("nesting {parent:?} under {child:?} would create a cycle")]
    NestingCycle {
        /// Dispatcher that would bubble into `parent`.
        child: String,
        /// Dispatcher that was offered as a parent.
        parent: String,
    },

    /// The process-wide registry was initialized before it could be installed.
    #[error("global registry already initialized")]
    GlobalInstalled,
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use postmaster::DispatchError;
    ///
    /// let err = DispatchError::NestingCycle { child: "a".into(), parent: "a".into() };
    /// assert_eq!(err.as_label(), "dispatch_nesting_cycle");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::UnknownNotificationClass { .. } => "dispatch_unknown_class",
            DispatchError::NestingCycle { .. } => "dispatch_nesting_cycle",
            DispatchError::GlobalInstalled => "dispatch_global_installed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::UnknownNotificationClass { class, dispatcher } => {
                format!("no constructor for class={class} on dispatcher={dispatcher}")
            }
            DispatchError::NestingCycle { child, parent } => {
                format!("cycle: child={child} parent={parent}")
            }
            DispatchError::GlobalInstalled => "global registry already in use".to_string(),
        }
    }

    /// Indicates a configuration problem (as opposed to a rejected call).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            DispatchError::UnknownNotificationClass { .. } | DispatchError::GlobalInstalled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let unknown = DispatchError::UnknownNotificationClass {
            class: "Audit".into(),
            dispatcher: "orders".into(),
        };
        assert_eq!(unknown.as_label(), "dispatch_unknown_class");
        assert!(unknown.is_config());
        assert_eq!(
            unknown.as_message(),
            "no constructor for class=Audit on dispatcher=orders"
        );

        let cycle = DispatchError::NestingCycle {
            child: "a".into(),
            parent: "b".into(),
        };
        assert!(!cycle.is_config());
        assert_eq!(
            cycle.to_string(),
            "nesting \"b\" under \"a\" would create a cycle"
        );
    }
}
