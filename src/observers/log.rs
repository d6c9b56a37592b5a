//! # LogWriter — simple notification printer
//!
//! A minimal observer that prints every notification it receives to stdout.
//! Register it on the wildcard name to trace a whole dispatcher. Use it for
//! tests or demos.
//!
//! ## Example output
//! ```text
//! [notified] seq=3 name="onSave" object=Some("Document") deliveries=0 info={"path":"/tmp/a"}
//! [notified] seq=4 name="onClose" object=None deliveries=2 info={}
//! [notified-cancelled] seq=5 name="onQuit" object=None deliveries=1
//! ```

use crate::notifications::Notification;
use crate::observers::Observe;

/// Notification writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn line(n: &Notification) -> String {
        if n.is_cancelled() {
            format!(
                "[notified-cancelled] seq={} name={:?} object={:?} deliveries={}",
                n.seq(),
                n.name(),
                n.object_class(),
                n.delivery_count()
            )
        } else {
            format!(
                "[notified] seq={} name={:?} object={:?} deliveries={} info={}",
                n.seq(),
                n.name(),
                n.object_class(),
                n.delivery_count(),
                n.info()
            )
        }
    }
}

impl Observe for LogWriter {
    fn on_notification(&self, n: &mut Notification) {
        println!("{}", Self::line(n));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Tag;
    use serde_json::json;

    #[test]
    fn test_line_format() {
        let n = Notification::new("onSave")
            .with_object(Tag::arc("Document"))
            .with_info(json!({ "path": "/tmp/a" }));
        let line = LogWriter::line(&n);
        assert!(line.starts_with("[notified] seq="), "{line}");
        assert!(
            line.ends_with(
                "name=\"onSave\" object=Some(\"Document\") deliveries=0 info={\"path\":\"/tmp/a\"}"
            ),
            "{line}"
        );

        let mut cancelled = Notification::new("onQuit");
        cancelled.cancel();
        assert!(LogWriter::line(&cancelled).starts_with("[notified-cancelled]"));
    }
}
