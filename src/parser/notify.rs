//! Surfacing load problems to the user.

/// Receives at most one message per top-level parse call.
pub trait Notify {
    fn notify_once(&self, message: &str);
}

/// Default notifier: the message goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn notify_once(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

pub(crate) fn unknown_tags_message(tags: &[String]) -> String {
    format!(
        "Parts of the document will not be loaded correctly: found unknown XML tag name(s) {}",
        tags.join(", ")
    )
}
