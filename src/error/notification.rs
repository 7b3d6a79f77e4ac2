use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotificationError {
    /// A voice-state notification is missing a field the tracker cannot work without.
    ///
    /// Malformed notifications are logged and dropped; they never reach the
    /// open-session state.
    #[error("Malformed voice state notification: missing {field}")]
    Malformed { field: &'static str },
}
