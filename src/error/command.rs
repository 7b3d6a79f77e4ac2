use thiserror::Error;

/// Chat command parse failures.
///
/// The display text of each variant is sent back to the invoking user verbatim,
/// so it stays short and says how to fix the input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command not found. Use `{prefix}help` to see available commands.")]
    UnknownCommand { name: String, prefix: String },

    #[error("Invalid user mention. Use @username format.")]
    InvalidUserMention(String),

    #[error("Invalid channel. Use #channel or a channel ID.")]
    MissingOrInvalidChannel,

    #[error("Invalid time range '{0}'. Use `all` or a window like `30m`, `12h`, `7d`, `2w`.")]
    InvalidRange(String),

    #[error("Unknown export format '{0}'. Use `csv` or `detailed`.")]
    InvalidExportFormat(String),
}
