//! Chat command parsing.
//!
//! Parsing is pure so every syntax rule can be tested without a gateway.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    error::command::CommandError,
    model::{range::TimeRange, report::ExportFormat},
};

/// Time window argument of a command, resolved against the time of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSpec {
    #[default]
    All,
    /// The given span up to now.
    Last(TimeDelta),
}

impl RangeSpec {
    pub fn resolve(&self, now: DateTime<Utc>) -> TimeRange {
        match self {
            Self::All => TimeRange::all(),
            Self::Last(window) => TimeRange::last(*window, now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Attendance {
        user_id: Option<u64>,
        range: RangeSpec,
    },
    Roster {
        channel_id: u64,
        range: RangeSpec,
    },
    Stats {
        user_id: Option<u64>,
    },
    Export {
        format: ExportFormat,
    },
    Help,
}

impl Command {
    /// Parses a message.
    ///
    /// # Returns
    /// - `None` - The message is not addressed to the bot
    /// - `Some(Ok(Command))` - A valid command
    /// - `Some(Err(CommandError))` - A command with invalid arguments, or an unknown name
    pub fn parse(content: &str, prefix: &str) -> Option<Result<Self, CommandError>> {
        let rest = content.trim().strip_prefix(prefix)?;
        let mut args = rest.split_whitespace();
        let name = args.next()?.to_ascii_lowercase();
        let args: Vec<&str> = args.collect();

        Some(match name.as_str() {
            "ping" => Ok(Self::Ping),
            "help" => Ok(Self::Help),
            "attendance" => parse_attendance(&args),
            "roster" => parse_roster(&args),
            "stats" => parse_stats(&args),
            "export" => parse_export(&args),
            _ => Err(CommandError::UnknownCommand {
                name,
                prefix: prefix.to_string(),
            }),
        })
    }
}

fn parse_attendance(args: &[&str]) -> Result<Command, CommandError> {
    let mut user_id = None;
    let mut range = RangeSpec::All;

    match args {
        [] => {}
        [first] => match parse_user(first) {
            Some(id) => user_id = Some(id),
            None => range = parse_user_or_range(first)?,
        },
        [first, second, ..] => {
            user_id = Some(
                parse_user(first).ok_or_else(|| CommandError::InvalidUserMention(first.to_string()))?,
            );
            range = parse_range(second)?;
        }
    }

    Ok(Command::Attendance { user_id, range })
}

/// A lone argument that is not a user: a range, or a user typed wrongly.
fn parse_user_or_range(arg: &str) -> Result<RangeSpec, CommandError> {
    match parse_range(arg) {
        Ok(range) => Ok(range),
        Err(err) if arg.starts_with(|c: char| c.is_ascii_digit()) => Err(err),
        Err(_) => Err(CommandError::InvalidUserMention(arg.to_string())),
    }
}

fn parse_roster(args: &[&str]) -> Result<Command, CommandError> {
    let channel_id = args
        .first()
        .and_then(|arg| parse_channel(arg))
        .ok_or(CommandError::MissingOrInvalidChannel)?;

    let range = match args.get(1) {
        Some(arg) => parse_range(arg)?,
        None => RangeSpec::All,
    };

    Ok(Command::Roster { channel_id, range })
}

fn parse_stats(args: &[&str]) -> Result<Command, CommandError> {
    let user_id = match args.first() {
        Some(arg) => Some(parse_user(arg).ok_or_else(|| CommandError::InvalidUserMention(arg.to_string()))?),
        None => None,
    };

    Ok(Command::Stats { user_id })
}

fn parse_export(args: &[&str]) -> Result<Command, CommandError> {
    let format = match args.first() {
        Some(arg) => arg
            .parse()
            .map_err(|_| CommandError::InvalidExportFormat(arg.to_string()))?,
        None => ExportFormat::default(),
    };

    Ok(Command::Export { format })
}

/// Accepts `<@id>`, `<@!id>` or a bare ID.
fn parse_user(arg: &str) -> Option<u64> {
    let id = arg
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.strip_prefix('!').unwrap_or(s))
        .unwrap_or(arg);

    parse_id(id)
}

/// Accepts `<#id>` or a bare ID.
fn parse_channel(arg: &str) -> Option<u64> {
    let id = arg
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);

    parse_id(id)
}

fn parse_id(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok().filter(|id| *id > 0)
}

/// Longest window accepted for a relative range.
pub const MAX_RANGE_WINDOW: TimeDelta = TimeDelta::weeks(52 * 100);

/// Parses `all` or `<n><unit>` with unit `m`, `h`, `d` or `w`.
///
/// Windows longer than [`MAX_RANGE_WINDOW`] are rejected.
pub fn parse_range(arg: &str) -> Result<RangeSpec, CommandError> {
    let invalid = || CommandError::InvalidRange(arg.to_string());

    let lower = arg.to_ascii_lowercase();
    if lower == "all" {
        return Ok(RangeSpec::All);
    }

    let unit = lower.chars().last().ok_or_else(invalid)?;
    let amount: i64 = lower[..lower.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let window = match unit {
        'm' => TimeDelta::try_minutes(amount),
        'h' => TimeDelta::try_hours(amount),
        'd' => TimeDelta::try_days(amount),
        'w' => TimeDelta::try_weeks(amount),
        _ => None,
    }
    .filter(|window| *window <= MAX_RANGE_WINDOW)
    .ok_or_else(invalid)?;

    Ok(RangeSpec::Last(window))
}
