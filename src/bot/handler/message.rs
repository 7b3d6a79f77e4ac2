//! Chat command handler.
//!
//! Messages from bots and outside guilds are ignored. Commands are answered
//! with reports scoped to the guild the message was sent in.

use chrono::{DateTime, Utc};
use serenity::all::{Context, CreateAttachment, CreateEmbed, CreateMessage, Message};

use crate::{
    bot::{command::Command, handler::Handler},
    error::AppError,
    model::report::{ExportFile, ExportFormat, Report},
    service::report::{format, ReportService},
};

/// Response to a command, before it is sent.
#[derive(Debug)]
pub enum Reply {
    Text(String),
    Embed(CreateEmbed),
    File { message: String, file: ExportFile },
}

/// Handle message creation in a channel
pub async fn handle_message(handler: &Handler, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let command = match Command::parse(&message.content, &handler.command_prefix) {
        None => return,
        Some(Ok(command)) => command,
        Some(Err(e)) => {
            tracing::debug!("Rejected command {:?}: {}", message.content, e);
            send(&ctx, &message, Reply::Text(AppError::from(e).user_message())).await;
            return;
        }
    };

    tracing::debug!(
        "Command {:?} from user {} in guild {}",
        command,
        message.author.id,
        guild_id
    );

    let reports =
        ReportService::new(&handler.store, &handler.presence).scoped_to(guild_id.get());
    let reply = match respond(
        command,
        &reports,
        &handler.command_prefix,
        message.timestamp.to_utc(),
        Utc::now(),
    )
    .await
    {
        Ok(reply) => reply,
        Err(e) => Reply::Text(e.user_message()),
    };

    send(&ctx, &message, reply).await;
}

/// Runs a parsed command against the report service.
///
/// # Arguments
/// - `command` - Parsed command
/// - `reports` - Report service scoped to the message's guild
/// - `prefix` - Command prefix, shown in help
/// - `sent_at` - When the command message was sent, for latency
/// - `now` - Current time, for relative ranges and export names
pub async fn respond(
    command: Command,
    reports: &ReportService<'_>,
    prefix: &str,
    sent_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Reply, AppError> {
    let reply = match command {
        Command::Ping => {
            let latency = (now - sent_at).num_milliseconds().max(0);
            Reply::Text(format!("🏓 Pong! Latency: {}ms", latency))
        }
        Command::Help => Reply::Embed(format::help_embed(prefix)),
        Command::Attendance {
            user_id: Some(user_id),
            range,
        } => match reports.attendance_for(user_id, range.resolve(now)).await? {
            Report::NoData => Reply::Text(format!("No attendance data found for <@{}>.", user_id)),
            Report::Data(attendance) => {
                let stats = reports.user_stats(user_id).await?.data();
                Reply::Embed(format::attendance_embed(&attendance, stats.as_ref()))
            }
        },
        Command::Attendance { user_id: None, .. } => match reports.guild_summary().await? {
            Report::NoData => Reply::Text("No attendance data recorded yet.".to_string()),
            Report::Data(summary) => Reply::Embed(format::summary_embed(&summary)),
        },
        Command::Roster { channel_id, range } => {
            match reports.roster_for(channel_id, range.resolve(now)).await? {
                Report::NoData => {
                    Reply::Text(format!("No attendance found for <#{}>.", channel_id))
                }
                Report::Data(roster) => Reply::Embed(format::roster_embed(&roster)),
            }
        }
        Command::Stats {
            user_id: Some(user_id),
        } => match reports.user_stats(user_id).await? {
            Report::NoData => Reply::Text(format!("No attendance data found for <@{}>.", user_id)),
            Report::Data(stats) => Reply::Embed(format::user_stats_embed(&stats)),
        },
        Command::Stats { user_id: None } => match reports.channel_popularity().await? {
            Report::NoData => Reply::Text("No attendance data recorded yet.".to_string()),
            Report::Data(channels) => Reply::Embed(format::popularity_embed(&channels)),
        },
        Command::Export { format } => match reports.export(format, now).await? {
            Report::NoData => Reply::Text("No attendance data to export.".to_string()),
            Report::Data(file) => Reply::File {
                message: export_message(format),
                file,
            },
        },
    };

    Ok(reply)
}

fn export_message(format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => "📁 Attendance data exported as CSV".to_string(),
        ExportFormat::Detailed => "📁 Detailed attendance data exported as JSON".to_string(),
    }
}

async fn send(ctx: &Context, message: &Message, reply: Reply) {
    let builder = match reply {
        Reply::Text(text) => CreateMessage::new().content(text),
        Reply::Embed(embed) => CreateMessage::new().embed(embed),
        Reply::File { message, file } => CreateMessage::new()
            .content(message)
            .add_file(CreateAttachment::bytes(file.content, file.filename)),
    };

    if let Err(e) = message.channel_id.send_message(&ctx.http, builder).await {
        tracing::error!(
            "Failed to reply in channel {}: {}",
            message.channel_id,
            e
        );
    }
}
