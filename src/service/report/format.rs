//! Discord embeds for attendance reports.

use serenity::all::{CreateEmbed, CreateEmbedFooter};

use crate::{
    model::{
        range::TimeRange,
        report::{ChannelPopularity, GuildSummary, Roster, UserAttendance, UserStats},
    },
    util::time::{discord_timestamp, format_duration},
};

/// Discord's limit for an embed field value.
pub const FIELD_LIMIT: usize = 1024;

const RECENT_SESSIONS: usize = 5;

const COLOR_INFO: u32 = 0x3498db;
const COLOR_SUMMARY: u32 = 0x2ecc71;
const COLOR_STATS: u32 = 0x9b59b6;

/// Cuts `value` to the field limit, marking the cut with an ellipsis.
pub fn truncate_field(value: &str) -> String {
    if value.chars().count() <= FIELD_LIMIT {
        return value.to_string();
    }

    let mut truncated: String = value.chars().take(FIELD_LIMIT - 1).collect();
    truncated.push('…');
    truncated
}

pub fn range_label(range: &TimeRange) -> String {
    match (range.start, range.end) {
        (None, None) => "All time".to_string(),
        (Some(start), Some(end)) => format!(
            "{} to {}",
            discord_timestamp(start),
            discord_timestamp(end)
        ),
        (Some(start), None) => format!("Since {}", discord_timestamp(start)),
        (None, Some(end)) => format!("Until {}", discord_timestamp(end)),
    }
}

/// A user's attendance in a range with their most recent sessions.
pub fn attendance_embed(attendance: &UserAttendance, stats: Option<&UserStats>) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("📊 Attendance")
        .color(COLOR_INFO)
        .description(format!(
            "<@{}>\n**Period:** {}",
            attendance.user_id,
            range_label(&attendance.range)
        ))
        .field("Sessions", attendance.sessions.len().to_string(), true)
        .field("Total Time", format_duration(attendance.total), true);

    if let Some(stats) = stats {
        embed = embed
            .field("Active Now", stats.active_sessions.to_string(), true)
            .field("Average Session", format_duration(stats.average_session), true)
            .field("Longest Session", format_duration(stats.longest_session), true);
    }

    let recent = attendance
        .sessions
        .iter()
        .rev()
        .take(RECENT_SESSIONS)
        .map(|s| {
            format!(
                "<#{}> {} → {} ({})",
                s.channel_id,
                discord_timestamp(s.joined_at),
                discord_timestamp(s.left_at),
                format_duration(s.duration())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    embed.field("Recent Sessions", truncate_field(&recent), false)
}

pub fn roster_embed(roster: &Roster) -> CreateEmbed {
    let users = roster
        .user_ids
        .iter()
        .map(|id| format!("<@{}>", id))
        .collect::<Vec<_>>()
        .join(", ");

    CreateEmbed::new()
        .title("📋 Roster")
        .color(COLOR_INFO)
        .description(format!(
            "<#{}>\n**Period:** {}",
            roster.channel_id,
            range_label(&roster.range)
        ))
        .field(
            format!("Attendees ({})", roster.user_ids.len()),
            truncate_field(&users),
            false,
        )
}

pub fn summary_embed(summary: &GuildSummary) -> CreateEmbed {
    let top = summary
        .top_users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            format!(
                "{}. <@{}>{}\n   Sessions: {} | Total Time: {}",
                i + 1,
                user.user_id,
                if user.active { " 🟢" } else { "" },
                user.sessions,
                format_duration(user.total_time)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    CreateEmbed::new()
        .title("📈 Attendance Summary")
        .color(COLOR_SUMMARY)
        .field("Users Tracked", summary.users_tracked.to_string(), true)
        .field("Total Sessions", summary.total_sessions.to_string(), true)
        .field("Currently Active", summary.currently_active.to_string(), true)
        .field("Most Active Users", truncate_field(&top), false)
}

pub fn user_stats_embed(stats: &UserStats) -> CreateEmbed {
    let channels = stats
        .channels
        .iter()
        .map(|c| {
            format!(
                "<#{}>: {} sessions, {}",
                c.channel_id,
                c.sessions,
                format_duration(c.total_time)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    CreateEmbed::new()
        .title("📊 Detailed Statistics")
        .color(COLOR_STATS)
        .description(format!("<@{}>", stats.user_id))
        .field("Total Sessions", stats.total_sessions.to_string(), true)
        .field("Completed", stats.completed_sessions.to_string(), true)
        .field("Active", stats.active_sessions.to_string(), true)
        .field("Total Time", format_duration(stats.total_time), true)
        .field("Average Session", format_duration(stats.average_session), true)
        .field("Longest Session", format_duration(stats.longest_session), true)
        .field("Channels", truncate_field(&channels), false)
}

pub fn popularity_embed(channels: &[ChannelPopularity]) -> CreateEmbed {
    let lines = channels
        .iter()
        .map(|c| {
            format!(
                "<#{}>: {} sessions, {} users",
                c.channel_id, c.sessions, c.unique_users
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    CreateEmbed::new()
        .title("🔊 Channel Popularity")
        .color(COLOR_STATS)
        .field("Channels", truncate_field(&lines), false)
}

pub fn help_embed(prefix: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("🤖 Attendance Bot Commands")
        .color(COLOR_INFO)
        .field(
            format!("{}attendance [@user] [range]", prefix),
            "A user's attendance, or the server summary without a user",
            false,
        )
        .field(
            format!("{}roster <#channel> [range]", prefix),
            "Everyone who attended a voice channel",
            false,
        )
        .field(
            format!("{}stats [@user]", prefix),
            "Per-channel statistics for a user, or channel popularity",
            false,
        )
        .field(
            format!("{}export [csv|detailed]", prefix),
            "Download all attendance data",
            false,
        )
        .field(format!("{}ping", prefix), "Check the bot's latency", false)
        .footer(CreateEmbedFooter::new(
            "Ranges: all, 30m, 12h, 7d, 4w (the last n minutes/hours/days/weeks)",
        ))
}
