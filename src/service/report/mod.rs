//! Attendance reports.
//!
//! Reports only read: closed sessions come from the [`SessionStore`] and
//! currently open sessions from the tracker's [`PresenceView`]. Reports that
//! combine both hold the view's read lock across the store query. An empty
//! result is returned as [`Report::NoData`], never as an error.

pub mod format;

#[cfg(test)]
mod test;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::{
    error::AppError,
    error::store::StoreError,
    model::{
        range::TimeRange,
        report::{
            ChannelBreakdown, ChannelPopularity, ExportFile, ExportFormat, GuildSummary, Report,
            Roster, UserActivity, UserAttendance, UserStats,
        },
        session::{AttendanceSession, OpenSession, SessionFilter},
    },
    service::{presence::PresenceView, session_store::SessionStore},
    util::time::format_duration,
};

const TOP_USERS: usize = 10;

pub struct ReportService<'a> {
    store: &'a SessionStore,
    presence: &'a PresenceView,
    guild_id: Option<u64>,
}

impl<'a> ReportService<'a> {
    pub fn new(store: &'a SessionStore, presence: &'a PresenceView) -> Self {
        Self {
            store,
            presence,
            guild_id: None,
        }
    }

    /// Limits every query of this service to one guild.
    pub fn scoped_to(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    /// A user's closed sessions overlapping `range` and their total duration.
    ///
    /// Each session contributes only the part that lies inside the range.
    ///
    /// # Returns
    /// - `Ok(Report::Data(UserAttendance))` - At least one session matched
    /// - `Ok(Report::NoData)` - No session matched, including unknown users
    /// - `Err(StoreError)` - Store failure
    pub async fn attendance_for(
        &self,
        user_id: u64,
        range: TimeRange,
    ) -> Result<Report<UserAttendance>, StoreError> {
        let sessions = self
            .closed(SessionFilter::for_user(user_id).within(range))
            .await?;

        if sessions.is_empty() {
            return Ok(Report::NoData);
        }

        let total = sessions
            .iter()
            .map(|s| s.duration_within(&range))
            .fold(TimeDelta::zero(), |acc, d| acc + d);

        Ok(Report::Data(UserAttendance {
            user_id,
            range,
            total,
            sessions,
        }))
    }

    /// Distinct users with a closed session in `channel_id` overlapping `range`.
    pub async fn roster_for(
        &self,
        channel_id: u64,
        range: TimeRange,
    ) -> Result<Report<Roster>, StoreError> {
        let sessions = self
            .closed(SessionFilter::for_channel(channel_id).within(range))
            .await?;

        if sessions.is_empty() {
            return Ok(Report::NoData);
        }

        Ok(Report::Data(Roster {
            channel_id,
            range,
            user_ids: sessions.iter().map(|s| s.user_id).collect(),
        }))
    }

    /// Lifetime statistics for one user, including sessions still open.
    pub async fn user_stats(&self, user_id: u64) -> Result<Report<UserStats>, StoreError> {
        let (closed, open) = self.snapshot(SessionFilter::for_user(user_id)).await?;
        let open: Vec<OpenSession> = open.into_iter().filter(|s| s.user_id == user_id).collect();

        if closed.is_empty() && open.is_empty() {
            return Ok(Report::NoData);
        }

        Ok(Report::Data(stats_for(user_id, &closed, &open)))
    }

    /// Guild-wide overview with the most active users.
    pub async fn guild_summary(&self) -> Result<Report<GuildSummary>, StoreError> {
        let (closed, open) = self.snapshot(SessionFilter::default()).await?;

        if closed.is_empty() && open.is_empty() {
            return Ok(Report::NoData);
        }

        let active_users: BTreeSet<u64> = open.iter().map(|s| s.user_id).collect();

        let mut users: BTreeMap<u64, UserActivity> = BTreeMap::new();
        for session in &closed {
            let entry = users
                .entry(session.user_id)
                .or_insert_with(|| empty_activity(session.user_id));
            entry.sessions += 1;
            entry.total_time = entry.total_time + session.duration();
        }
        for session in &open {
            users
                .entry(session.user_id)
                .or_insert_with(|| empty_activity(session.user_id))
                .sessions += 1;
        }
        for user in users.values_mut() {
            user.active = active_users.contains(&user.user_id);
        }

        let users_tracked = users.len();
        let mut top_users: Vec<UserActivity> = users.into_values().collect();
        top_users.sort_by(|a, b| {
            b.sessions
                .cmp(&a.sessions)
                .then(b.total_time.cmp(&a.total_time))
                .then(a.user_id.cmp(&b.user_id))
        });
        top_users.truncate(TOP_USERS);

        Ok(Report::Data(GuildSummary {
            users_tracked,
            total_sessions: closed.len() + open.len(),
            currently_active: active_users.len(),
            top_users,
        }))
    }

    /// Session count and distinct users per channel, busiest first.
    pub async fn channel_popularity(&self) -> Result<Report<Vec<ChannelPopularity>>, StoreError> {
        let (closed, open) = self.snapshot(SessionFilter::default()).await?;

        let visits = closed
            .iter()
            .map(|s| (s.channel_id, s.user_id))
            .chain(open.iter().map(|s| (s.channel_id, s.user_id)));

        let mut channels: HashMap<u64, (usize, BTreeSet<u64>)> = HashMap::new();
        for (channel_id, user_id) in visits {
            let entry = channels.entry(channel_id).or_default();
            entry.0 += 1;
            entry.1.insert(user_id);
        }

        if channels.is_empty() {
            return Ok(Report::NoData);
        }

        let mut popularity: Vec<ChannelPopularity> = channels
            .into_iter()
            .map(|(channel_id, (sessions, users))| ChannelPopularity {
                channel_id,
                sessions,
                unique_users: users.len(),
            })
            .collect();
        popularity.sort_by(|a, b| {
            b.sessions
                .cmp(&a.sessions)
                .then(a.channel_id.cmp(&b.channel_id))
        });

        Ok(Report::Data(popularity))
    }

    /// Exports every session as a file.
    ///
    /// # Arguments
    /// - `format` - CSV rows or detailed JSON keyed by user
    /// - `now` - Used for the file name
    ///
    /// # Returns
    /// - `Ok(Report::Data(ExportFile))` - File content and name
    /// - `Ok(Report::NoData)` - Nothing recorded yet
    /// - `Err(AppError)` - Store or serialization failure
    pub async fn export(
        &self,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<Report<ExportFile>, AppError> {
        let (closed, open) = self.snapshot(SessionFilter::default()).await?;

        if closed.is_empty() && open.is_empty() {
            return Ok(Report::NoData);
        }

        let stamp = now.format("%Y%m%d_%H%M%S");
        let file = match format {
            ExportFormat::Csv => ExportFile {
                filename: format!("attendance_export_{}.csv", stamp),
                content: export_csv(&closed, &open).into_bytes(),
            },
            ExportFormat::Detailed => ExportFile {
                filename: format!("detailed_attendance_export_{}.json", stamp),
                content: serde_json::to_vec_pretty(&export_detailed(&closed, &open))?,
            },
        };

        Ok(Report::Data(file))
    }

    async fn closed(&self, filter: SessionFilter) -> Result<Vec<AttendanceSession>, StoreError> {
        self.store.query(&filter.in_guild(self.guild_id)).await
    }

    /// Closed sessions matching `filter` and the open sessions of the scope,
    /// read while the tracker is locked out so no session is missed or
    /// counted twice.
    async fn snapshot(
        &self,
        filter: SessionFilter,
    ) -> Result<(Vec<AttendanceSession>, Vec<OpenSession>), StoreError> {
        let presence = self.presence.read().await;
        let closed = self.closed(filter).await?;
        Ok((closed, presence.open_sessions(self.guild_id)))
    }
}

fn empty_activity(user_id: u64) -> UserActivity {
    UserActivity {
        user_id,
        sessions: 0,
        total_time: TimeDelta::zero(),
        active: false,
    }
}

/// Statistics over a user's closed and open sessions.
///
/// Time totals only count closed sessions; open ones count as sessions.
fn stats_for(user_id: u64, closed: &[AttendanceSession], open: &[OpenSession]) -> UserStats {
    let durations: Vec<TimeDelta> = closed.iter().map(AttendanceSession::duration).collect();
    let total_time = durations
        .iter()
        .fold(TimeDelta::zero(), |acc, d| acc + *d);
    let longest_session = durations.iter().copied().max().unwrap_or_else(TimeDelta::zero);
    let average_session = match i32::try_from(durations.len()) {
        Ok(count) if count > 0 => total_time / count,
        _ => TimeDelta::zero(),
    };

    let mut channels: HashMap<u64, ChannelBreakdown> = HashMap::new();
    for session in closed {
        let entry = channels
            .entry(session.channel_id)
            .or_insert_with(|| empty_breakdown(session.channel_id));
        entry.sessions += 1;
        entry.total_time = entry.total_time + session.duration();
    }
    for session in open {
        channels
            .entry(session.channel_id)
            .or_insert_with(|| empty_breakdown(session.channel_id))
            .sessions += 1;
    }

    let mut channels: Vec<ChannelBreakdown> = channels.into_values().collect();
    channels.sort_by(|a, b| {
        b.sessions
            .cmp(&a.sessions)
            .then(a.channel_id.cmp(&b.channel_id))
    });

    UserStats {
        user_id,
        total_sessions: closed.len() + open.len(),
        completed_sessions: closed.len(),
        active_sessions: open.len(),
        total_time,
        average_session,
        longest_session,
        channels,
    }
}

fn empty_breakdown(channel_id: u64) -> ChannelBreakdown {
    ChannelBreakdown {
        channel_id,
        sessions: 0,
        total_time: TimeDelta::zero(),
    }
}

const CSV_HEADER: &str = "User ID,Guild ID,Channel ID,Join Time,Leave Time,Duration,Status";

fn export_csv(closed: &[AttendanceSession], open: &[OpenSession]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for session in closed {
        csv.push_str(&format!(
            "{},{},{},{},{},{},Completed\n",
            session.user_id,
            session.guild_id,
            session.channel_id,
            session.joined_at.to_rfc3339(),
            session.left_at.to_rfc3339(),
            format_duration(session.duration()),
        ));
    }
    for session in open {
        csv.push_str(&format!(
            "{},{},{},{},,Ongoing,Active\n",
            session.user_id,
            session.guild_id,
            session.channel_id,
            session.joined_at.to_rfc3339(),
        ));
    }

    csv
}

#[derive(Serialize)]
struct DetailedUser {
    statistics: DetailedStatistics,
    sessions: Vec<DetailedSession>,
}

#[derive(Serialize)]
struct DetailedStatistics {
    total_sessions: usize,
    completed_sessions: usize,
    active_sessions: usize,
    total_time: String,
    avg_session: String,
    longest_session: String,
}

#[derive(Serialize)]
struct DetailedSession {
    guild_id: u64,
    channel_id: u64,
    join_time: DateTime<Utc>,
    leave_time: Option<DateTime<Utc>>,
    duration: String,
    status: &'static str,
}

fn export_detailed(
    closed: &[AttendanceSession],
    open: &[OpenSession],
) -> BTreeMap<String, DetailedUser> {
    let mut closed_by_user: BTreeMap<u64, Vec<AttendanceSession>> = BTreeMap::new();
    for session in closed {
        closed_by_user
            .entry(session.user_id)
            .or_default()
            .push(session.clone());
    }
    let mut open_by_user: BTreeMap<u64, Vec<OpenSession>> = BTreeMap::new();
    for session in open {
        open_by_user
            .entry(session.user_id)
            .or_default()
            .push(session.clone());
    }

    let users: BTreeSet<u64> = closed_by_user
        .keys()
        .chain(open_by_user.keys())
        .copied()
        .collect();

    users
        .into_iter()
        .map(|user_id| {
            let closed = closed_by_user.remove(&user_id).unwrap_or_default();
            let open = open_by_user.remove(&user_id).unwrap_or_default();
            let stats = stats_for(user_id, &closed, &open);

            let sessions = closed
                .iter()
                .map(|s| DetailedSession {
                    guild_id: s.guild_id,
                    channel_id: s.channel_id,
                    join_time: s.joined_at,
                    leave_time: Some(s.left_at),
                    duration: format_duration(s.duration()),
                    status: "Completed",
                })
                .chain(open.iter().map(|s| DetailedSession {
                    guild_id: s.guild_id,
                    channel_id: s.channel_id,
                    join_time: s.joined_at,
                    leave_time: None,
                    duration: "Ongoing".to_string(),
                    status: "Active",
                }))
                .collect();

            (
                user_id.to_string(),
                DetailedUser {
                    statistics: DetailedStatistics {
                        total_sessions: stats.total_sessions,
                        completed_sessions: stats.completed_sessions,
                        active_sessions: stats.active_sessions,
                        total_time: format_duration(stats.total_time),
                        avg_session: format_duration(stats.average_session),
                        longest_session: format_duration(stats.longest_session),
                    },
                    sessions,
                },
            )
        })
        .collect()
}
