use crate::{
    data::attendance_session::AttendanceSessionRepository,
    model::{
        range::TimeRange,
        session::{AttendanceSession, CloseReason, SessionFilter},
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod find_by_key;
mod insert;
mod query;

fn closed(user_id: u64, channel_id: u64, joined: i64, left: i64) -> AttendanceSession {
    AttendanceSession {
        guild_id: 1,
        user_id,
        channel_id,
        joined_at: factory::at(joined),
        left_at: factory::at(left),
        close_reason: CloseReason::Left,
    }
}
