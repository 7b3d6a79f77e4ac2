use chrono::TimeDelta;
use sea_orm::DbErr;
use std::collections::BTreeSet;

use crate::{
    config::TrackedChannels,
    model::{range::TimeRange, report::ExportFormat},
    service::{
        presence::{PresenceState, PresenceTracker, PresenceView},
        report::ReportService,
        session_store::{RetryPolicy, SessionStore},
    },
};
use test_utils::{builder::TestBuilder, context::TestContext, factory, factory::at};

mod attendance_for;
mod export;

async fn setup() -> (TestContext, SessionStore, PresenceView) {
    let test = TestBuilder::new().with_attendance_tables().build().await.unwrap();
    let store = SessionStore::new(test.db.clone().unwrap(), RetryPolicy::default());
    let (_tracker, _handle, view) = PresenceTracker::new(
        PresenceState::new(TrackedChannels::All, TimeDelta::seconds(600)),
        store.clone(),
    );
    (test, store, view)
}

/// Sets up a store with open sessions restored into the tracker state.
async fn setup_with_open(open: &[(u64, u64, i64)]) -> (TestContext, SessionStore, PresenceView) {
    let test = TestBuilder::new().with_attendance_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    for &(user_id, channel_id, joined) in open {
        factory::create_open_session(db, user_id, channel_id, joined)
            .await
            .unwrap();
    }

    let store = SessionStore::new(db.clone(), RetryPolicy::default());
    let (_tracker, _handle, view) = PresenceTracker::restore(
        PresenceState::new(TrackedChannels::All, TimeDelta::seconds(600)),
        store.clone(),
    )
    .await
    .unwrap();
    (test, store, view)
}
