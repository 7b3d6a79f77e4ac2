use super::*;

/// Tests the disconnect and late reconnect scenario.
///
/// A session is last seen at t=500 when the connection drops. The gateway
/// comes back at t=800 without replaying events and no close ever arrives.
///
/// Expected: the session is closed by t=1100 with left_at = 500
#[test]
fn unconfirmed_session_expires_after_grace_period() {
    let mut state = state();
    state.connection_restored(false, at(0));
    state.apply(&voice(USER_A, None, Some(C1), 0));
    state.sweep(at(500));

    state.connection_lost();
    state.connection_restored(false, at(800));

    assert!(closed(&state.sweep(at(1000))).is_empty());

    let transitions = state.sweep(at(1100));
    assert_eq!(
        closed(&transitions).iter().map(span).collect::<Vec<_>>(),
        vec![(C1, at(0), at(500), CloseReason::Expired)]
    );
    assert!(state.open_sessions(None).is_empty());
}

/// Tests that a confirmed session is never expired.
///
/// Expected: heartbeats advance last activity and nothing closes
#[test]
fn confirmed_session_gets_heartbeat() {
    let mut state = state();
    state.connection_restored(false, at(0));
    state.apply(&voice(USER_A, None, Some(C1), 0));

    let transitions = state.sweep(at(5000));

    assert!(closed(&transitions).is_empty());
    assert_eq!(
        state.open_session(USER_A, C1).unwrap().last_activity_at,
        at(5000)
    );
}

/// Tests that no heartbeat is given while disconnected.
///
/// Expected: last activity stays at the last evidence of presence
#[test]
fn no_heartbeat_while_disconnected() {
    let mut state = state();
    state.apply(&voice(USER_A, None, Some(C1), 0));

    state.sweep(at(300));

    assert_eq!(state.open_session(USER_A, C1).unwrap().last_activity_at, at(0));
}

/// Tests reconciliation against a voice snapshot after reconnecting.
///
/// A is still connected, B left during the outage and a third user joined
/// during the outage.
///
/// Expected: A confirmed, B closed at last activity, the newcomer opened at snapshot time
#[test]
fn snapshot_reconciles_open_sessions() {
    let mut state = state();
    state.connection_restored(false, at(0));
    state.apply(&voice(USER_A, None, Some(C1), 0));
    state.apply(&voice(USER_B, None, Some(C2), 0));
    state.sweep(at(500));
    state.connection_lost();
    state.connection_restored(false, at(800));

    let newcomer = 102;
    let transitions = state.reconcile(&snapshot(&[(USER_A, C1), (newcomer, C2)], 800));

    assert_eq!(
        closed(&transitions).iter().map(span).collect::<Vec<_>>(),
        vec![(C2, at(0), at(500), CloseReason::Reconciled)]
    );
    let a = state.open_session(USER_A, C1).unwrap();
    assert!(a.confirmed);
    assert_eq!(a.last_activity_at, at(800));
    assert_eq!(state.open_session(newcomer, C2).unwrap().joined_at, at(800));
    assert!(state.open_session(USER_B, C2).is_none());
}

/// Tests that a snapshot ignores members of untracked channels and other guilds.
///
/// Expected: only the tracked member is opened; the other guild's session is untouched
#[test]
fn snapshot_only_affects_its_guild_and_tracked_channels() {
    let mut state = state();
    state.apply(&VoiceStateNotification {
        guild_id: 2,
        ..voice(USER_B, None, Some(C2), 0)
    });

    let transitions = state.reconcile(&snapshot(&[(USER_A, C1), (103, UNTRACKED)], 100));

    assert_eq!(opened(&transitions), 1);
    assert!(closed(&transitions).is_empty());
    assert!(state.open_session(USER_B, C2).is_some());
}

/// Tests that restored sessions await confirmation.
///
/// Expected: restored sessions are unconfirmed and expire without a snapshot
#[test]
fn restored_sessions_are_unconfirmed() {
    let mut state = state();
    let mut session = crate::model::session::OpenSession::new(GUILD, USER_A, C1, at(0));
    session.last_activity_at = at(200);
    state.restore(vec![session]);

    assert!(!state.open_session(USER_A, C1).unwrap().confirmed);

    state.connection_restored(false, at(300));
    let transitions = state.sweep(at(800));

    assert_eq!(closed(&transitions)[0].left_at, at(200));
}

/// Tests that a resumed connection confirms sessions immediately.
///
/// Expected: sessions confirmed at the resume time and not expired later
#[test]
fn resume_with_replay_confirms_sessions() {
    let mut state = state();
    state.apply(&voice(USER_A, None, Some(C1), 0));
    state.connection_lost();

    state.connection_restored(true, at(100));

    let session = state.open_session(USER_A, C1).unwrap();
    assert!(session.confirmed);
    assert_eq!(session.last_activity_at, at(100));
    assert!(closed(&state.sweep(at(2000))).is_empty());
}

/// Tests the end of the tracking period.
///
/// Expected: confirmed sessions close at the shutdown time, unconfirmed ones at last activity
#[test]
fn close_all_closes_every_session() {
    let mut state = state();
    state.apply(&voice(USER_A, None, Some(C1), 0));
    let mut restored = crate::model::session::OpenSession::new(GUILD, USER_B, C2, at(0));
    restored.last_activity_at = at(40);
    state.restore(vec![restored]);

    let transitions = state.close_all(at(100));

    let sessions = closed(&transitions);
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.close_reason == CloseReason::Shutdown));
    let a = sessions.iter().find(|s| s.user_id == USER_A).unwrap();
    let b = sessions.iter().find(|s| s.user_id == USER_B).unwrap();
    assert_eq!(a.left_at, at(100));
    assert_eq!(b.left_at, at(40));
    assert!(state.open_sessions(None).is_empty());
}

/// Tests a grace period too large to add to any timestamp.
///
/// Expected: the unconfirmed session never expires and the sweep does not fail
#[test]
fn huge_grace_period_never_expires() {
    let mut state = PresenceState::new(
        TrackedChannels::Only(HashSet::from([C1, C2])),
        TimeDelta::try_seconds(9_000_000_000_000).unwrap(),
    );
    state.apply(&voice(USER_A, None, Some(C1), 0));
    state.connection_lost();

    let transitions = state.sweep(at(1000));

    assert!(closed(&transitions).is_empty());
    assert!(state.open_session(USER_A, C1).is_some());
}

/// Tests that per-user watermarks do not accumulate forever.
///
/// Expected: a user who left is forgotten once the grace period has passed;
/// a user still connected keeps their watermark
#[test]
fn sweep_prunes_watermarks_of_departed_users() {
    let mut state = state();
    state.connection_restored(false, at(0));
    state.apply(&voice(USER_A, None, Some(C1), 0));
    state.apply(&voice(USER_A, Some(C1), None, 100));
    state.apply(&voice(USER_B, None, Some(C2), 0));
    assert_eq!(state.watermark_count(), 2);

    state.sweep(at(650));
    assert_eq!(state.watermark_count(), 2);

    state.sweep(at(700));
    assert_eq!(state.watermark_count(), 1);
    assert!(state.open_session(USER_B, C2).is_some());
}
