use super::*;

/// Tests querying without constraints.
///
/// Verifies that every session is returned, ordered by join time.
///
/// Expected: Ok with all sessions in ascending join order
#[tokio::test]
async fn returns_all_sessions_ordered_by_join_time() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_attendance_session(db, 1, 10, 500, 600).await?;
    factory::create_attendance_session(db, 2, 10, 0, 100).await?;
    factory::create_attendance_session(db, 3, 20, 200, 300).await?;

    let repo = AttendanceSessionRepository::new(db);
    let sessions = repo.query(&SessionFilter::default()).await?;

    let users: Vec<u64> = sessions.iter().map(|s| s.user_id).collect();
    assert_eq!(users, vec![2, 3, 1]);

    Ok(())
}

/// Tests filtering by user and channel.
///
/// Expected: Ok with only the matching user's sessions in the matching channel
#[tokio::test]
async fn filters_by_user_and_channel() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_attendance_session(db, 1, 10, 0, 100).await?;
    factory::create_attendance_session(db, 1, 20, 100, 200).await?;
    factory::create_attendance_session(db, 2, 10, 0, 100).await?;

    let repo = AttendanceSessionRepository::new(db);

    let by_user = repo.query(&SessionFilter::for_user(1)).await?;
    assert_eq!(by_user.len(), 2);

    let by_channel = repo.query(&SessionFilter::for_channel(10)).await?;
    assert_eq!(by_channel.len(), 2);
    assert!(by_channel.iter().all(|s| s.channel_id == 10));

    let both = repo
        .query(&SessionFilter {
            user_id: Some(1),
            channel_id: Some(20),
            ..Default::default()
        })
        .await?;
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].joined_at, factory::at(100));

    Ok(())
}

/// Tests filtering by guild.
///
/// Expected: Ok with only sessions from the requested guild
#[tokio::test]
async fn filters_by_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::attendance_session::AttendanceSessionFactory::new(db)
        .guild_id(7)
        .user_id(1)
        .build()
        .await?;
    factory::attendance_session::AttendanceSessionFactory::new(db)
        .guild_id(8)
        .user_id(1)
        .build()
        .await?;

    let repo = AttendanceSessionRepository::new(db);
    let sessions = repo
        .query(&SessionFilter::for_user(1).in_guild(Some(7)))
        .await?;

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].guild_id, 7);

    Ok(())
}

/// Tests time range overlap semantics.
///
/// Verifies that sessions partially inside the range are returned and that
/// sessions entirely before or after it are not. Bounds are inclusive.
///
/// Expected: Ok with the overlapping sessions only
#[tokio::test]
async fn filters_by_overlapping_range() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    // Before, straddling start, inside, straddling end, touching end, after
    factory::create_attendance_session(db, 1, 10, 0, 50).await?;
    factory::create_attendance_session(db, 2, 10, 50, 150).await?;
    factory::create_attendance_session(db, 3, 10, 120, 180).await?;
    factory::create_attendance_session(db, 4, 10, 150, 250).await?;
    factory::create_attendance_session(db, 5, 10, 200, 260).await?;
    factory::create_attendance_session(db, 6, 10, 201, 300).await?;

    let repo = AttendanceSessionRepository::new(db);
    let sessions = repo
        .query(&SessionFilter::default().within(TimeRange::between(
            factory::at(100),
            factory::at(200),
        )))
        .await?;

    let users: Vec<u64> = sessions.iter().map(|s| s.user_id).collect();
    assert_eq!(users, vec![2, 3, 4, 5]);

    Ok(())
}

/// Tests querying an empty table.
///
/// Expected: Ok with an empty list
#[tokio::test]
async fn returns_empty_when_no_sessions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AttendanceSessionRepository::new(db);
    let sessions = repo.query(&SessionFilter::for_user(1)).await?;

    assert!(sessions.is_empty());

    Ok(())
}
