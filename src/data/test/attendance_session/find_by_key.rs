use super::*;

/// Tests finding a recorded session by its key.
///
/// Expected: Ok(Some) with the matching session
#[tokio::test]
async fn finds_existing_session() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_attendance_session(db, 100, 200, 10, 70).await?;

    let repo = AttendanceSessionRepository::new(db);
    let key = closed(100, 200, 10, 70).key();
    let found = repo.find_by_key(&key).await?;

    assert!(found.is_some());
    assert_eq!(found.unwrap().left_at, factory::at(70));

    Ok(())
}

/// Tests that the join time is part of the key.
///
/// Verifies that a session in the same channel with a different join time
/// is not returned.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_different_join_time() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_attendance_session(db, 100, 200, 10, 70).await?;

    let repo = AttendanceSessionRepository::new(db);
    let found = repo.find_by_key(&closed(100, 200, 11, 70).key()).await?;

    assert!(found.is_none());

    Ok(())
}

/// Tests that a stored row with an unknown close reason surfaces as an error.
///
/// Expected: Err(DbErr::Type)
#[tokio::test]
async fn fails_on_unknown_close_reason() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::attendance_session::AttendanceSessionFactory::new(db)
        .guild_id(1)
        .user_id(100)
        .channel_id(200)
        .joined_at(factory::at(0))
        .close_reason("vanished")
        .build()
        .await?;

    let repo = AttendanceSessionRepository::new(db);
    let result = repo.find_by_key(&closed(100, 200, 0, 60).key()).await;

    assert!(matches!(result, Err(DbErr::Type(_))));

    Ok(())
}
