use super::*;

/// Tests inserting a closed session.
///
/// Verifies that the repository stores every field of the session and returns
/// it converted back to the domain model.
///
/// Expected: Ok with the stored session equal to the input
#[tokio::test]
async fn inserts_closed_session() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let session = AttendanceSession {
        close_reason: CloseReason::Moved,
        ..closed(100, 200, 0, 300)
    };

    let repo = AttendanceSessionRepository::new(db);
    let stored = repo.insert(&session).await?;

    assert_eq!(stored, session);

    Ok(())
}

/// Tests inserting two sessions for the same user and channel.
///
/// Verifies that a user can attend the same channel several times, each visit
/// being its own row.
///
/// Expected: Ok with both sessions retrievable
#[tokio::test]
async fn inserts_repeat_visits() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AttendanceSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AttendanceSessionRepository::new(db);
    repo.insert(&closed(100, 200, 0, 100)).await?;
    repo.insert(&closed(100, 200, 500, 800)).await?;

    let sessions = repo.query(&SessionFilter::for_user(100)).await?;
    assert_eq!(sessions.len(), 2);

    Ok(())
}
