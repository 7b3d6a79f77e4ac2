use super::*;

/// Tests storing a new open session.
///
/// Expected: Ok with the session readable through get_all
#[tokio::test]
async fn inserts_new_open_session() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let session = OpenSession::new(1, 100, 200, factory::at(0));

    let repo = OpenSessionRepository::new(db);
    repo.upsert(&session).await?;

    let stored = repo.get_all().await?;
    assert_eq!(stored, vec![session]);

    Ok(())
}

/// Tests replacing the row for an existing user and channel.
///
/// Verifies that upserting a session for the same `(user, channel)` pair
/// overwrites the previous row rather than adding a second one.
///
/// Expected: Ok with one row holding the latest values
#[tokio::test]
async fn replaces_existing_row_for_same_pair() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = OpenSessionRepository::new(db);
    let mut session = OpenSession::new(1, 100, 200, factory::at(0));
    repo.upsert(&session).await?;

    session.last_activity_at = factory::at(300);
    session.confirmed = false;
    repo.upsert(&session).await?;

    let stored = repo.get_all().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].last_activity_at, factory::at(300));
    assert!(!stored[0].confirmed);

    Ok(())
}
