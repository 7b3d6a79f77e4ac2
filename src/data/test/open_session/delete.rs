use super::*;

/// Tests deleting an existing open session row.
///
/// Expected: Ok(true) and the row no longer exists
#[tokio::test]
async fn deletes_existing_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_open_session(db, 100, 200, 0).await?;
    factory::create_open_session(db, 100, 300, 0).await?;

    let repo = OpenSessionRepository::new(db);
    let deleted = repo
        .delete(&SessionKey {
            user_id: 100,
            channel_id: 200,
            joined_at: factory::at(0),
        })
        .await?;

    assert!(deleted);
    let remaining = repo.get_all().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].channel_id, 300);

    Ok(())
}

/// Tests deleting a row that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_when_missing() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = OpenSessionRepository::new(db);
    let deleted = repo
        .delete(&SessionKey {
            user_id: 100,
            channel_id: 200,
            joined_at: factory::at(0),
        })
        .await?;

    assert!(!deleted);

    Ok(())
}

/// Tests that a row for a newer session in the same channel is kept.
///
/// Verifies that deleting by an older join time does not remove the snapshot
/// of a session opened later by the same user in the same channel.
///
/// Expected: Ok(false) and the newer row still exists
#[tokio::test]
async fn keeps_row_with_different_join_time() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_open_session(db, 100, 200, 500).await?;

    let repo = OpenSessionRepository::new(db);
    let deleted = repo
        .delete(&SessionKey {
            user_id: 100,
            channel_id: 200,
            joined_at: factory::at(0),
        })
        .await?;

    assert!(!deleted);
    assert_eq!(repo.get_all().await?.len(), 1);

    Ok(())
}
