use super::*;

/// Tests reading back every stored open session.
///
/// Verifies ordering by join time and that the confirmation flag survives.
///
/// Expected: Ok with sessions in ascending join order
#[tokio::test]
async fn returns_sessions_ordered_by_join_time() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_open_session(db, 1, 10, 500).await?;
    factory::open_session::OpenSessionFactory::new(db)
        .user_id(2)
        .channel_id(10)
        .joined_at(factory::at(100))
        .last_activity_at(factory::at(400))
        .confirmed(false)
        .build()
        .await?;

    let repo = OpenSessionRepository::new(db);
    let sessions = repo.get_all().await?;

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].user_id, 2);
    assert_eq!(sessions[0].last_activity_at, factory::at(400));
    assert!(!sessions[0].confirmed);
    assert_eq!(sessions[1].user_id, 1);
    assert!(sessions[1].confirmed);

    Ok(())
}

/// Tests reading an empty snapshot table.
///
/// Expected: Ok with an empty list
#[tokio::test]
async fn returns_empty_when_no_sessions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::OpenSession)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = OpenSessionRepository::new(db);

    assert!(repo.get_all().await?.is_empty());

    Ok(())
}
