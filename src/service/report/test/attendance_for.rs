use super::*;

/// Tests a user's total attendance across all time.
///
/// Expected: Data with both sessions and their summed duration
#[tokio::test]
async fn sums_sessions_for_user() -> Result<(), DbErr> {
    let (test, store, view) = setup().await;
    let db = test.db.as_ref().unwrap();
    factory::create_attendance_session(db, 1, 10, 0, 100).await?;
    factory::create_attendance_session(db, 1, 20, 100, 300).await?;
    factory::create_attendance_session(db, 2, 10, 0, 500).await?;

    let reports = ReportService::new(&store, &view);
    let attendance = reports
        .attendance_for(1, TimeRange::all())
        .await
        .unwrap()
        .data()
        .unwrap();

    assert_eq!(attendance.sessions.len(), 2);
    assert_eq!(attendance.total, TimeDelta::seconds(300));

    Ok(())
}

/// Tests that durations are clipped to the requested range.
///
/// Expected: only the part of each session inside [50, 150] is counted
#[tokio::test]
async fn clips_durations_to_range() -> Result<(), DbErr> {
    let (test, store, view) = setup().await;
    let db = test.db.as_ref().unwrap();
    factory::create_attendance_session(db, 1, 10, 0, 100).await?;
    factory::create_attendance_session(db, 1, 20, 100, 300).await?;

    let reports = ReportService::new(&store, &view);
    let attendance = reports
        .attendance_for(1, TimeRange::between(at(50), at(150)))
        .await
        .unwrap()
        .data()
        .unwrap();

    assert_eq!(attendance.total, TimeDelta::seconds(100));

    Ok(())
}

/// Tests an unknown user.
///
/// Expected: NoData rather than an error
#[tokio::test]
async fn returns_no_data_for_unknown_user() -> Result<(), DbErr> {
    let (_test, store, view) = setup().await;

    let reports = ReportService::new(&store, &view);
    let report = reports.attendance_for(42, TimeRange::all()).await.unwrap();

    assert!(report.is_no_data());

    Ok(())
}

/// Tests that a guild-scoped service ignores other guilds.
///
/// Expected: NoData when the user's only session is in another guild
#[tokio::test]
async fn scoped_service_ignores_other_guilds() -> Result<(), DbErr> {
    let (test, store, view) = setup().await;
    let db = test.db.as_ref().unwrap();
    factory::attendance_session::AttendanceSessionFactory::new(db)
        .guild_id(5)
        .user_id(1)
        .build()
        .await?;

    let reports = ReportService::new(&store, &view).scoped_to(6);
    let report = reports.attendance_for(1, TimeRange::all()).await.unwrap();

    assert!(report.is_no_data());

    Ok(())
}
