use super::*;

/// Tests the CSV export.
///
/// Expected: a header, one row per closed session and an Active row for open sessions
#[tokio::test]
async fn exports_csv_rows() -> Result<(), DbErr> {
    let (test, store, view) = setup_with_open(&[(2, 20, 500)]).await;
    let db = test.db.as_ref().unwrap();
    factory::create_attendance_session(db, 1, 10, 0, 3723).await?;

    let reports = ReportService::new(&store, &view);
    let file = reports
        .export(ExportFormat::Csv, at(0))
        .await
        .unwrap()
        .data()
        .unwrap();

    assert_eq!(file.filename, "attendance_export_19700101_000000.csv");
    let content = String::from_utf8(file.content).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "User ID,Guild ID,Channel ID,Join Time,Leave Time,Duration,Status"
    );
    assert!(lines[1].starts_with("1,1,10,"));
    assert!(lines[1].ends_with(",1h 2m 3s,Completed"));
    assert!(lines[2].starts_with("2,1,20,"));
    assert!(lines[2].ends_with(",,Ongoing,Active"));

    Ok(())
}

/// Tests the detailed JSON export.
///
/// Expected: an object keyed by user ID with statistics and sessions
#[tokio::test]
async fn exports_detailed_json() -> Result<(), DbErr> {
    let (test, store, view) = setup().await;
    let db = test.db.as_ref().unwrap();
    factory::create_attendance_session(db, 1, 10, 0, 60).await?;
    factory::create_attendance_session(db, 1, 10, 100, 220).await?;

    let reports = ReportService::new(&store, &view);
    let file = reports
        .export(ExportFormat::Detailed, at(0))
        .await
        .unwrap()
        .data()
        .unwrap();

    assert!(file.filename.ends_with(".json"));
    let json: serde_json::Value = serde_json::from_slice(&file.content).unwrap();
    assert_eq!(json["1"]["statistics"]["total_sessions"], 2);
    assert_eq!(json["1"]["statistics"]["total_time"], "3m 0s");
    assert_eq!(json["1"]["statistics"]["longest_session"], "2m 0s");
    assert_eq!(json["1"]["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(json["1"]["sessions"][0]["status"], "Completed");

    Ok(())
}

/// Tests exporting with nothing recorded.
///
/// Expected: NoData
#[tokio::test]
async fn export_without_data_is_no_data() -> Result<(), DbErr> {
    let (_test, store, view) = setup().await;

    let reports = ReportService::new(&store, &view);

    assert!(reports
        .export(ExportFormat::Csv, at(0))
        .await
        .unwrap()
        .is_no_data());

    Ok(())
}
