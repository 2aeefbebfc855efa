use domscout_engine::csv;
use domscout_engine::export::{self, ExportError};
use domscout_engine::record::TableRecord;

fn record(row_index: usize, lorem: &str, ipsum: &str, actions: &[&str]) -> TableRecord {
    let mut record = TableRecord::new(row_index);
    record.fields.insert("Lorem".into(), lorem.into());
    record.fields.insert("Ipsum".into(), ipsum.into());
    record.available_actions = actions.iter().map(|a| a.to_string()).collect();
    if actions.contains(&"edit") {
        record.edit_link = Some("#edit".into());
    }
    record
}

#[test]
fn test_csv_export_can_be_read_back() {
    let records = vec![
        record(1, "Iuvaret0", "Apeirian, \"0\"", &["edit", "delete"]),
        record(2, "Ação", "linha\nquebrada", &["edit"]),
    ];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("table.csv");
    export::write_records_csv(&path, &records).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let rows = csv::parse_rows(&text, csv::COMMA);
    assert_eq!(rows.len(), 3);

    let header = &rows[0];
    assert_eq!(
        header,
        &vec![
            "row_index",
            "captured_at",
            "Lorem",
            "Ipsum",
            "available_actions",
            "edit_link",
            "delete_link"
        ]
    );

    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(rows[1][col("row_index")], "1");
    assert_eq!(rows[1][col("Ipsum")], "Apeirian, \"0\"");
    assert_eq!(rows[1][col("available_actions")], "[\"edit\",\"delete\"]");
    assert_eq!(rows[1][col("edit_link")], "#edit");
    assert_eq!(rows[1][col("delete_link")], "");
    assert_eq!(rows[2][col("Lorem")], "Ação");
    assert_eq!(rows[2][col("Ipsum")], "linha\nquebrada");
}

#[test]
fn test_csv_rejects_differing_key_sets() {
    let mut short = TableRecord::new(2);
    short.fields.insert("Lorem".into(), "x".into());
    let records = vec![record(1, "a", "b", &[]), short];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");
    let err = export::write_records_csv(&path, &records).unwrap_err();

    assert!(matches!(err, ExportError::KeyMismatch { row_index: 2, .. }));
    assert!(!path.exists());
}

#[test]
fn test_json_export_keeps_non_ascii() {
    let records = vec![record(1, "Olá", "ñ", &["delete"])];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.json");
    export::write_records_json(&path, &records).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"Lorem\": \"Olá\""));
    assert!(text.starts_with("[\n  {"));

    let back: Vec<TableRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, records);
}

#[test]
fn test_empty_record_set_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("empty.csv");
    let json_path = dir.path().join("empty.json");

    assert!(matches!(
        export::write_records_csv(&csv_path, &[]),
        Err(ExportError::Empty)
    ));
    assert!(matches!(
        export::write_records_json(&json_path, &[]),
        Err(ExportError::Empty)
    ));
    assert!(!csv_path.exists());
    assert!(!json_path.exists());
}
