use portfolio_catalog::{BuiltinCatalog, Catalog, CatalogError};
use std::fs;
use tempfile::tempdir;

#[test]
fn custom_catalog_loads_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("course.json");
    fs::write(
        &path,
        r##"{
            "groups": [{"id": "wk1", "title": "Week 1"}],
            "entries": [
                {"id": "wk1-a", "group_id": "wk1", "text": "Read chapter 1", "link": "#"},
                {"id": "wk1-b", "group_id": "wk1", "text": "Submit quiz"}
            ]
        }"##,
    )
    .expect("write catalog");

    let catalog = Catalog::load(&path).expect("load");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.entry("wk1-b").map(|e| e.href()), Some("#"));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = Catalog::load(&path).unwrap_err();
    match err {
        CatalogError::ReadError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_catalog_fails_fast() {
    let err = Catalog::from_json_str(r#"{"groups": "u1"}"#).unwrap_err();
    assert!(matches!(err, CatalogError::ParseError(_)));
}

#[test]
fn builtin_resource_tags_drive_chips() {
    let catalog = BuiltinCatalog::Resources.load().expect("resources");
    let tags = catalog.all_tags();
    assert!(tags.contains(&"Unit 7"));
    assert!(tags.contains(&"Accessibility"));
    let mut sorted = tags.clone();
    sorted.sort_unstable();
    assert_eq!(tags, sorted);
}
