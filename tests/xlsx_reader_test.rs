//! Integration tests for the workbook reader.

mod common;

use common::{write_fixture, xlsx_package};
use unoffice::{
    load_bytes, load_file, load_xlsx, Error, LoadOptions, Metadata, MetadataValue, SheetOptions,
    Unoffice, XlsxReader,
};

fn inventory() -> Vec<u8> {
    xlsx_package(&[
        (
            "S1",
            vec![
                vec!["item", "qty"],
                vec!["apple", "3"],
                vec!["", ""],
                vec!["pear", "5"],
            ],
        ),
        ("S2", vec![vec!["city", "pop"], vec!["Oslo", "700000"]]),
    ])
}

#[test]
fn test_sheet_name_rows_in_workbook_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "inventory.xlsx", &inventory());

    let options = LoadOptions::new().with_sheet_name_rows(true);
    let units = load_xlsx(&path, &options).unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "S1\napple 3\npear 5\nS2\nOslo 700000");
    assert!(units[0].metadata.is_empty());
}

#[test]
fn test_all_sheets_without_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "inventory.xlsx", &inventory());

    let units = load_xlsx(&path, &LoadOptions::new()).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "apple 3\npear 5\nOslo 700000");
}

#[test]
fn test_single_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "inventory.xlsx", &inventory());

    let units = load_xlsx(&path, &LoadOptions::new().with_sheets("S2")).unwrap();
    assert_eq!(units[0].text, "Oslo 700000");
}

#[test]
fn test_unknown_sheet_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "inventory.xlsx", &inventory());

    let options = LoadOptions::new().with_sheets(vec!["S1", "Nope"]);
    let err = load_xlsx(&path, &options).unwrap_err();
    assert!(matches!(err, Error::SheetNotFound(ref name) if name == "Nope"));
    assert!(err.is_parse_error());
}

#[test]
fn test_custom_joiners_and_header_row() {
    let reader = XlsxReader::new()
        .with_row_joiner(" | ")
        .with_col_joiner(",")
        .with_sheet_options(SheetOptions::new().no_header());
    let units = reader
        .load_bytes_with(&inventory(), &LoadOptions::new().with_sheets("S1"))
        .unwrap();

    assert_eq!(units[0].text, "item,qty | apple,3 | pear,5");
}

#[test]
fn test_extra_info_becomes_metadata() {
    let mut extra = Metadata::new();
    extra.insert("file_name".into(), "inventory.xlsx".into());

    let options = LoadOptions::new().with_extra_info(extra.clone());
    let units = XlsxReader::new()
        .load_bytes_with(&inventory(), &options)
        .unwrap();
    assert_eq!(units[0].metadata, extra);
}

#[test]
fn test_builder_metadata_merges_with_call_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "inventory.xlsx", &inventory());

    let mut extra = Metadata::new();
    extra.insert("collection".into(), "ops".into());
    let options = LoadOptions::new().with_extra_info(extra);

    let units = Unoffice::new()
        .with_extra("collection", "finance")
        .with_extra("source", "share")
        .load_xlsx(&path, &options)
        .unwrap();

    assert_eq!(units[0].metadata["collection"], MetadataValue::from("ops"));
    assert_eq!(units[0].metadata["source"], MetadataValue::from("share"));
}

#[test]
fn test_missing_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_xlsx(dir.path().join("absent.xlsx"), &LoadOptions::new()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_corrupt_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "broken.xlsx", b"garbage, not a workbook");

    let err = load_xlsx(&path, &LoadOptions::new()).unwrap_err();
    assert!(err.is_parse_error(), "unexpected error: {err}");
}

#[test]
fn test_load_bytes_detects_workbook() {
    let units = load_bytes(&inventory(), None).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "apple 3\npear 5\nOslo 700000");
}

#[test]
fn test_load_file_without_workbook_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "export.dat", &inventory());

    let units = load_file(&path, None).unwrap();
    assert_eq!(units[0].text, "apple 3\npear 5\nOslo 700000");
}

#[test]
fn test_word_path_in_cell_text_still_reads_as_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let data = xlsx_package(&[(
        "Links",
        vec![
            vec!["page"],
            vec!["https://example.com/password/reset"],
        ],
    )]);
    let path = write_fixture(dir.path(), "export.dat", &data);

    let units = load_file(&path, None).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "https://example.com/password/reset");
}

#[test]
fn test_directory_path_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folder.xlsx");
    std::fs::create_dir(&path).unwrap();

    let err = load_xlsx(&path, &LoadOptions::new()).unwrap_err();
    assert!(err.is_parse_error(), "unexpected error: {err}");
    assert!(!err.is_not_found());
}

#[test]
fn test_rows_and_columns_count_from_a1() {
    let data = xlsx_package(&[(
        "Offset",
        vec![
            vec!["", "", ""],
            vec!["", "name", "qty"],
            vec!["", "bolt", "4"],
        ],
    )]);
    let reader = XlsxReader::new()
        .with_col_joiner(",")
        .with_sheet_options(SheetOptions::new().no_header().with_skip_rows(1));

    let units = reader.load_bytes_with(&data, &LoadOptions::new()).unwrap();
    assert_eq!(units[0].text, ",name,qty\n,bolt,4");

    let units = XlsxReader::new()
        .load_bytes_with(&data, &LoadOptions::new())
        .unwrap();
    assert_eq!(units[0].text, " bolt 4");
}
