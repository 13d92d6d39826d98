//! End-to-end editing scenarios (create/open -> edit -> save -> reopen)

use excelsior::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn workbook(dir: &TempDir, name: &str, sheet: &str) -> (std::path::PathBuf, Editor) {
    let path = dir.path().join(name);
    let editor = excelsior::create(&path, sheet).unwrap();
    (path, editor)
}

#[test]
fn test_create_edit_save_reopen() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "data.xlsx", "Data");

    editor.set_cell("A1", "name").unwrap();
    editor.set_cell("B1", "value").unwrap();
    editor.set_cell("A2", "alpha").unwrap();
    editor.set_cell("B2", "10").unwrap();
    editor.save(&path).unwrap();

    let scanner = excelsior::scan(&path).unwrap();
    assert_eq!(scanner.get_sheets(), vec!["Data"]);

    let mut reopened = scanner.open_editor(None).unwrap();
    assert_eq!(reopened.cell_text("A1").unwrap().as_deref(), Some("name"));
    assert_eq!(reopened.cell_text("B2").unwrap().as_deref(), Some("10"));
    // text stays text
    assert!(matches!(
        reopened.cell_value("B2").unwrap(),
        Some(CellValue::SharedString(_))
    ));
}

#[test]
fn test_column_widths_in_every_form() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "widths.xlsx", "Sheet1");

    editor.set_column_width("A", 18.5).unwrap();
    editor.set_column_width_range("B:D", 22.0).unwrap();
    editor.set_columns_width(&["F", "H:I"], 12.25).unwrap();
    editor
        .set_column_widths([("K", 14.0), ("M:N", 33.0)])
        .unwrap();
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, None).unwrap();
    let expected = [
        ("A", Some(18.5)),
        ("B", Some(22.0)),
        ("C", Some(22.0)),
        ("D", Some(22.0)),
        ("E", None),
        ("F", Some(12.25)),
        ("G", None),
        ("H", Some(12.25)),
        ("I", Some(12.25)),
        ("K", Some(14.0)),
        ("L", None),
        ("M", Some(33.0)),
        ("N", Some(33.0)),
    ];
    for (col, width) in expected {
        assert_eq!(reopened.column_width(col).unwrap(), width, "column {}", col);
    }
}

#[test]
fn test_width_overrides_only_the_overlap() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "overlap.xlsx", "Sheet1");

    editor.set_column_width_range("A:E", 10.0).unwrap();
    editor.set_column_width_range("C:D", 20.0).unwrap();
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, None).unwrap();
    let widths: Vec<_> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|c| reopened.column_width(c).unwrap())
        .collect();
    assert_eq!(
        widths,
        vec![Some(10.0), Some(10.0), Some(20.0), Some(20.0), Some(10.0)]
    );
}

#[test]
fn test_width_validation_errors() {
    let dir = TempDir::new().unwrap();
    let (_, mut editor) = workbook(&dir, "errors.xlsx", "Sheet1");

    let empty = editor.set_column_width("", 10.0).unwrap_err();
    assert!(matches!(
        empty,
        Error::Core(excelsior_core::Error::InvalidColumn(_))
    ));
    let zero = editor.set_column_width("A", 0.0).unwrap_err();
    assert!(matches!(
        zero,
        Error::Core(excelsior_core::Error::InvalidWidth(_))
    ));
    let reversed = editor.set_column_width_range("D:B", 10.0).unwrap_err();
    assert!(matches!(
        reversed,
        Error::Core(excelsior_core::Error::InvalidRange(_))
    ));

    for err in [empty, zero, reversed] {
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(editor.column_width("A").unwrap(), None);
}

#[test]
fn test_alignment_on_open_range() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "align.xlsx", "Sheet1");

    editor
        .append_table_at(
            "A1",
            &[vec!["header"], vec!["row one"], vec!["row two"]],
        )
        .unwrap();
    editor
        .set_alignment(
            "A2:",
            AlignSpec::new().horizontal(HorizontalAlignment::Center),
        )
        .unwrap();
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, Some("Sheet1")).unwrap();
    assert_eq!(reopened.cell_style("A1").unwrap(), 0);
    for addr in ["A2", "A3"] {
        let format = reopened.cell_format(addr).unwrap();
        assert_eq!(
            format.alignment.horizontal,
            Some(HorizontalAlignment::Center),
            "{}",
            addr
        );
    }
    assert_eq!(reopened.cell_style("A4").unwrap(), 0);
}

#[test]
fn test_same_patch_on_disjoint_ranges_shares_a_style() {
    let dir = TempDir::new().unwrap();
    let (_, mut editor) = workbook(&dir, "dedup.xlsx", "Sheet1");

    let fill = FillStyle::solid(Color::rgb(0xFF, 0xFF, 0x00));
    editor.set_fill("A1:B2", fill.clone()).unwrap();
    editor.set_fill("D5:E6", fill).unwrap();

    let first = editor.cell_style("A1").unwrap();
    assert_ne!(first, 0);
    for addr in ["B2", "D5", "E6"] {
        assert_eq!(editor.cell_style(addr).unwrap(), first);
    }
}

#[test]
fn test_remove_style_leaves_other_cells() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "remove.xlsx", "Sheet1");

    editor.append_table_at("A1", &[vec!["a", "b"]]).unwrap();
    editor
        .set_font("A1:B1", FontPatch::new().bold(true))
        .unwrap();
    let bold = editor.cell_style("B1").unwrap();

    editor.remove_style("A1").unwrap();
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, None).unwrap();
    assert_eq!(reopened.cell_style("A1").unwrap(), 0);
    assert_eq!(reopened.cell_style("B1").unwrap(), bold);
    assert!(reopened.cell_format("B1").unwrap().font.bold);
    assert_eq!(reopened.cell_text("A1").unwrap().as_deref(), Some("a"));
}

#[test]
fn test_last_row_index_tracks_interleaved_writes() {
    let dir = TempDir::new().unwrap();
    let (_, mut editor) = workbook(&dir, "last.xlsx", "Sheet1");

    assert_eq!(editor.last_row_index("A").unwrap(), None);
    editor.set_cell("A3", "x").unwrap();
    editor
        .append_table_at("A1", &[vec!["h", "h"], vec!["1", "2"]])
        .unwrap();
    assert_eq!(editor.last_row_index("A").unwrap(), Some(2));
    assert_eq!(editor.last_row_index("B1").unwrap(), Some(1));

    editor.set_cell_number("B10", 1.0).unwrap();
    editor.clear_cell("A3").unwrap();
    assert_eq!(
        editor.last_rows_index(&["A", "B", "A:B", "C"]).unwrap(),
        vec![Some(1), Some(9), Some(9), None]
    );
}

#[test]
fn test_bulk_load_keeps_types_and_styles() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "bulk.xlsx", "Sheet1");

    editor.set_cell("D1", "outside").unwrap();
    editor
        .set_font("D1", FontPatch::new().italic(true))
        .unwrap();
    editor
        .set_fill("A2", FillStyle::solid(Color::rgb(0, 0xFF, 0)))
        .unwrap();
    let outside = editor.cell_style("D1").unwrap();
    let inside = editor.cell_style("A2").unwrap();

    let batch = ColumnBatch::new(vec![
        TypedColumn::ints("id", vec![Some(1), Some(2), None]),
        TypedColumn::floats("score", vec![Some(0.5), Some(1.25), Some(2.0)]),
        TypedColumn::texts(
            "label",
            vec![Some("a".into()), None, Some("c".into())],
        ),
    ])
    .unwrap();
    let block = editor.bulk_load_columnar("A1", &batch).unwrap().unwrap();
    assert_eq!(block.to_string(), "A1:C4");
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, None).unwrap();
    assert_eq!(reopened.cell_text("A1").unwrap().as_deref(), Some("id"));
    assert_eq!(
        reopened.cell_value("A2").unwrap(),
        Some(CellValue::Number(1.0))
    );
    assert_eq!(reopened.cell_value("A4").unwrap(), None);
    assert_eq!(
        reopened.cell_value("B3").unwrap(),
        Some(CellValue::Number(1.25))
    );
    assert_eq!(reopened.cell_text("C4").unwrap().as_deref(), Some("c"));

    assert_eq!(reopened.cell_style("D1").unwrap(), outside);
    assert_eq!(reopened.cell_style("A2").unwrap(), inside);
}

#[test]
fn test_sheet_management_round_trip() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "sheets.xlsx", "First");

    editor.add_worksheet("Third").unwrap();
    editor.add_worksheet_at("Second", 1).unwrap();
    editor.add_worksheet("Scratch").unwrap();
    editor.with_worksheet("Second").unwrap();
    editor.set_cell("A1", "in second").unwrap();
    editor.rename_worksheet("Third", "Last").unwrap();
    editor.delete_worksheet("Scratch").unwrap();
    editor.save(&path).unwrap();

    let scanner = excelsior::scan(&path).unwrap();
    assert_eq!(scanner.get_sheets(), vec!["First", "Second", "Last"]);

    let mut second = scanner.open_editor(Some("Second")).unwrap();
    assert_eq!(second.cell_text("A1").unwrap().as_deref(), Some("in second"));

    assert!(matches!(
        second.add_worksheet("first"),
        Err(Error::Core(excelsior_core::Error::DuplicateSheetName(_)))
    ));
    assert!(second.add_worksheet("bad/name").unwrap_err().is_validation());
}

#[test]
fn test_merge_cells_round_trip() {
    let dir = TempDir::new().unwrap();
    let (path, mut editor) = workbook(&dir, "merge.xlsx", "Sheet1");

    editor.set_cell("A1", "title").unwrap();
    editor.merge_cells("A1:D1").unwrap();
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, None).unwrap();
    assert!(!reopened.merge_cells("A1:D1").unwrap());
    assert!(reopened.merge_cells("B1:B2").is_err());
}

#[test]
fn test_scanner_errors() {
    let dir = TempDir::new().unwrap();
    let (path, _) = workbook(&dir, "one.xlsx", "Only");

    let missing = excelsior::scan(&path)
        .unwrap()
        .open_editor(Some("Nope"))
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let garbage = dir.path().join("garbage.xlsx");
    std::fs::write(&garbage, b"definitely not a zip").unwrap();
    assert_eq!(
        excelsior::scan(&garbage).unwrap_err().kind(),
        ErrorKind::Format
    );

    let absent = dir.path().join("absent.xlsx");
    assert_eq!(excelsior::scan(&absent).unwrap_err().kind(), ErrorKind::Io);
}

#[test]
fn test_save_over_source() {
    let dir = TempDir::new().unwrap();
    let (path, _) = workbook(&dir, "inplace.xlsx", "Sheet1");

    let mut editor = Editor::open(&path, None).unwrap();
    editor.set_cell("A1", "first").unwrap();
    editor.save(&path).unwrap();
    editor.set_cell("A2", "second").unwrap();
    editor.save(&path).unwrap();

    let mut reopened = Editor::open(&path, None).unwrap();
    assert_eq!(reopened.cell_text("A1").unwrap().as_deref(), Some("first"));
    assert_eq!(reopened.cell_text("A2").unwrap().as_deref(), Some("second"));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
