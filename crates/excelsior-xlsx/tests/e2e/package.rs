//! Loading and saving whole packages

use crate::*;
use excelsior_core::{CellValue, FontPatch, StylePatch};
use excelsior_xlsx::{Compression, Package, SaveOptions};
use pretty_assertions::assert_eq;

/// One sheet, no styles part and no shared strings part
fn bare_workbook() -> Vec<u8> {
    build(&[
        (
            "[Content_Types].xml",
            content_types(&[
                ("xl/workbook.xml", "sheet.main"),
                ("xl/worksheets/sheet1.xml", "worksheet"),
            ]),
        ),
        ("_rels/.rels", ROOT_RELS.to_string()),
        (
            "xl/workbook.xml",
            format!(
                r#"<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="Only" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
                MAIN_NS, REL_NS
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            relationships(&[("worksheet", "worksheets/sheet1.xml")]),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<worksheet xmlns="{}"><sheetData><row r="1"><c r="A1"><v>7</v></c></row></sheetData></worksheet>"#,
                MAIN_NS
            ),
        ),
    ])
}

#[test]
fn test_missing_tables_are_created_on_save() {
    let mut package = Package::from_bytes(bare_workbook()).unwrap();
    {
        let ctx = package.context("Only").unwrap();
        assert_eq!(ctx.sheet.value(0, 0), Some(&CellValue::Number(7.0)));
        ctx.sheet.set_text(1, 0, "added", ctx.strings);
        let bold = ctx
            .styles
            .merge_partial(0, &StylePatch::new().font(FontPatch::new().bold(true)));
        ctx.sheet.set_style(1, 0, bold);
    }
    let bytes = package.to_bytes(&SaveOptions::default()).unwrap();

    let names = part_names(&bytes);
    assert!(names.contains(&"xl/sharedStrings.xml".to_string()));
    assert!(names.contains(&"xl/styles.xml".to_string()));

    let types = read_part(&bytes, "[Content_Types].xml").unwrap();
    assert!(types.contains(r#"PartName="/xl/sharedStrings.xml""#));
    assert!(types.contains(r#"PartName="/xl/styles.xml""#));
    let rels = read_part(&bytes, "xl/_rels/workbook.xml.rels").unwrap();
    assert!(rels.contains(r#"Target="sharedStrings.xml""#));
    assert!(rels.contains(r#"Target="styles.xml""#));

    let mut reopened = Package::from_bytes(bytes).unwrap();
    let ctx = reopened.context("Only").unwrap();
    let idx = match ctx.sheet.value(1, 0) {
        Some(CellValue::SharedString(idx)) => *idx,
        other => panic!("expected a shared string, got {:?}", other),
    };
    assert_eq!(ctx.strings.get(idx), Some("added"));
    let style = ctx.sheet.style_at(1, 0);
    assert!(ctx.styles.get(style).unwrap().font.bold);
}

#[test]
fn test_unedited_entries_keep_their_compressed_bytes() {
    let source = bare_workbook();
    let before = raw_entries(&source);

    let mut package = Package::from_bytes(source).unwrap();
    package.context("Only").unwrap().sheet.set_value(0, 1, CellValue::Boolean(true));
    let options = SaveOptions::new().compression(Compression::Stored);
    let after = raw_entries(&package.to_bytes(&options).unwrap());

    for name in ["[Content_Types].xml", "_rels/.rels", "xl/workbook.xml", "xl/_rels/workbook.xml.rels"] {
        assert_eq!(before[name], after[name], "{}", name);
    }
    // regenerated with the requested compression: stored bytes are the XML
    let sheet = String::from_utf8(after["xl/worksheets/sheet1.xml"].clone()).unwrap();
    assert!(sheet.contains(r#"<c r="B1" t="b"><v>1</v></c>"#), "{}", sheet);
}

#[test]
fn test_save_to_disk_twice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");

    let mut package = Package::from_bytes(bare_workbook()).unwrap();
    package.context("Only").unwrap().sheet.set_value(4, 0, CellValue::Number(1.5));
    package.save(&path, &SaveOptions::default()).unwrap();
    package.save(&path, &SaveOptions::default()).unwrap();

    let mut reopened = Package::open(&path).unwrap();
    let ctx = reopened.context("Only").unwrap();
    assert_eq!(ctx.sheet.value(4, 0), Some(&CellValue::Number(1.5)));
    assert_eq!(ctx.sheet.max_row(), Some(4));
}

#[test]
fn test_broken_packages() {
    let no_workbook = build(&[
        ("[Content_Types].xml", content_types(&[])),
        ("_rels/.rels", ROOT_RELS.to_string()),
    ]);
    let err = Package::from_bytes(no_workbook).unwrap_err();
    assert!(err.to_string().contains("xl/workbook.xml"), "{}", err);

    let no_types = build(&[("_rels/.rels", ROOT_RELS.to_string())]);
    assert!(Package::from_bytes(no_types).is_err());
}
