//! Adding, renaming and deleting sheets

use crate::*;
use excelsior_core::CellValue;
use excelsior_xlsx::{Package, SaveOptions};
use pretty_assertions::assert_eq;

fn sheet_xml(value: u32) -> String {
    format!(
        r#"<worksheet xmlns="{}"><sheetData><row r="1"><c r="A1"><v>{}</v></c></row></sheetData></worksheet>"#,
        MAIN_NS, value
    )
}

/// Sheets One, Two, Three plus a calculation chain and sheet-scoped names
fn three_sheets() -> Vec<u8> {
    build(&[
        (
            "[Content_Types].xml",
            content_types(&[
                ("xl/workbook.xml", "sheet.main"),
                ("xl/worksheets/sheet1.xml", "worksheet"),
                ("xl/worksheets/sheet2.xml", "worksheet"),
                ("xl/worksheets/sheet3.xml", "worksheet"),
                ("xl/calcChain.xml", "calcChain"),
            ]),
        ),
        ("_rels/.rels", ROOT_RELS.to_string()),
        (
            "xl/workbook.xml",
            format!(
                concat!(
                    r#"<workbook xmlns="{}" xmlns:r="{}">"#,
                    r#"<bookViews><workbookView activeTab="2"/></bookViews>"#,
                    r#"<sheets><sheet name="One" sheetId="1" r:id="rId1"/><sheet name="Two" sheetId="2" r:id="rId2"/><sheet name="Three" sheetId="3" r:id="rId3"/></sheets>"#,
                    r#"<definedNames><definedName name="_xlnm.Print_Area" localSheetId="2">Three!$A$1:$B$2</definedName><definedName name="OnTwo" localSheetId="1">Two!$A$1</definedName><definedName name="Everywhere">One!$A$1</definedName></definedNames>"#,
                    r#"</workbook>"#
                ),
                MAIN_NS, REL_NS
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            relationships(&[
                ("worksheet", "worksheets/sheet1.xml"),
                ("worksheet", "worksheets/sheet2.xml"),
                ("worksheet", "worksheets/sheet3.xml"),
                ("calcChain", "calcChain.xml"),
            ]),
        ),
        ("xl/worksheets/sheet1.xml", sheet_xml(1)),
        ("xl/worksheets/sheet2.xml", sheet_xml(2)),
        ("xl/worksheets/sheet3.xml", sheet_xml(3)),
        (
            "xl/worksheets/_rels/sheet2.xml.rels",
            relationships(&[("hyperlink", "https://example.com")]),
        ),
        (
            "xl/calcChain.xml",
            format!(r#"<calcChain xmlns="{}"><c r="A1" i="2"/></calcChain>"#, MAIN_NS),
        ),
    ])
}

#[test]
fn test_delete_sheet_removes_its_parts() {
    let mut package = Package::from_bytes(three_sheets()).unwrap();
    package.delete_sheet("Two").unwrap();
    let bytes = package.to_bytes(&SaveOptions::default()).unwrap();

    assert_eq!(
        part_names(&bytes),
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/_rels/workbook.xml.rels",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
            "xl/worksheets/sheet3.xml",
        ]
    );

    let types = read_part(&bytes, "[Content_Types].xml").unwrap();
    assert!(!types.contains("sheet2.xml"));
    assert!(!types.contains("calcChain"));

    let rels = read_part(&bytes, "xl/_rels/workbook.xml.rels").unwrap();
    assert!(!rels.contains(r#"Id="rId2""#));
    assert!(!rels.contains("calcChain"));

    let workbook = read_part(&bytes, "xl/workbook.xml").unwrap();
    assert!(workbook.contains(
        r#"<sheets><sheet name="One" sheetId="1" r:id="rId1"/><sheet name="Three" sheetId="3" r:id="rId3"/></sheets>"#
    ), "{}", workbook);
    assert!(workbook.contains(r#"localSheetId="1">Three!$A$1:$B$2</definedName>"#));
    assert!(!workbook.contains("OnTwo"));
    assert!(workbook.contains(r#"<definedName name="Everywhere">One!$A$1</definedName>"#));
    assert!(workbook.contains(r#"<workbookView activeTab="0"/>"#));

    let mut reopened = Package::from_bytes(bytes).unwrap();
    let ctx = reopened.context("Three").unwrap();
    assert_eq!(ctx.sheet.value(0, 0), Some(&CellValue::Number(3.0)));
}

#[test]
fn test_add_and_rename_keep_existing_ids() {
    let mut package = Package::from_bytes(three_sheets()).unwrap();
    package.rename_sheet("One", "First & Foremost").unwrap();
    assert_eq!(package.add_sheet("Four", Some(1)).unwrap(), 1);
    let bytes = package.to_bytes(&SaveOptions::default()).unwrap();

    let workbook = read_part(&bytes, "xl/workbook.xml").unwrap();
    assert!(workbook.contains(r#"<sheet name="First &amp; Foremost" sheetId="1" r:id="rId1"/>"#));
    assert!(workbook.contains(r#"<sheet name="Four" sheetId="4" r:id="rId5"/>"#), "{}", workbook);
    // Three moved from position 2 to 3
    assert!(workbook.contains(r#"localSheetId="3">Three!$A$1:$B$2</definedName>"#));
    assert!(workbook.contains(r#"localSheetId="2">Two!$A$1</definedName>"#));

    assert!(part_names(&bytes).contains(&"xl/worksheets/sheet4.xml".to_string()));
    assert!(read_part(&bytes, "xl/calcChain.xml").is_some());

    let reopened = Package::from_bytes(bytes).unwrap();
    assert_eq!(
        reopened.sheet_names(),
        vec!["First & Foremost", "Four", "Two", "Three"]
    );
}
