//! Packages whose parts use a namespace prefix instead of a default namespace

use crate::*;
use excelsior_core::{CellValue, Color, FillStyle, StylePatch};
use excelsior_xlsx::{Package, SaveOptions};
use pretty_assertions::assert_eq;

fn prefixed_workbook() -> Vec<u8> {
    build(&[
        (
            "[Content_Types].xml",
            content_types(&[
                ("xl/workbook.xml", "sheet.main"),
                ("xl/worksheets/sheet1.xml", "worksheet"),
                ("xl/styles.xml", "styles"),
            ]),
        ),
        ("_rels/.rels", ROOT_RELS.to_string()),
        (
            "xl/workbook.xml",
            format!(
                r#"<x:workbook xmlns:x="{}" xmlns:r="{}"><x:sheets><x:sheet name="Data" sheetId="1" r:id="rId1"/></x:sheets></x:workbook>"#,
                MAIN_NS, REL_NS
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            relationships(&[("worksheet", "worksheets/sheet1.xml"), ("styles", "styles.xml")]),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<x:worksheet xmlns:x="{}"><x:dimension ref="A1"/><x:sheetData><x:row r="1"><x:c r="A1" t="inlineStr"><x:is><x:t>inline</x:t></x:is></x:c></x:row></x:sheetData><x:pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></x:worksheet>"#,
                MAIN_NS
            ),
        ),
        (
            "xl/styles.xml",
            format!(
                concat!(
                    r#"<x:styleSheet xmlns:x="{}">"#,
                    r#"<x:fonts count="1"><x:font><x:sz val="11"/><x:name val="Calibri"/></x:font></x:fonts>"#,
                    r#"<x:fills count="2"><x:fill><x:patternFill patternType="none"/></x:fill><x:fill><x:patternFill patternType="gray125"/></x:fill></x:fills>"#,
                    r#"<x:borders count="1"><x:border><x:left/><x:right/><x:top/><x:bottom/><x:diagonal/></x:border></x:borders>"#,
                    r#"<x:cellXfs count="1"><x:xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></x:cellXfs>"#,
                    r#"</x:styleSheet>"#
                ),
                MAIN_NS
            ),
        ),
    ])
}

#[test]
fn test_prefixed_parts_are_edited_in_their_own_prefix() {
    let mut package = Package::from_bytes(prefixed_workbook()).unwrap();
    {
        let ctx = package.context("Data").unwrap();
        assert_eq!(
            ctx.sheet.value(0, 0),
            Some(&CellValue::InlineString("inline".into()))
        );
        ctx.sheet.set_value(0, 1, CellValue::Number(2.0));
        let filled = ctx.styles.merge_partial(
            0,
            &StylePatch::new().fill(FillStyle::solid(Color::rgb(0xFF, 0, 0))),
        );
        ctx.sheet.set_style(0, 1, filled);
    }
    let bytes = package.to_bytes(&SaveOptions::default()).unwrap();

    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml").unwrap();
    assert!(sheet.contains(r#"<x:dimension ref="A1:B1"/>"#), "{}", sheet);
    assert!(sheet.contains(r#"<x:c r="A1" t="inlineStr"><x:is><x:t>inline</x:t></x:is></x:c>"#));
    assert!(sheet.contains(r#"<x:c r="B1" s="1"><x:v>2</x:v></x:c>"#));
    assert!(sheet.contains("<x:pageMargins"));

    let styles = read_part(&bytes, "xl/styles.xml").unwrap();
    assert!(styles.contains(r#"<x:fills count="3">"#), "{}", styles);
    assert!(styles.contains(r#"<x:cellXfs count="2">"#));
    assert!(!styles.contains("<fill>"));

    // the workbook part was not touched
    let workbook = read_part(&bytes, "xl/workbook.xml").unwrap();
    assert!(workbook.starts_with("<x:workbook"));

    let mut reopened = Package::from_bytes(bytes).unwrap();
    let ctx = reopened.context("Data").unwrap();
    let style = ctx.sheet.style_at(0, 1);
    assert_eq!(style, 1);
    assert_eq!(
        ctx.styles.get(style).unwrap().fill,
        FillStyle::solid(Color::rgb(0xFF, 0, 0))
    );
}
