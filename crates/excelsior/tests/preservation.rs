//! Parts and cells that were not edited must come out unchanged

use std::io::{Cursor, Read, Write};

use excelsior::prelude::*;
use excelsior::{Compression, FontPatch};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><bookViews><workbookView activeTab="0"/></bookViews><sheets><sheet name="Report" sheetId="1" r:id="rId1"/><sheet name="Notes" sheetId="2" r:id="rId2"/></sheets><calcPr calcId="191029"/></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

const SHEET1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><dimension ref="A1:B2"/><sheetViews><sheetView tabSelected="1" workbookViewId="0"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/></sheetView></sheetViews><sheetFormatPr defaultRowHeight="15"/><cols><col min="1" max="1" width="30" customWidth="1"/></cols><sheetData><row r="1" ht="24" customHeight="1"><c r="A1" s="1" t="s"><v>0</v></c><c r="B1" s="1" t="s"><v>1</v></c></row><row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>42</v></c></row></sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#;

const SHEET2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1"/><sheetData><row r="1"><c r="A1" t="s"><v>2</v></c></row></sheetData></worksheet>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="3"><si><t>Name</t></si><si><r><rPr><b/></rPr><t>Total</t></r><r><t xml:space="preserve"> (EUR)</t></r></si><si><t>alpha</t></si></sst>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font><font><b/><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles><dxfs count="0"/><tableStyles count="0"/></styleSheet>"#;

const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:creator>someone</dc:creator></cp:coreProperties>"#;

/// A small two-sheet workbook the way a spreadsheet application writes it,
/// stored uncompressed so raw copies are easy to tell apart
fn source_workbook() -> Vec<u8> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("docProps/core.xml", CORE),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", SHEET1),
        ("xl/worksheets/sheet2.xml", SHEET2),
        ("xl/sharedStrings.xml", SHARED_STRINGS),
        ("xl/styles.xml", STYLES),
    ];
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> (CompressionMethod, String) {
    let mut file = archive.by_name(name).unwrap();
    let mut body = String::new();
    file.read_to_string(&mut body).unwrap();
    (file.compression(), body)
}

fn open_output(path: &std::path::Path) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(std::fs::read(path).unwrap())).unwrap()
}

fn edited_copy(dir: &TempDir) -> std::path::PathBuf {
    let source = dir.path().join("source.xlsx");
    std::fs::write(&source, source_workbook()).unwrap();

    let mut editor = Editor::open(&source, Some("Report")).unwrap();
    editor.set_cell("A3", "beta").unwrap();
    editor
        .set_font("A2", FontPatch::new().italic(true))
        .unwrap();

    let out = dir.path().join("out.xlsx");
    editor
        .save_with(&out, &SaveOptions::new().compression(Compression::Deflated))
        .unwrap();
    out
}

#[test]
fn test_untouched_parts_are_copied_raw() {
    let dir = TempDir::new().unwrap();
    let out = edited_copy(&dir);
    let mut archive = open_output(&out);

    for (name, body) in [
        ("docProps/core.xml", CORE),
        ("xl/worksheets/sheet2.xml", SHEET2),
        ("xl/workbook.xml", WORKBOOK),
        ("[Content_Types].xml", CONTENT_TYPES),
    ] {
        assert_eq!(
            entry(&mut archive, name),
            (CompressionMethod::Stored, body.to_string()),
            "{}",
            name
        );
    }
    assert_eq!(
        entry(&mut archive, "xl/worksheets/sheet1.xml").0,
        CompressionMethod::Deflated
    );
}

#[test]
fn test_edited_sheet_keeps_surrounding_markup() {
    let dir = TempDir::new().unwrap();
    let out = edited_copy(&dir);
    let (_, sheet) = entry(&mut open_output(&out), "xl/worksheets/sheet1.xml");

    assert!(sheet.contains(r#"<dimension ref="A1:B3"/>"#), "{}", sheet);
    assert!(sheet.contains(r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>"#));
    assert!(sheet.contains(r#"<sheetFormatPr defaultRowHeight="15"/>"#));
    assert!(sheet.contains(r#"<col min="1" max="1" width="30" customWidth="1"/>"#));
    assert!(sheet.contains(r#"<row r="1" ht="24" customHeight="1">"#));
    assert!(sheet.contains(r#"<c r="B1" s="1" t="s"><v>1</v></c>"#));
    assert!(sheet.contains(r#"<c r="B2"><v>42</v></c>"#));
    assert!(sheet.contains(r#"<pageMargins left="0.7""#));
}

#[test]
fn test_shared_strings_and_styles_are_extended() {
    let dir = TempDir::new().unwrap();
    let out = edited_copy(&dir);
    let mut archive = open_output(&out);

    let (_, strings) = entry(&mut archive, "xl/sharedStrings.xml");
    assert!(strings.contains(
        r#"<si><r><rPr><b/></rPr><t>Total</t></r><r><t xml:space="preserve"> (EUR)</t></r></si>"#
    ));
    assert!(strings.contains("<si><t>beta</t></si>"));

    let (_, styles) = entry(&mut archive, "xl/styles.xml");
    assert!(styles.contains(r#"<fonts count="3">"#), "{}", styles);
    assert!(styles.contains(r#"<cellXfs count="3">"#));
    assert!(styles.contains(r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#));

    let mut reopened = Editor::open(&out, None).unwrap();
    assert_eq!(reopened.cell_text("B1").unwrap().as_deref(), Some("Total (EUR)"));
    assert_eq!(reopened.cell_text("A3").unwrap().as_deref(), Some("beta"));
    assert_eq!(reopened.cell_style("A1").unwrap(), 1);
    assert_eq!(reopened.cell_style("A2").unwrap(), 2);
    assert!(reopened.cell_format("A2").unwrap().font.italic);
    assert!(!reopened.cell_format("A2").unwrap().font.bold);
    assert_eq!(reopened.column_width("A").unwrap(), Some(30.0));
}

#[test]
fn test_scanner_does_not_load_sheets() {
    let scanner = Scanner::from_bytes(source_workbook()).unwrap();
    assert_eq!(scanner.get_sheets(), vec!["Report", "Notes"]);

    let mut notes = scanner.open_editor(Some("Notes")).unwrap();
    assert_eq!(notes.cell_text("A1").unwrap().as_deref(), Some("alpha"));

    // nothing edited: every entry is a raw copy
    let mut archive = ZipArchive::new(Cursor::new(notes.to_bytes().unwrap())).unwrap();
    for i in 0..archive.len() {
        let file = archive.by_index(i).unwrap();
        assert_eq!(file.compression(), CompressionMethod::Stored, "{}", file.name());
    }
}
