//! Minimal package used by `create` and for newly added parts

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::content_types::{ContentTypes, PART_NAME};
use crate::error::XlsxResult;
use crate::ns;
use crate::relationships::Relationships;
use crate::xml::{escape, XML_DECLARATION};

/// Body of a worksheet with no cells
pub fn empty_worksheet() -> String {
    format!(
        "{}<worksheet xmlns=\"{}\" xmlns:r=\"{}\"><dimension ref=\"A1\"/><sheetData/></worksheet>",
        XML_DECLARATION,
        ns::MAIN,
        ns::REL
    )
}

/// The stylesheet a new workbook starts with
pub fn default_styles() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!("<styleSheet xmlns=\"{}\">", ns::MAIN));
    xml.push_str(
        "<fonts count=\"1\"><font><sz val=\"11\"/><color theme=\"1\"/><name val=\"Calibri\"/>\
         <family val=\"2\"/><scheme val=\"minor\"/></font></fonts>",
    );
    xml.push_str(
        "<fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill>\
         <fill><patternFill patternType=\"gray125\"/></fill></fills>",
    );
    xml.push_str(
        "<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>",
    );
    xml.push_str(
        "<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>",
    );
    xml.push_str(
        "<cellXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/></cellXfs>",
    );
    xml.push_str(
        "<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>",
    );
    xml.push_str("<dxfs count=\"0\"/><tableStyles count=\"0\"/></styleSheet>");
    xml
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        "{}<workbook xmlns=\"{}\" xmlns:r=\"{}\"><bookViews><workbookView activeTab=\"0\"/></bookViews>\
         <sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
        XML_DECLARATION,
        ns::MAIN,
        ns::REL,
        escape(sheet_name)
    )
}

/// Zip bytes of a workbook holding one empty sheet named `sheet_name`.
///
/// The name is not validated here.
pub fn new_workbook(sheet_name: &str) -> XlsxResult<Vec<u8>> {
    let mut content_types = ContentTypes::minimal();
    content_types.set_override("xl/workbook.xml", ns::CT_WORKBOOK);
    content_types.set_override("xl/worksheets/sheet1.xml", ns::CT_WORKSHEET);
    content_types.set_override("xl/styles.xml", ns::CT_STYLES);

    let mut root_rels = Relationships::new();
    root_rels.add(ns::REL_OFFICE_DOCUMENT, "xl/workbook.xml");

    let mut workbook_rels = Relationships::new();
    workbook_rels.add(ns::REL_WORKSHEET, "worksheets/sheet1.xml");
    workbook_rels.add(ns::REL_STYLES, "styles.xml");

    let parts = [
        (PART_NAME, content_types.to_xml()),
        ("_rels/.rels", root_rels.to_xml()),
        ("xl/workbook.xml", workbook_xml(sheet_name)),
        ("xl/_rels/workbook.xml.rels", workbook_rels.to_xml()),
        ("xl/worksheets/sheet1.xml", empty_worksheet()),
        ("xl/styles.xml", default_styles()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}
