//! `xl/workbook.xml`: the sheet list

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use excelsior_core::workbook::{SheetList, SheetRef};

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr, with_attribute};

/// A `<sheet>` entry before its relationship has been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: u32,
    pub rel_id: String,
    pub state: Option<String>,
}

/// `r:id` under whatever prefix the file binds to the relationships namespace
fn relationship_id(e: &BytesStart<'_>) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        let key = a.key;
        let is_rel_id = key.local_name().as_ref() == b"id" && key.prefix().is_some();
        if is_rel_id {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Read the `<sheets>` of a workbook part, in order
pub fn read_sheet_entries(xml: &[u8]) -> XlsxResult<Vec<SheetEntry>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attr(&e, b"name");
                let rel_id = relationship_id(&e);
                let sheet_id = attr(&e, b"sheetId").and_then(|v| v.parse::<u32>().ok());

                match (name, rel_id, sheet_id) {
                    (Some(name), Some(rel_id), Some(sheet_id)) => sheets.push(SheetEntry {
                        name,
                        sheet_id,
                        rel_id,
                        state: attr(&e, b"state"),
                    }),
                    _ => {
                        return Err(XlsxError::parse(
                            "xl/workbook.xml",
                            "<sheet> without name, sheetId or r:id",
                        ))
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Rewrite workbook.xml for the current sheet list.
///
/// Only `<sheets>` is regenerated. Sheet-scoped defined names are remapped
/// to the sheets' new positions (and dropped with a deleted sheet), and a
/// `workbookView` pointing past the last sheet is reset to the first one.
/// Everything else is copied through.
///
/// `original_ids` lists the `sheetId`s in the order the source file had
/// them; `localSheetId` values index into that order.
pub fn rewrite_workbook(
    source: &[u8],
    sheets: &SheetList,
    original_ids: &[u32],
) -> XlsxResult<Vec<u8>> {
    let mut reader = Reader::from_reader(source);
    let mut writer = Writer::new(Vec::with_capacity(source.len() + 256));

    let remap = |e: &BytesStart<'_>| -> Option<BytesStart<'static>> {
        let local = attr(e, b"localSheetId")?;
        let old = local.parse::<usize>().ok()?;
        let id = original_ids.get(old)?;
        let pos = sheets.iter().position(|s| s.sheet_id == *id)?;
        Some(with_attribute(e, "localSheetId", &pos.to_string()))
    };
    let is_scoped_name =
        |e: &BytesStart<'_>| e.local_name().as_ref() == b"definedName" && attr(e, b"localSheetId").is_some();
    let is_view = |e: &BytesStart<'_>| e.local_name().as_ref() == b"workbookView";

    let mut buf = Vec::new();
    let mut skip = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"sheets" => {
                let end = e.to_end().into_owned();
                reader.read_to_end_into(e.name(), &mut skip)?;
                skip.clear();
                write_sheets(&mut writer, &e, end, sheets)?;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"sheets" => {
                let end = BytesEnd::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                write_sheets(&mut writer, &e, end, sheets)?;
            }
            Event::Start(e) if is_scoped_name(&e) => match remap(&e) {
                Some(start) => writer.write_event(Event::Start(start))?,
                None => {
                    log::debug!("dropping defined name scoped to a removed sheet");
                    reader.read_to_end_into(e.name(), &mut skip)?;
                    skip.clear();
                }
            },
            Event::Empty(e) if is_scoped_name(&e) => {
                if let Some(start) = remap(&e) {
                    writer.write_event(Event::Empty(start))?;
                }
            }
            Event::Start(e) if is_view(&e) => {
                writer.write_event(Event::Start(clamp_view(&e, sheets.len())))?
            }
            Event::Empty(e) if is_view(&e) => {
                writer.write_event(Event::Empty(clamp_view(&e, sheets.len())))?
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn write_sheets(
    writer: &mut Writer<Vec<u8>>,
    start: &BytesStart<'_>,
    end: BytesEnd<'static>,
    sheets: &SheetList,
) -> XlsxResult<()> {
    let prefix = match start.name().prefix() {
        Some(p) => format!("{}:", String::from_utf8_lossy(p.as_ref())),
        None => String::new(),
    };

    writer.write_event(Event::Start(start.to_owned()))?;
    for sheet in sheets.iter() {
        let mut e = BytesStart::new(format!("{}sheet", prefix));
        e.push_attribute(("name", sheet.name.as_str()));
        e.push_attribute(("sheetId", sheet.sheet_id.to_string().as_str()));
        if let Some(state) = &sheet.state {
            e.push_attribute(("state", state.as_str()));
        }
        e.push_attribute(("r:id", sheet.rel_id.as_str()));
        writer.write_event(Event::Empty(e))?;
    }
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// Copy of `e` with one attribute replaced (or added)
fn clamp_view(e: &BytesStart<'_>, sheet_count: usize) -> BytesStart<'static> {
    let mut out = e.to_owned();
    for key in ["activeTab", "firstSheet"] {
        let out_of_range = attr(&out, key.as_bytes())
            .and_then(|v| v.parse::<usize>().ok())
            .is_some_and(|v| v >= sheet_count);
        if out_of_range {
            out = with_attribute(&out, key, "0");
        }
    }
    out
}

/// Pair `<sheet>` entries with their parts through the workbook rels
pub fn resolve_sheets(
    entries: Vec<SheetEntry>,
    rels: &crate::relationships::Relationships,
    workbook_part: &str,
) -> XlsxResult<SheetList> {
    let mut sheets = Vec::with_capacity(entries.len());
    for entry in entries {
        let rel = rels.get(&entry.rel_id).ok_or_else(|| {
            XlsxError::InvalidFormat(format!(
                "sheet {:?} refers to missing relationship {}",
                entry.name, entry.rel_id
            ))
        })?;
        sheets.push(SheetRef {
            part: crate::xml::resolve_target(workbook_part, &rel.target),
            name: entry.name,
            sheet_id: entry.sheet_id,
            rel_id: entry.rel_id,
            state: entry.state,
        });
    }
    Ok(SheetList::new(sheets))
}
