//! Worksheet parts (`xl/worksheets/sheetN.xml`)
//!
//! Reading streams `<sheetData>`, `<cols>` and `<mergeCells>` into a
//! [`SheetStore`]. Writing streams the source part through and replaces
//! exactly those elements plus `<dimension>`; views, page setup,
//! conditional formats, drawings and the rest are copied as they were.

use std::io::{BufRead, Write};

use ahash::AHashSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use excelsior_core::cell::format_number;
use excelsior_core::{
    Cell, CellAddress, CellRange, CellValue, ColumnWidth, FormulaCell, SheetStore,
};

use crate::error::{XlsxError, XlsxResult};
use crate::shared_strings::space_attr;
use crate::xml::{
    attr, attributes, decode_excel_escapes, encode_excel_escapes, escape, push_attributes,
    read_inner, root_prefix,
};

/// Elements that follow `<mergeCells>` in a worksheet
const AFTER_MERGE_CELLS: [&[u8]; 24] = [
    b"phoneticPr",
    b"conditionalFormatting",
    b"dataValidations",
    b"hyperlinks",
    b"printOptions",
    b"pageMargins",
    b"pageSetup",
    b"headerFooter",
    b"rowBreaks",
    b"colBreaks",
    b"customProperties",
    b"cellWatches",
    b"ignoredErrors",
    b"smartTags",
    b"drawing",
    b"legacyDrawing",
    b"legacyDrawingHF",
    b"drawingHF",
    b"picture",
    b"oleObjects",
    b"controls",
    b"webPublishItems",
    b"tableParts",
    b"extLst",
];

/// Read a worksheet part into a store.
///
/// `part` is only used in error messages.
pub fn read_worksheet<R: BufRead>(source: R, part: &str) -> XlsxResult<SheetStore> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);

    let mut sheet = SheetStore::new();
    let mut buf = Vec::new();
    let mut next_row = 0u32;
    let mut next_col = 0u16;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    let row = row_index(&e, next_row, part)?;
                    sheet.set_row_attributes(row, row_attributes(&e));
                    next_row = row + 1;
                    next_col = 0;
                }
                b"c" => {
                    let (addr, cell) = read_cell(&mut reader, &e, next_row, next_col, part)?;
                    next_col = addr.col.saturating_add(1);
                    sheet.insert_cell(addr.row, addr.col, cell);
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    let row = row_index(&e, next_row, part)?;
                    sheet.set_row_attributes(row, row_attributes(&e));
                    next_row = row + 1;
                    next_col = 0;
                }
                b"c" => {
                    let addr = cell_address(&e, next_row, next_col, part)?;
                    let cell = Cell {
                        value: CellValue::Empty,
                        style: style_index(&e),
                        extra: cell_extra(&e),
                    };
                    next_col = addr.col.saturating_add(1);
                    sheet.insert_cell(addr.row, addr.col, cell);
                }
                b"col" => {
                    if let Some(run) = column_run(&e) {
                        sheet.columns_mut().push_loaded(run);
                    }
                }
                b"mergeCell" => match attr(&e, b"ref").map(|r| CellRange::parse(&r)) {
                    Some(Ok(range)) => sheet.merged_mut().push_loaded(range),
                    Some(Err(err)) => log::warn!("{}: skipping merged range: {}", part, err),
                    None => {}
                },
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "{}: {} rows, {} cells, {} column runs, {} merged ranges",
        part,
        sheet.row_count(),
        sheet.cell_count(),
        sheet.columns().len(),
        sheet.merged().len()
    );

    sheet.mark_clean();
    Ok(sheet)
}

/// 0-based row from `r`, or the row after the previous one
fn row_index(e: &BytesStart<'_>, next_row: u32, part: &str) -> XlsxResult<u32> {
    match attr(e, b"r") {
        None => Ok(next_row),
        Some(r) => match r.parse::<u32>() {
            Ok(n) if (1..=excelsior_core::MAX_ROWS).contains(&n) => Ok(n - 1),
            _ => Err(XlsxError::parse(part, format!("invalid row number {:?}", r))),
        },
    }
}

fn row_attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    attributes(e)
        .into_iter()
        .filter(|(k, _)| k != "r")
        .collect()
}

fn cell_address(
    e: &BytesStart<'_>,
    next_row: u32,
    next_col: u16,
    part: &str,
) -> XlsxResult<CellAddress> {
    match attr(e, b"r") {
        Some(r) => CellAddress::parse(&r)
            .map_err(|err| XlsxError::parse(part, format!("cell reference {:?}: {}", r, err))),
        None => Ok(CellAddress::new(next_row.saturating_sub(1), next_col)),
    }
}

fn style_index(e: &BytesStart<'_>) -> u32 {
    attr(e, b"s")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0)
}

fn cell_extra(e: &BytesStart<'_>) -> Vec<(String, String)> {
    attributes(e)
        .into_iter()
        .filter(|(k, _)| !matches!(k.as_str(), "r" | "s" | "t"))
        .collect()
}

fn column_run(e: &BytesStart<'_>) -> Option<ColumnWidth> {
    let bound = |key: &[u8]| {
        attr(e, key)
            .and_then(|v| v.parse::<u16>().ok())
            .filter(|v| (1..=excelsior_core::MAX_COLS).contains(v))
    };
    let (min, max) = match (bound(b"min"), bound(b"max")) {
        (Some(min), Some(max)) => (min, max),
        _ => {
            log::warn!("skipping <col> without a valid min/max");
            return None;
        }
    };
    Some(ColumnWidth {
        first: min - 1,
        last: max - 1,
        width: attr(e, b"width").and_then(|w| w.parse::<f64>().ok()),
        attributes: attributes(e)
            .into_iter()
            .filter(|(k, _)| !matches!(k.as_str(), "min" | "max" | "width"))
            .collect(),
    })
}

/// Read one `<c>` whose start tag was just consumed
fn read_cell<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
    next_row: u32,
    next_col: u16,
    part: &str,
) -> XlsxResult<(CellAddress, Cell)> {
    let addr = cell_address(start, next_row, next_col, part)?;
    let cell_type = attr(start, b"t");

    let mut value: Option<String> = None;
    let mut formula: Option<(Vec<(String, String)>, String)> = None;
    let mut inline = String::new();
    let mut open: Vec<Vec<u8>> = Vec::new();

    read_inner(reader, |event| {
        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"f" {
                    formula = Some((attributes(e), String::new()));
                }
                open.push(name);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"f" => {
                formula = Some((attributes(e), String::new()));
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                match open.last().map(Vec::as_slice) {
                    Some(b"v") => value.get_or_insert_with(String::new).push_str(&text),
                    Some(b"f") => {
                        if let Some((_, f)) = &mut formula {
                            f.push_str(&text);
                        }
                    }
                    Some(b"t") if !open.iter().any(|n| n == b"rPh") => inline.push_str(&text),
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    })?;

    let value = match formula {
        Some((attributes, text)) => CellValue::Formula(Box::new(FormulaCell {
            text,
            attributes,
            cached: value,
            cached_type: cell_type,
        })),
        None => cell_value(cell_type.as_deref(), value, inline, addr, part)?,
    };

    Ok((
        addr,
        Cell {
            value,
            style: style_index(start),
            extra: cell_extra(start),
        },
    ))
}

fn cell_value(
    cell_type: Option<&str>,
    value: Option<String>,
    inline: String,
    addr: CellAddress,
    part: &str,
) -> XlsxResult<CellValue> {
    let bad = |what: &str, v: &str| {
        XlsxError::parse(part, format!("{} at {}: {:?}", what, addr, v))
    };

    Ok(match (cell_type, value) {
        (Some("inlineStr"), _) => CellValue::InlineString(decode_excel_escapes(&inline).into_owned()),
        (_, None) => CellValue::Empty,
        (Some("s"), Some(v)) => match v.trim().parse::<u32>() {
            Ok(idx) => CellValue::SharedString(idx),
            Err(_) => return Err(bad("shared string index", &v)),
        },
        (Some("b"), Some(v)) => CellValue::Boolean(matches!(v.trim(), "1" | "true")),
        (Some("e"), Some(v)) => CellValue::Error(v),
        (Some("n") | None, Some(v)) => match v.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => return Err(bad("number", &v)),
        },
        (Some(other), Some(v)) => {
            if !matches!(other, "d" | "str") {
                log::warn!("{}: unknown cell type {:?} at {}", part, other, addr);
            }
            CellValue::Raw {
                cell_type: other.to_string(),
                value: v,
            }
        }
    })
}

/// Stream `source` into `out`, replacing the parts `sheet` owns.
pub fn write_worksheet<W: Write>(source: &[u8], sheet: &SheetStore, out: &mut W) -> XlsxResult<()> {
    let prefix = root_prefix(source)?;
    let p = prefix.as_str();

    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);
    let mut writer = Writer::new(out);

    let mut depth = 0usize;
    let mut cols_done = false;
    let mut data_done = false;
    let mut merges_done = false;
    let mut buf = Vec::new();
    let mut skip = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        let top_level = match &event {
            Event::Start(e) | Event::Empty(e) if depth == 1 => Some(e.local_name().as_ref().to_vec()),
            _ => None,
        };

        if let Some(name) = top_level {
            let owned = matches!(
                name.as_slice(),
                b"dimension" | b"cols" | b"sheetData" | b"mergeCells"
            );
            if name == b"sheetData" && !cols_done {
                write_cols(writer.get_mut(), sheet, p)?;
                cols_done = true;
            }
            if AFTER_MERGE_CELLS.contains(&name.as_slice()) && !merges_done {
                write_merges(writer.get_mut(), sheet, p)?;
                merges_done = true;
            }

            if owned {
                if let Event::Start(e) = &event {
                    reader.read_to_end_into(e.name(), &mut skip)?;
                    skip.clear();
                }
                match name.as_slice() {
                    b"dimension" => write_dimension(writer.get_mut(), sheet, p)?,
                    b"cols" => {
                        write_cols(writer.get_mut(), sheet, p)?;
                        cols_done = true;
                    }
                    b"sheetData" => {
                        write_sheet_data(writer.get_mut(), sheet, p)?;
                        data_done = true;
                    }
                    _ => {
                        write_merges(writer.get_mut(), sheet, p)?;
                        merges_done = true;
                    }
                }
                continue;
            }
        }

        match event {
            Event::Start(e) => {
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if !data_done {
                        if !cols_done {
                            write_cols(writer.get_mut(), sheet, p)?;
                            cols_done = true;
                        }
                        write_sheet_data(writer.get_mut(), sheet, p)?;
                        data_done = true;
                    }
                    if !merges_done {
                        write_merges(writer.get_mut(), sheet, p)?;
                        merges_done = true;
                    }
                }
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(())
}

fn write_dimension<W: Write>(out: &mut W, sheet: &SheetStore, p: &str) -> XlsxResult<()> {
    let range = sheet
        .dimension()
        .map_or_else(|| "A1".to_string(), |r| r.to_a1_string());
    write!(out, "<{p}dimension ref=\"{}\"/>", range)?;
    Ok(())
}

fn write_cols<W: Write>(out: &mut W, sheet: &SheetStore, p: &str) -> XlsxResult<()> {
    if sheet.columns().is_empty() {
        return Ok(());
    }
    let mut xml = format!("<{p}cols>");
    for run in sheet.columns().iter() {
        xml.push_str(&format!(
            "<{p}col min=\"{}\" max=\"{}\"",
            run.first + 1,
            run.last + 1
        ));
        if let Some(width) = run.width {
            xml.push_str(&format!(" width=\"{}\"", format_number(width)));
        }
        push_attributes(&mut xml, &run.attributes);
        xml.push_str("/>");
    }
    xml.push_str(&format!("</{p}cols>"));
    out.write_all(xml.as_bytes())?;
    Ok(())
}

fn write_merges<W: Write>(out: &mut W, sheet: &SheetStore, p: &str) -> XlsxResult<()> {
    let merged = sheet.merged();
    if merged.is_empty() {
        return Ok(());
    }
    let mut xml = format!("<{p}mergeCells count=\"{}\">", merged.len());
    for range in merged.iter() {
        xml.push_str(&format!("<{p}mergeCell ref=\"{}\"/>", range.to_a1_string()));
    }
    xml.push_str(&format!("</{p}mergeCells>"));
    out.write_all(xml.as_bytes())?;
    Ok(())
}

fn write_sheet_data<W: Write>(out: &mut W, sheet: &SheetStore, p: &str) -> XlsxResult<()> {
    if sheet.row_count() == 0 {
        write!(out, "<{p}sheetData/>")?;
        return Ok(());
    }

    let masters: AHashSet<&str> = sheet
        .rows()
        .flat_map(|(_, data)| data.cells.values())
        .filter_map(|cell| match &cell.value {
            CellValue::Formula(f) if f.is_shared_master() => f.shared_index(),
            _ => None,
        })
        .collect();

    write!(out, "<{p}sheetData>")?;
    let mut xml = String::new();
    for (row, data) in sheet.rows() {
        xml.clear();
        xml.push_str(&format!("<{p}row r=\"{}\"", row + 1));
        push_attributes(&mut xml, &data.attributes);
        if data.cells.is_empty() {
            xml.push_str("/>");
        } else {
            xml.push('>');
            for (col, cell) in &data.cells {
                let addr = CellAddress::new(row, *col);
                match orphaned(cell, &masters) {
                    Some(detached) => {
                        log::debug!("{}: shared formula lost its master, keeping the value", addr);
                        push_cell(&mut xml, addr, &detached, p);
                    }
                    None => push_cell(&mut xml, addr, cell, p),
                }
            }
            xml.push_str(&format!("</{p}row>"));
        }
        out.write_all(xml.as_bytes())?;
    }
    write!(out, "</{p}sheetData>")?;
    Ok(())
}

/// A dependent of a shared formula whose master cell was overwritten
/// cannot be written as a formula; it keeps its cached result instead.
fn orphaned(cell: &Cell, masters: &AHashSet<&str>) -> Option<Cell> {
    let CellValue::Formula(f) = &cell.value else {
        return None;
    };
    let si = f.shared_index()?;
    if f.is_shared_master() || masters.contains(si) {
        return None;
    }
    Some(Cell {
        value: f.cached_value(),
        ..cell.clone()
    })
}

fn push_cell(xml: &mut String, addr: CellAddress, cell: &Cell, p: &str) {
    xml.push_str(&format!("<{p}c r=\"{}\"", addr));
    if cell.style != 0 {
        xml.push_str(&format!(" s=\"{}\"", cell.style));
    }

    let cell_type = match &cell.value {
        CellValue::SharedString(_) => Some("s"),
        CellValue::InlineString(_) => Some("inlineStr"),
        CellValue::Boolean(_) => Some("b"),
        CellValue::Error(_) => Some("e"),
        CellValue::Raw { cell_type, .. } => Some(cell_type.as_str()),
        CellValue::Formula(f) => f.cached_type.as_deref(),
        CellValue::Empty | CellValue::Number(_) => None,
    };
    if let Some(t) = cell_type {
        xml.push_str(&format!(" t=\"{}\"", escape(t)));
    }
    push_attributes(xml, &cell.extra);

    match &cell.value {
        CellValue::Empty => {
            xml.push_str("/>");
            return;
        }
        CellValue::SharedString(idx) => xml.push_str(&format!("><{p}v>{}</{p}v>", idx)),
        CellValue::InlineString(s) => xml.push_str(&format!(
            "><{p}is><{p}t{}>{}</{p}t></{p}is>",
            space_attr(s),
            escape(&encode_excel_escapes(s))
        )),
        CellValue::Number(n) => xml.push_str(&format!("><{p}v>{}</{p}v>", format_number(*n))),
        CellValue::Boolean(b) => {
            xml.push_str(&format!("><{p}v>{}</{p}v>", if *b { 1 } else { 0 }))
        }
        CellValue::Error(e) => xml.push_str(&format!("><{p}v>{}</{p}v>", escape(e))),
        CellValue::Raw { value, .. } => xml.push_str(&format!("><{p}v>{}</{p}v>", escape(value))),
        CellValue::Formula(f) => {
            xml.push_str(&format!("><{p}f"));
            push_attributes(xml, &f.attributes);
            if f.text.is_empty() {
                xml.push_str("/>");
            } else {
                xml.push_str(&format!(">{}</{p}f>", escape(&f.text)));
            }
            if let Some(cached) = &f.cached {
                xml.push_str(&format!("<{p}v>{}</{p}v>", escape(cached)));
            }
        }
    }
    xml.push_str(&format!("</{p}c>"));
}
