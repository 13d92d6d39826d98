//! `xl/styles.xml`
//!
//! Reading turns `cellXfs` into a [`StyleTable`]. Writing never regenerates
//! the part: the source XML is streamed through unchanged and whatever the
//! records added since loading need (fonts, fills, borders, number formats
//! and the `<xf>`s themselves) is appended to the matching container, with
//! its `count` updated.

use std::hash::Hash;

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use excelsior_core::cell::format_number;
use excelsior_core::style::FIRST_CUSTOM_NUM_FMT_ID;
use excelsior_core::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, PatternType, StyleRecord, StyleTable, Underline,
    VerticalAlignment,
};

use crate::error::XlsxResult;
use crate::xml::{attr, escape, read_inner, root_prefix, with_attribute};

/// Components of a styles part in file order, with a reverse index
#[derive(Debug, Clone)]
struct Components<T> {
    items: Vec<T>,
    ids: AHashMap<T, u32>,
    loaded: usize,
}

impl<T: Clone + Eq + Hash> Components<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: AHashMap::new(),
            loaded: 0,
        }
    }

    fn push_loaded(&mut self, item: T) {
        let id = self.items.len() as u32;
        self.ids.entry(item.clone()).or_insert(id);
        self.items.push(item);
        self.loaded = self.items.len();
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.items.get(id as usize)
    }

    fn id_or_push(&mut self, item: &T) -> u32 {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        let id = self.items.len() as u32;
        self.ids.insert(item.clone(), id);
        self.items.push(item.clone());
        id
    }

    fn added(&self) -> &[T] {
        &self.items[self.loaded..]
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// What the writer needs to know about the source styles part
#[derive(Debug, Clone)]
pub struct StylesPart {
    fonts: Components<FontStyle>,
    fills: Components<FillStyle>,
    borders: Components<BorderStyle>,
    /// formatCode → numFmtId for formats declared in `<numFmts>`
    num_fmt_ids: AHashMap<String, u32>,
    num_fmt_count: usize,
    next_num_fmt_id: u32,
    xf_count: usize,
}

impl StylesPart {
    fn empty() -> Self {
        Self {
            fonts: Components::new(),
            fills: Components::new(),
            borders: Components::new(),
            num_fmt_ids: AHashMap::new(),
            num_fmt_count: 0,
            next_num_fmt_id: FIRST_CUSTOM_NUM_FMT_ID,
            xf_count: 0,
        }
    }

    /// Number of `<xf>` in `cellXfs` when the part was read
    pub fn xf_count(&self) -> usize {
        self.xf_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
    Other,
}

impl Section {
    fn from_container(name: &[u8]) -> Option<Self> {
        match name {
            b"numFmts" => Some(Section::NumFmts),
            b"fonts" => Some(Section::Fonts),
            b"fills" => Some(Section::Fills),
            b"borders" => Some(Section::Borders),
            b"cellXfs" => Some(Section::CellXfs),
            b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors"
            | b"extLst" => Some(Section::Other),
            _ => None,
        }
    }
}

/// One `<xf>` of `cellXfs`, before its component ids are resolved
#[derive(Debug, Default)]
struct XfRef {
    num_fmt_id: u32,
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    alignment: Alignment,
}

impl XfRef {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let id = |key: &[u8]| {
            attr(e, key)
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(0)
        };
        Self {
            num_fmt_id: id(b"numFmtId"),
            font_id: id(b"fontId"),
            fill_id: id(b"fillId"),
            border_id: id(b"borderId"),
            alignment: Alignment::default(),
        }
    }
}

/// Parse a styles part
pub fn read_styles(xml: &[u8]) -> XlsxResult<(StyleTable, StylesPart)> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut part = StylesPart::empty();
    let mut custom_codes: AHashMap<u32, String> = AHashMap::new();
    let mut max_custom_id = None;
    let mut xfs = Vec::new();
    let mut section = Section::Other;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name();
                if let Some(next) = Section::from_container(name.as_ref()) {
                    section = next;
                } else {
                    match (section, name.as_ref()) {
                        (Section::Fonts, b"font") => part.fonts.push_loaded(read_font(&mut reader)?),
                        (Section::Fills, b"fill") => part.fills.push_loaded(read_fill(&mut reader)?),
                        (Section::Borders, b"border") => {
                            let border = read_border(&mut reader, &e)?;
                            part.borders.push_loaded(border);
                        }
                        (Section::CellXfs, b"xf") => xfs.push(read_xf(&mut reader, &e)?),
                        (Section::NumFmts, b"numFmt") => {
                            read_num_fmt(&e, &mut part, &mut custom_codes, &mut max_custom_id);
                            reader.read_to_end_into(e.name(), &mut Vec::new())?;
                        }
                        _ => {}
                    }
                }
            }
            Event::Empty(e) => match (section, e.local_name().as_ref()) {
                (Section::Fonts, b"font") => part.fonts.push_loaded(blank_font()),
                (Section::Fills, b"fill") => part.fills.push_loaded(FillStyle::None),
                (Section::Borders, b"border") => part.borders.push_loaded(border_from_start(&e)),
                (Section::CellXfs, b"xf") => xfs.push(XfRef::from_start(&e)),
                (Section::NumFmts, b"numFmt") => {
                    read_num_fmt(&e, &mut part, &mut custom_codes, &mut max_custom_id)
                }
                _ => {}
            },
            Event::End(e) if Section::from_container(e.local_name().as_ref()).is_some() => {
                section = Section::Other;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(max) = max_custom_id {
        part.next_num_fmt_id = part.next_num_fmt_id.max(max + 1);
    }
    part.xf_count = xfs.len();

    let records = xfs
        .into_iter()
        .map(|xf| StyleRecord {
            font: part.fonts.get(xf.font_id).cloned().unwrap_or_default(),
            fill: part.fills.get(xf.fill_id).cloned().unwrap_or_default(),
            border: part.borders.get(xf.border_id).cloned().unwrap_or_default(),
            alignment: xf.alignment,
            number_format: match custom_codes.get(&xf.num_fmt_id) {
                Some(code) => NumberFormat::Custom(code.clone()),
                None => NumberFormat::from_id(xf.num_fmt_id),
            },
        })
        .collect();

    log::debug!(
        "styles: {} fonts, {} fills, {} borders, {} cell formats",
        part.fonts.len(),
        part.fills.len(),
        part.borders.len(),
        part.xf_count
    );

    Ok((StyleTable::from_records(records), part))
}

fn read_num_fmt(
    e: &BytesStart<'_>,
    part: &mut StylesPart,
    custom_codes: &mut AHashMap<u32, String>,
    max_custom_id: &mut Option<u32>,
) {
    let id = attr(e, b"numFmtId").and_then(|v| v.parse::<u32>().ok());
    let code = attr(e, b"formatCode");
    if let (Some(id), Some(code)) = (id, code) {
        part.num_fmt_ids.entry(code.clone()).or_insert(id);
        custom_codes.insert(id, code);
        part.num_fmt_count += 1;
        *max_custom_id = Some(max_custom_id.map_or(id, |m| m.max(id)));
    }
}

/// A font with nothing set; `<font>` children fill it in
fn blank_font() -> FontStyle {
    FontStyle {
        name: String::new(),
        color: None,
        family: None,
        scheme: None,
        ..FontStyle::default()
    }
}

/// `<b/>`, `<b val="1"/>`, `<b val="0"/>`
fn toggle(val: Option<&str>) -> bool {
    !matches!(val, Some("0") | Some("false"))
}

fn flag(val: Option<String>) -> bool {
    matches!(val.as_deref(), Some("1") | Some("true"))
}

fn parse_color(e: &BytesStart<'_>) -> Color {
    if let Some(color) = attr(e, b"rgb").and_then(|v| Color::from_hex(&v).ok()) {
        return color;
    }
    if let Some(index) = attr(e, b"theme").and_then(|v| v.parse::<u32>().ok()) {
        return Color::Theme {
            index,
            tint: attr(e, b"tint").map(String::into_boxed_str),
        };
    }
    if let Some(index) = attr(e, b"indexed").and_then(|v| v.parse::<u32>().ok()) {
        return Color::Indexed(index);
    }
    Color::Auto
}

fn read_font<R: std::io::BufRead>(reader: &mut Reader<R>) -> XlsxResult<FontStyle> {
    let mut font = blank_font();
    read_inner(reader, |event| {
        let e = match event {
            Event::Empty(e) | Event::Start(e) => e,
            _ => return Ok(()),
        };
        let val = attr(e, b"val");
        match e.local_name().as_ref() {
            b"b" => font.bold = toggle(val.as_deref()),
            b"i" => font.italic = toggle(val.as_deref()),
            b"strike" => font.strikethrough = toggle(val.as_deref()),
            b"u" => font.underline = Underline::from_val(val.as_deref()),
            b"sz" => {
                if let Some(size) = val.and_then(|v| v.parse::<f64>().ok()) {
                    font.size = size;
                }
            }
            b"color" => font.color = Some(parse_color(e)),
            b"name" => {
                if let Some(name) = val {
                    font.name = name;
                }
            }
            b"family" => font.family = val.and_then(|v| v.parse().ok()),
            b"charset" => font.charset = val.and_then(|v| v.parse().ok()),
            b"scheme" => font.scheme = val,
            _ => {}
        }
        Ok(())
    })?;
    Ok(font)
}

fn read_fill<R: std::io::BufRead>(reader: &mut Reader<R>) -> XlsxResult<FillStyle> {
    let mut pattern = None;
    let mut foreground = None;
    let mut background = None;
    let mut gradient = false;

    let raw = read_inner(reader, |event| {
        let e = match event {
            Event::Empty(e) | Event::Start(e) => e,
            _ => return Ok(()),
        };
        match e.local_name().as_ref() {
            b"patternFill" => {
                pattern = Some(
                    attr(e, b"patternType")
                        .and_then(|p| PatternType::from_name(&p))
                        .unwrap_or_default(),
                )
            }
            b"fgColor" => foreground = Some(parse_color(e)),
            b"bgColor" => background = Some(parse_color(e)),
            b"gradientFill" => gradient = true,
            _ => {}
        }
        Ok(())
    })?;

    if gradient {
        return Ok(FillStyle::Raw(raw.into_boxed_str()));
    }
    Ok(match pattern.unwrap_or_default() {
        PatternType::None if foreground.is_none() && background.is_none() => FillStyle::None,
        pattern => FillStyle::Pattern {
            pattern,
            foreground,
            background,
        },
    })
}

fn border_from_start(e: &BytesStart<'_>) -> BorderStyle {
    BorderStyle {
        diagonal_up: flag(attr(e, b"diagonalUp")),
        diagonal_down: flag(attr(e, b"diagonalDown")),
        ..BorderStyle::default()
    }
}

fn edge_slot<'a>(border: &'a mut BorderStyle, name: &[u8]) -> Option<&'a mut Option<BorderEdge>> {
    match name {
        b"left" | b"start" => Some(&mut border.left),
        b"right" | b"end" => Some(&mut border.right),
        b"top" => Some(&mut border.top),
        b"bottom" => Some(&mut border.bottom),
        b"diagonal" => Some(&mut border.diagonal),
        _ => None,
    }
}

fn edge_from_start(e: &BytesStart<'_>) -> Option<BorderEdge> {
    let style = attr(e, b"style").and_then(|s| BorderLineStyle::parse(&s).ok())?;
    match style {
        BorderLineStyle::None => None,
        style => Some(BorderEdge::new(style, None)),
    }
}

fn read_border<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
) -> XlsxResult<BorderStyle> {
    let mut border = border_from_start(start);
    let mut open: Option<(Vec<u8>, Option<BorderEdge>)> = None;

    read_inner(reader, |event| {
        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if edge_slot(&mut border, &name).is_some() {
                    open = Some((name, edge_from_start(e)));
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"color" => {
                if let Some((_, Some(edge))) = &mut open {
                    edge.color = Some(parse_color(e));
                }
            }
            Event::Empty(e) => {
                let edge = edge_from_start(e);
                if let Some(slot) = edge_slot(&mut border, e.local_name().as_ref()) {
                    *slot = edge;
                }
            }
            Event::End(e) => {
                let closes_edge = matches!(&open, Some((name, _)) if name.as_slice() == e.local_name().as_ref());
                if closes_edge {
                    if let Some((name, edge)) = open.take() {
                        if let Some(slot) = edge_slot(&mut border, &name) {
                            *slot = edge;
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    })?;

    Ok(border)
}

fn read_xf<R: std::io::BufRead>(reader: &mut Reader<R>, start: &BytesStart<'_>) -> XlsxResult<XfRef> {
    let mut xf = XfRef::from_start(start);
    read_inner(reader, |event| {
        if let Event::Empty(e) | Event::Start(e) = event {
            if e.local_name().as_ref() == b"alignment" {
                xf.alignment = parse_alignment(e);
            }
        }
        Ok(())
    })?;
    Ok(xf)
}

fn parse_alignment(e: &BytesStart<'_>) -> Alignment {
    let number = |key: &[u8]| {
        attr(e, key)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0)
    };
    Alignment {
        horizontal: attr(e, b"horizontal").and_then(|v| HorizontalAlignment::from_name(&v)),
        vertical: attr(e, b"vertical").and_then(|v| VerticalAlignment::from_name(&v)),
        wrap_text: flag(attr(e, b"wrapText")),
        shrink_to_fit: flag(attr(e, b"shrinkToFit")),
        indent: number(b"indent"),
        text_rotation: number(b"textRotation"),
    }
}

/// Children to append to one container
struct Pending {
    container: &'static str,
    count: usize,
    items: Vec<String>,
}

/// Container order inside `<styleSheet>`
const ORDER: [&str; 11] = [
    "numFmts",
    "fonts",
    "fills",
    "borders",
    "cellStyleXfs",
    "cellXfs",
    "cellStyles",
    "dxfs",
    "tableStyles",
    "colors",
    "extLst",
];

fn plan(table: &StyleTable, part: &StylesPart, p: &str) -> Vec<Pending> {
    let mut fonts = part.fonts.clone();
    let mut fills = part.fills.clone();
    let mut borders = part.borders.clone();
    let mut num_fmt_ids = part.num_fmt_ids.clone();
    let mut next_num_fmt_id = part.next_num_fmt_id;

    let mut num_fmts = Vec::new();
    let mut xfs = Vec::new();
    for (_, record) in table.iter().skip(part.xf_count) {
        let num_fmt_id = match &record.number_format {
            NumberFormat::General => 0,
            NumberFormat::BuiltIn(id) => *id,
            NumberFormat::Custom(code) => *num_fmt_ids.entry(code.clone()).or_insert_with(|| {
                let id = next_num_fmt_id;
                next_num_fmt_id += 1;
                num_fmts.push(format!(
                    "<{p}numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape(code)
                ));
                id
            }),
        };
        let font_id = fonts.id_or_push(&record.font);
        let fill_id = fills.id_or_push(&record.fill);
        let border_id = borders.id_or_push(&record.border);
        xfs.push(xf_xml(
            p,
            [num_fmt_id, font_id, fill_id, border_id],
            &record.alignment,
        ));
    }

    let mut pending = Vec::new();
    let mut push = |container, count, items: Vec<String>| {
        if !items.is_empty() {
            pending.push(Pending {
                container,
                count,
                items,
            });
        }
    };
    push("numFmts", part.num_fmt_count + num_fmts.len(), num_fmts);
    push(
        "fonts",
        fonts.len(),
        fonts.added().iter().map(|f| font_xml(p, f)).collect(),
    );
    push(
        "fills",
        fills.len(),
        fills.added().iter().map(|f| fill_xml(p, f)).collect(),
    );
    push(
        "borders",
        borders.len(),
        borders.added().iter().map(|b| border_xml(p, b)).collect(),
    );
    push("cellXfs", part.xf_count + xfs.len(), xfs);
    pending
}

/// Stream `source` through, appending what `table` added since loading.
pub fn write_styles(source: &[u8], table: &StyleTable, part: &StylesPart) -> XlsxResult<Vec<u8>> {
    let prefix = root_prefix(source)?;
    let mut pending = plan(table, part, &prefix);
    if pending.is_empty() {
        return Ok(source.to_vec());
    }

    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(source.len() + 4096));

    let mut depth = 0usize;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if depth == 1 {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    flush_missing_before(&mut writer, &mut pending, &name, &prefix);
                    match pending.iter().find(|p| p.container == name) {
                        Some(p) => writer.write_event(Event::Start(with_attribute(
                            &e,
                            "count",
                            &p.count.to_string(),
                        )))?,
                        None => writer.write_event(Event::Start(e))?,
                    }
                } else {
                    writer.write_event(Event::Start(e))?;
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 1 => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                flush_missing_before(&mut writer, &mut pending, &name, &prefix);
                match take(&mut pending, &name) {
                    Some(p) => {
                        let start = with_attribute(&e, "count", &p.count.to_string());
                        let end = start.to_end().into_owned();
                        writer.write_event(Event::Start(start))?;
                        append_items(&mut writer, &p.items);
                        writer.write_event(Event::End(end))?;
                    }
                    None => writer.write_event(Event::Empty(e))?,
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if let Some(p) = take(&mut pending, &name) {
                        append_items(&mut writer, &p.items);
                    }
                } else if depth == 0 {
                    for p in pending.drain(..) {
                        write_container(&mut writer, &p, &prefix);
                    }
                }
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn take(pending: &mut Vec<Pending>, name: &str) -> Option<Pending> {
    let pos = pending.iter().position(|p| p.container == name)?;
    Some(pending.remove(pos))
}

/// Emit whole containers the source lacks and that belong before `name`
fn flush_missing_before(
    writer: &mut Writer<Vec<u8>>,
    pending: &mut Vec<Pending>,
    name: &str,
    prefix: &str,
) {
    let Some(pos) = ORDER.iter().position(|c| *c == name) else {
        return;
    };
    for container in &ORDER[..pos] {
        if let Some(p) = take(pending, container) {
            write_container(writer, &p, prefix);
        }
    }
}

fn write_container(writer: &mut Writer<Vec<u8>>, p: &Pending, prefix: &str) {
    let out = writer.get_mut();
    out.extend_from_slice(
        format!("<{}{} count=\"{}\">", prefix, p.container, p.count).as_bytes(),
    );
    for item in &p.items {
        out.extend_from_slice(item.as_bytes());
    }
    out.extend_from_slice(format!("</{}{}>", prefix, p.container).as_bytes());
}

fn append_items(writer: &mut Writer<Vec<u8>>, items: &[String]) {
    let out = writer.get_mut();
    for item in items {
        out.extend_from_slice(item.as_bytes());
    }
}

fn color_xml(p: &str, tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{p}{tag} auto=\"1\"/>"),
        Color::Argb(v) => format!("<{p}{tag} rgb=\"{:08X}\"/>", v),
        Color::Theme { index, tint: None } => format!("<{p}{tag} theme=\"{}\"/>", index),
        Color::Theme {
            index,
            tint: Some(tint),
        } => format!("<{p}{tag} theme=\"{}\" tint=\"{}\"/>", index, escape(tint)),
        Color::Indexed(i) => format!("<{p}{tag} indexed=\"{}\"/>", i),
    }
}

fn font_xml(p: &str, font: &FontStyle) -> String {
    let mut xml = format!("<{p}font>");
    if font.bold {
        xml.push_str(&format!("<{p}b/>"));
    }
    if font.italic {
        xml.push_str(&format!("<{p}i/>"));
    }
    if font.strikethrough {
        xml.push_str(&format!("<{p}strike/>"));
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => xml.push_str(&format!("<{p}u/>")),
        other => {
            if let Some(val) = other.as_str() {
                xml.push_str(&format!("<{p}u val=\"{}\"/>", val));
            }
        }
    }
    xml.push_str(&format!("<{p}sz val=\"{}\"/>", format_number(font.size)));
    if let Some(color) = &font.color {
        xml.push_str(&color_xml(p, "color", color));
    }
    if !font.name.is_empty() {
        xml.push_str(&format!("<{p}name val=\"{}\"/>", escape(&font.name)));
    }
    if let Some(family) = font.family {
        xml.push_str(&format!("<{p}family val=\"{}\"/>", family));
    }
    if let Some(charset) = font.charset {
        xml.push_str(&format!("<{p}charset val=\"{}\"/>", charset));
    }
    if let Some(scheme) = &font.scheme {
        xml.push_str(&format!("<{p}scheme val=\"{}\"/>", escape(scheme)));
    }
    xml.push_str(&format!("</{p}font>"));
    xml
}

fn fill_xml(p: &str, fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => format!("<{p}fill><{p}patternFill patternType=\"none\"/></{p}fill>"),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            let mut xml = format!("<{p}fill><{p}patternFill patternType=\"{}\"", pattern.as_str());
            if foreground.is_none() && background.is_none() {
                xml.push_str(&format!("/></{p}fill>"));
                return xml;
            }
            xml.push('>');
            if let Some(fg) = foreground {
                xml.push_str(&color_xml(p, "fgColor", fg));
            }
            if let Some(bg) = background {
                xml.push_str(&color_xml(p, "bgColor", bg));
            }
            xml.push_str(&format!("</{p}patternFill></{p}fill>"));
            xml
        }
        FillStyle::Raw(raw) => format!("<{p}fill>{}</{p}fill>", raw),
    }
}

fn border_xml(p: &str, border: &BorderStyle) -> String {
    let mut xml = format!("<{p}border");
    if border.diagonal_up {
        xml.push_str(" diagonalUp=\"1\"");
    }
    if border.diagonal_down {
        xml.push_str(" diagonalDown=\"1\"");
    }
    xml.push('>');
    let edges = [
        ("left", &border.left),
        ("right", &border.right),
        ("top", &border.top),
        ("bottom", &border.bottom),
        ("diagonal", &border.diagonal),
    ];
    for (tag, edge) in edges {
        match edge {
            None => xml.push_str(&format!("<{p}{tag}/>")),
            Some(edge) => {
                xml.push_str(&format!("<{p}{tag} style=\"{}\"", edge.style.as_str()));
                match &edge.color {
                    Some(color) => {
                        xml.push('>');
                        xml.push_str(&color_xml(p, "color", color));
                        xml.push_str(&format!("</{p}{tag}>"));
                    }
                    None => xml.push_str("/>"),
                }
            }
        }
    }
    xml.push_str(&format!("</{p}border>"));
    xml
}

fn xf_xml(p: &str, ids: [u32; 4], alignment: &Alignment) -> String {
    let [num_fmt_id, font_id, fill_id, border_id] = ids;
    let mut xml = format!(
        "<{p}xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
        num_fmt_id, font_id, fill_id, border_id
    );
    if num_fmt_id != 0 {
        xml.push_str(" applyNumberFormat=\"1\"");
    }
    if font_id != 0 {
        xml.push_str(" applyFont=\"1\"");
    }
    if fill_id != 0 {
        xml.push_str(" applyFill=\"1\"");
    }
    if border_id != 0 {
        xml.push_str(" applyBorder=\"1\"");
    }
    if alignment.is_default() {
        xml.push_str("/>");
        return xml;
    }

    xml.push_str(" applyAlignment=\"1\">");
    xml.push_str(&format!("<{p}alignment"));
    if let Some(h) = alignment.horizontal {
        xml.push_str(&format!(" horizontal=\"{}\"", h.as_str()));
    }
    if let Some(v) = alignment.vertical {
        xml.push_str(&format!(" vertical=\"{}\"", v.as_str()));
    }
    if alignment.text_rotation != 0 {
        xml.push_str(&format!(" textRotation=\"{}\"", alignment.text_rotation));
    }
    if alignment.wrap_text {
        xml.push_str(" wrapText=\"1\"");
    }
    if alignment.indent != 0 {
        xml.push_str(&format!(" indent=\"{}\"", alignment.indent));
    }
    if alignment.shrink_to_fit {
        xml.push_str(" shrinkToFit=\"1\"");
    }
    xml.push_str(&format!("/></{p}xf>"));
    xml
}
