//! Small XML helpers shared by the part readers and writers

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::error::XlsxResult;

pub(crate) const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Escape text or an attribute value
pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Value of one attribute, unescaped
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// All attributes of an element, unescaped, in document order
pub(crate) fn attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.attributes()
        .flatten()
        .filter_map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            let value = a.unescape_value().ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

/// Append ` key="value"` pairs
pub(crate) fn push_attributes(out: &mut String, attrs: &[(String, String)]) {
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

/// Copy of `e` with `key` set to `value`, appended when absent
pub(crate) fn with_attribute(e: &BytesStart<'_>, key: &str, value: &str) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    let mut replaced = false;
    for (k, v) in attributes(e) {
        if k == key {
            out.push_attribute((k.as_str(), value));
            replaced = true;
        } else {
            out.push_attribute((k.as_str(), v.as_str()));
        }
    }
    if !replaced {
        out.push_attribute((key, value));
    }
    out
}

/// Read up to the end tag of the element whose start was just consumed,
/// calling `visit` for every event inside it. Returns the inner XML.
pub(crate) fn read_inner<R, F>(reader: &mut Reader<R>, mut visit: F) -> XlsxResult<String>
where
    R: BufRead,
    F: FnMut(&Event<'_>) -> XlsxResult<()>,
{
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => break,
            _ => {}
        }
        visit(&event)?;
        writer.write_event(event)?;
        buf.clear();
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Namespace prefix of the root element including the colon (`"x:"`), or
/// an empty string when the file uses a default namespace.
pub(crate) fn root_prefix(xml: &[u8]) -> XlsxResult<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(match e.name().prefix() {
                    Some(p) => format!("{}:", String::from_utf8_lossy(p.as_ref())),
                    None => String::new(),
                })
            }
            Event::Eof => return Ok(String::new()),
            _ => {}
        }
        buf.clear();
    }
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        if let Some(ch) = escape_at(bytes, i) {
            out.push(ch);
            i += 7;
            continue;
        }
        // `i` only ever lands on char boundaries
        let ch = s[i..].chars().next().unwrap_or('\u{FFFD}');
        out.push(ch);
        i += ch.len_utf8();
    }
    Cow::Owned(out)
}

/// Parse `_xHHHH_` at `i`
fn escape_at(bytes: &[u8], i: usize) -> Option<char> {
    let seq = bytes.get(i..i + 7)?;
    if seq[0] != b'_' || seq[1] != b'x' || seq[6] != b'_' {
        return None;
    }
    let hex = std::str::from_utf8(&seq[2..6]).ok()?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}

/// Inverse of [`decode_excel_escapes`]: encode control characters and
/// protect literal text that would otherwise read back as an escape.
pub(crate) fn encode_excel_escapes(s: &str) -> Cow<'_, str> {
    let needs = s
        .chars()
        .any(|c| (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || c == '_');
    if !needs {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if c < ' ' && !matches!(c, '\t' | '\n' | '\r') {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else if c == '_' && escape_at(bytes, i).is_some() {
            out.push_str("_x005F_");
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Resolve a relationship target against the part that owns the rels.
///
/// `("xl/workbook.xml", "worksheets/sheet1.xml")` gives
/// `xl/worksheets/sheet1.xml`; absolute targets drop the leading slash.
pub(crate) fn resolve_target(base_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match base_part.rfind('/') {
        Some(pos) => base_part[..pos].split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Express `part` relative to the directory of `base_part`, the way
/// relationship targets are usually written.
pub(crate) fn relative_target(base_part: &str, part: &str) -> String {
    let dir = match base_part.rfind('/') {
        Some(pos) => &base_part[..=pos],
        None => "",
    };
    match part.strip_prefix(dir) {
        Some(rest) => rest.to_string(),
        None => format!("/{}", part),
    }
}

/// `xl/workbook.xml` → `xl/_rels/workbook.xml.rels`
pub(crate) fn rels_part_for(part: &str) -> String {
    match part.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part[..pos], &part[pos + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}
