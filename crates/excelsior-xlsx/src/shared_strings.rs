//! `xl/sharedStrings.xml`

use std::io::{BufRead, Write};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use quick_xml::Writer;

use excelsior_core::SharedStringTable;

use crate::error::XlsxResult;
use crate::ns;
use crate::xml::{decode_excel_escapes, encode_excel_escapes, escape, XML_DECLARATION};

/// Load every `<si>` into a table, preserving order.
///
/// Items that are a single `<t>` are stored as plain text. Anything richer
/// (runs, phonetic hints) keeps its original inner XML so it can be written
/// back unchanged; its plain text is the concatenation of the run texts.
pub fn read_shared_strings<R: BufRead>(source: R) -> XlsxResult<SharedStringTable> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);

    let mut table = SharedStringTable::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"si" => {
                let (text, raw) = read_item(&mut reader)?;
                table.push_loaded(text, raw);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                table.push_loaded(String::new(), None);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(table)
}

/// Read the body of one `<si>` up to its end tag
fn read_item<R: BufRead>(reader: &mut Reader<R>) -> XlsxResult<(String, Option<String>)> {
    let mut raw = Writer::new(Vec::new());
    let mut text = String::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut in_t = false;
    let mut in_phonetic = false;
    let mut simple = true;
    let mut top_level_ts = 0;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(e) => {
                match e.local_name().as_ref() {
                    b"t" => {
                        in_t = true;
                        if depth == 0 {
                            top_level_ts += 1;
                        } else {
                            simple = false;
                        }
                    }
                    b"rPh" => {
                        in_phonetic = true;
                        simple = false;
                    }
                    _ => simple = false,
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() != b"t" {
                    simple = false;
                }
            }
            Event::End(e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                match e.local_name().as_ref() {
                    b"t" => in_t = false,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                }
            }
            Event::Text(t) if in_t && !in_phonetic => text.push_str(&t.unescape()?),
            Event::CData(t) if in_t && !in_phonetic => {
                text.push_str(&String::from_utf8_lossy(t.as_ref()))
            }
            Event::Eof => break,
            _ => {}
        }
        raw.write_event(event)?;
        buf.clear();
    }

    let text = decode_excel_escapes(&text).into_owned();
    if simple && top_level_ts <= 1 {
        Ok((text, None))
    } else {
        let raw = String::from_utf8_lossy(&raw.into_inner()).into_owned();
        Ok((text, Some(raw)))
    }
}

/// Write the whole table as a sharedStrings part
pub fn write_shared_strings<W: Write>(table: &SharedStringTable, out: &mut W) -> XlsxResult<()> {
    write!(
        out,
        "{}<sst xmlns=\"{}\" uniqueCount=\"{}\">",
        XML_DECLARATION,
        ns::MAIN,
        table.len()
    )?;
    for (text, raw) in table.iter() {
        match raw {
            Some(raw) => write!(out, "<si>{}</si>", raw)?,
            None => {
                let encoded = encode_excel_escapes(text);
                write!(
                    out,
                    "<si><t{}>{}</t></si>",
                    space_attr(text),
                    escape(&encoded)
                )?
            }
        }
    }
    out.write_all(b"</sst>")?;
    Ok(())
}

/// ` xml:space="preserve"` when whitespace would otherwise be lost
pub(crate) fn space_attr(text: &str) -> &'static str {
    let needs = text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains('\n');
    if needs {
        " xml:space=\"preserve\""
    } else {
        ""
    }
}
