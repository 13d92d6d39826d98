//! Fixture packages and archive inspection helpers.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// `[Content_Types].xml` with one override per `(part, content type)`
pub fn content_types(overrides: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
    );
    for (part, ct) in overrides {
        xml.push_str(&format!(
            "<Override PartName=\"/{}\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.{}+xml\"/>",
            part, ct
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// Relationships part with ids `rId1..` in order, `(type suffix, target)`
pub fn relationships(rels: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, (kind, target)) in rels.iter().enumerate() {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{}/{}\" Target=\"{}\"/>",
            i + 1,
            REL_NS,
            kind,
            target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Zip the parts with deflate compression, in the given order
pub fn build(parts: &[(&str, String)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, body) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn archive(bytes: &[u8]) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap()
}

pub fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = archive(bytes);
    let mut names: Vec<_> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

/// Decompressed text of a part, `None` when the entry is absent
pub fn read_part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = archive(bytes);
    let mut file = archive.by_name(name).ok()?;
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    Some(text)
}

/// Compressed bytes of every entry, keyed by name
pub fn raw_entries(bytes: &[u8]) -> HashMap<String, Vec<u8>> {
    let mut archive = archive(bytes);
    let mut entries = HashMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index_raw(i).unwrap();
        let mut raw = Vec::new();
        file.read_to_end(&mut raw).unwrap();
        entries.insert(file.name().to_string(), raw);
    }
    entries
}
