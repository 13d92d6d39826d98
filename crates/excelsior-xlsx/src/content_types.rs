//! `[Content_Types].xml`

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::ns;
use crate::xml::{attr, escape, XML_DECLARATION};

pub const PART_NAME: &str = "[Content_Types].xml";

/// Content type registry of a package
///
/// Override part names are kept without their leading `/`, matching zip
/// entry names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// The two defaults every package carries
    pub fn minimal() -> Self {
        Self {
            defaults: vec![
                ("rels".to_string(), ns::CT_RELS.to_string()),
                ("xml".to_string(), ns::CT_XML.to_string()),
            ],
            overrides: Vec::new(),
        }
    }

    pub fn parse(xml: &[u8]) -> XlsxResult<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut types = Self::default();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) =
                            (attr(&e, b"Extension"), attr(&e, b"ContentType"))
                        {
                            types.defaults.push((ext, ct));
                        }
                    }
                    b"Override" => {
                        if let (Some(part), Some(ct)) =
                            (attr(&e, b"PartName"), attr(&e, b"ContentType"))
                        {
                            let part = part.trim_start_matches('/').to_string();
                            types.overrides.push((part, ct));
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Content type of a part: its override, else the default for its extension
    pub fn content_type(&self, part: &str) -> Option<&str> {
        let part = part.trim_start_matches('/');
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part) {
            return Some(ct);
        }
        let ext = part.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, ct)| ct.as_str())
    }

    /// Parts registered with the given override content type
    pub fn parts_with_type<'a>(&'a self, content_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.overrides
            .iter()
            .filter(move |(_, ct)| ct == content_type)
            .map(|(p, _)| p.as_str())
    }

    pub fn set_override(&mut self, part: &str, content_type: &str) {
        let part = part.trim_start_matches('/');
        match self.overrides.iter_mut().find(|(p, _)| p == part) {
            Some((_, ct)) => *ct = content_type.to_string(),
            None => self
                .overrides
                .push((part.to_string(), content_type.to_string())),
        }
    }

    pub fn remove_override(&mut self, part: &str) -> bool {
        let part = part.trim_start_matches('/');
        let before = self.overrides.len();
        self.overrides.retain(|(p, _)| p != part);
        self.overrides.len() != before
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256 + 128 * self.overrides.len());
        out.push_str(XML_DECLARATION);
        out.push_str(&format!("<Types xmlns=\"{}\">", ns::CONTENT_TYPES));
        for (ext, ct) in &self.defaults {
            out.push_str(&format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                escape(ext),
                escape(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            out.push_str(&format!(
                "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
                escape(part),
                escape(ct)
            ));
        }
        out.push_str("</Types>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="PNG" ContentType="image/png"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

    #[test]
    fn test_lookup() {
        let types = ContentTypes::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(types.content_type("xl/workbook.xml"), Some(ns::CT_WORKBOOK));
        assert_eq!(types.content_type("/xl/worksheets/sheet1.xml"), Some(ns::CT_WORKSHEET));
        assert_eq!(types.content_type("xl/media/image1.png"), Some("image/png"));
        assert_eq!(types.content_type("docProps/core.xml"), Some(ns::CT_XML));
        assert_eq!(types.content_type("noext"), None);
    }

    #[test]
    fn test_edit_and_reparse() {
        let mut types = ContentTypes::parse(SAMPLE.as_bytes()).unwrap();
        types.set_override("xl/worksheets/sheet2.xml", ns::CT_WORKSHEET);
        assert!(types.remove_override("/xl/worksheets/sheet1.xml"));
        assert!(!types.remove_override("xl/worksheets/sheet1.xml"));

        let again = ContentTypes::parse(types.to_xml().as_bytes()).unwrap();
        assert_eq!(again, types);
        assert_eq!(
            again.parts_with_type(ns::CT_WORKSHEET).collect::<Vec<_>>(),
            vec!["xl/worksheets/sheet2.xml"]
        );
    }
}
