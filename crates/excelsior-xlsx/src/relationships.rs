//! Relationship parts (`*.rels`)

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::ns;
use crate::xml::{attr, escape, XML_DECLARATION};

/// One `<Relationship>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `External` for hyperlinks and the like
    pub target_mode: Option<String>,
}

impl Relationship {
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some("External")
    }
}

/// Relationships of one source part, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(xml: &[u8]) -> XlsxResult<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut rels = Vec::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                    let id = attr(&e, b"Id");
                    let rel_type = attr(&e, b"Type");
                    let target = attr(&e, b"Target");
                    if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                        rels.push(Relationship {
                            id,
                            rel_type,
                            target,
                            target_mode: attr(&e, b"TargetMode"),
                        });
                    } else {
                        log::warn!("skipping incomplete <Relationship>");
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { rels })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    /// First relationship of a type
    pub fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.rel_type == rel_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Smallest unused `rIdN`
    pub fn next_id(&self) -> String {
        (1..=self.rels.len() + 1)
            .map(|n| format!("rId{}", n))
            .find(|id| self.get(id).is_none())
            .unwrap_or_default()
    }

    /// Add an internal relationship and return its id
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: None,
        });
        id
    }

    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.rels.iter().position(|r| r.id == id)?;
        Some(self.rels.remove(pos))
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(128 + 160 * self.rels.len());
        out.push_str(XML_DECLARATION);
        out.push_str(&format!("<Relationships xmlns=\"{}\">", ns::PACKAGE_REL));
        for rel in &self.rels {
            out.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"",
                escape(&rel.id),
                escape(&rel.rel_type),
                escape(&rel.target)
            ));
            if let Some(mode) = &rel.target_mode {
                out.push_str(&format!(" TargetMode=\"{}\"", escape(mode)));
            }
            out.push_str("/>");
        }
        out.push_str("</Relationships>");
        out
    }
}
