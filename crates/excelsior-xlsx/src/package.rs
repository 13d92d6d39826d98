//! The package: a zip archive plus what has been loaded from it

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use ahash::{AHashMap, AHashSet};
use zip::result::ZipError;
use zip::ZipArchive;

use excelsior_core::workbook::SheetRef;
use excelsior_core::{Error, SharedStringTable, SheetList, SheetStore, StyleTable};

use crate::content_types::{self, ContentTypes};
use crate::error::{XlsxError, XlsxResult};
use crate::ns;
use crate::relationships::Relationships;
use crate::shared_strings::{read_shared_strings, write_shared_strings};
use crate::styles::{read_styles, write_styles, StylesPart};
use crate::template;
use crate::workbook::{read_sheet_entries, resolve_sheets, rewrite_workbook};
use crate::worksheet::{read_worksheet, write_worksheet};
use crate::writer::{PackageWriter, SaveOptions};
use crate::xml::{relative_target, rels_part_for, resolve_target};

const ROOT_RELS: &str = "_rels/.rels";

/// Mutable view of one sheet together with the workbook-wide tables
pub struct SheetContext<'a> {
    pub sheet: &'a mut SheetStore,
    pub strings: &'a mut SharedStringTable,
    pub styles: &'a mut StyleTable,
}

/// An open XLSX package
///
/// The whole source file is held in memory, so saving over the file it was
/// opened from is safe. Worksheets, shared strings and styles are parsed on
/// first use.
pub struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    content_types: ContentTypes,
    workbook_part: String,
    workbook_rels: Relationships,
    sheets: SheetList,
    /// `sheetId`s in source order, for remapping sheet-scoped names
    original_ids: Vec<u32>,
    max_sheet_id: u32,

    loaded: AHashMap<String, SheetStore>,
    /// Sheet parts created in this session
    added: AHashSet<String>,
    /// Source entries left out of the output
    removed: AHashSet<String>,

    strings_part: Option<String>,
    strings_is_new: bool,
    strings: Option<SharedStringTable>,

    styles_part: String,
    styles_is_new: bool,
    styles: Option<(StyleTable, StylesPart)>,

    /// workbook.xml, its rels and the content types need regenerating
    structure_changed: bool,
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("workbook_part", &self.workbook_part)
            .field("sheets", &self.sheets.names())
            .field("loaded", &self.loaded.len())
            .finish()
    }
}

/// First relationship whose type ends with `/suffix`, which covers both the
/// transitional and the strict namespaces
fn find_by_suffix<'a>(rels: &'a Relationships, suffix: &str) -> Option<&'a str> {
    rels.iter()
        .filter(|r| !r.is_external())
        .find(|r| {
            r.rel_type
                .rsplit_once('/')
                .is_some_and(|(_, last)| last == suffix)
        })
        .map(|r| r.target.as_str())
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> XlsxResult<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            Ok(Some(bytes))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_index<R: Read + Seek>(archive: &mut ZipArchive<R>, index: usize) -> XlsxResult<Vec<u8>> {
    let mut file = archive.by_index(index)?;
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn sheet_not_found(name: &str) -> XlsxError {
    XlsxError::Core(Error::SheetNotFound(name.to_string()))
}

impl Package {
    /// Read a package from disk
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        Self::from_bytes(fs::read(path)?)
    }

    /// A new package with one empty sheet
    pub fn create(sheet_name: &str) -> XlsxResult<Self> {
        let name = excelsior_core::validate_sheet_name(sheet_name)?;
        Self::from_bytes(template::new_workbook(name)?)
    }

    /// Read a package from the bytes of an `.xlsx` file
    pub fn from_bytes(bytes: Vec<u8>) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let content_types = match read_entry(&mut archive, content_types::PART_NAME)? {
            Some(xml) => ContentTypes::parse(&xml)?,
            None => return Err(XlsxError::MissingPart(content_types::PART_NAME.into())),
        };

        let workbook_part = match read_entry(&mut archive, ROOT_RELS)? {
            Some(xml) => {
                let rels = Relationships::parse(&xml)?;
                find_by_suffix(&rels, "officeDocument")
                    .map(|target| resolve_target("", target))
                    .unwrap_or_else(|| "xl/workbook.xml".to_string())
            }
            None => "xl/workbook.xml".to_string(),
        };

        let workbook_rels = match read_entry(&mut archive, &rels_part_for(&workbook_part))? {
            Some(xml) => Relationships::parse(&xml)?,
            None => Relationships::new(),
        };

        let workbook_xml = read_entry(&mut archive, &workbook_part)?
            .ok_or_else(|| XlsxError::MissingPart(workbook_part.clone()))?;
        let entries = read_sheet_entries(&workbook_xml)?;
        let original_ids: Vec<u32> = entries.iter().map(|e| e.sheet_id).collect();
        let sheets = resolve_sheets(entries, &workbook_rels, &workbook_part)?;

        let strings_part =
            find_by_suffix(&workbook_rels, "sharedStrings").map(|t| resolve_target(&workbook_part, t));
        let styles_part = find_by_suffix(&workbook_rels, "styles")
            .map(|t| resolve_target(&workbook_part, t));
        let styles_is_new = styles_part.is_none();
        let styles_part =
            styles_part.unwrap_or_else(|| resolve_target(&workbook_part, "styles.xml"));

        log::debug!(
            "{}: {} sheets, {} entries",
            workbook_part,
            sheets.len(),
            archive.len()
        );

        Ok(Self {
            archive,
            content_types,
            max_sheet_id: original_ids.iter().copied().max().unwrap_or(0),
            original_ids,
            workbook_part,
            workbook_rels,
            sheets,
            loaded: AHashMap::new(),
            added: AHashSet::new(),
            removed: AHashSet::new(),
            strings_part,
            strings_is_new: false,
            strings: None,
            styles_part,
            styles_is_new,
            styles: None,
            structure_changed: false,
        })
    }

    pub fn sheets(&self) -> &SheetList {
        &self.sheets
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.names()
    }

    /// Whether the sheet's part has been parsed
    pub fn is_loaded(&self, name: &str) -> bool {
        self.sheets
            .find(name)
            .is_some_and(|s| self.loaded.contains_key(&s.part))
    }

    /// The sheet plus the shared tables, loading whatever is missing
    pub fn context(&mut self, name: &str) -> XlsxResult<SheetContext<'_>> {
        let part = self
            .sheets
            .find(name)
            .ok_or_else(|| sheet_not_found(name))?
            .part
            .clone();

        self.ensure_sheet(&part)?;
        self.ensure_strings()?;
        self.ensure_styles()?;

        let (Some(sheet), Some(strings), Some((styles, _))) = (
            self.loaded.get_mut(&part),
            self.strings.as_mut(),
            self.styles.as_mut(),
        ) else {
            return Err(XlsxError::InvalidFormat(format!("{} could not be loaded", part)));
        };
        Ok(SheetContext {
            sheet,
            strings,
            styles,
        })
    }

    fn ensure_sheet(&mut self, part: &str) -> XlsxResult<()> {
        if self.loaded.contains_key(part) {
            return Ok(());
        }
        log::debug!("loading {}", part);
        let xml = read_entry(&mut self.archive, part)?
            .ok_or_else(|| XlsxError::MissingPart(part.to_string()))?;
        let sheet = read_worksheet(xml.as_slice(), part)?;
        self.loaded.insert(part.to_string(), sheet);
        Ok(())
    }

    fn ensure_strings(&mut self) -> XlsxResult<()> {
        if self.strings.is_some() {
            return Ok(());
        }
        let table = match &self.strings_part {
            Some(part) => match read_entry(&mut self.archive, part)? {
                Some(xml) => {
                    log::debug!("loading {}", part);
                    read_shared_strings(xml.as_slice())?
                }
                None => {
                    log::warn!("{} is referenced but missing, starting empty", part);
                    SharedStringTable::new()
                }
            },
            None => SharedStringTable::new(),
        };
        self.strings = Some(table);
        Ok(())
    }

    fn ensure_styles(&mut self) -> XlsxResult<()> {
        if self.styles.is_some() {
            return Ok(());
        }
        let xml = self.styles_source()?;
        log::debug!("loading {}", self.styles_part);
        self.styles = Some(read_styles(&xml)?);
        Ok(())
    }

    fn styles_source(&mut self) -> XlsxResult<Vec<u8>> {
        if self.styles_is_new {
            return Ok(template::default_styles().into_bytes());
        }
        match read_entry(&mut self.archive, &self.styles_part)? {
            Some(xml) => Ok(xml),
            None => {
                log::warn!("{} is referenced but missing, using defaults", self.styles_part);
                self.styles_is_new = true;
                Ok(template::default_styles().into_bytes())
            }
        }
    }

    /// Add an empty worksheet at `index` (appended when `None`).
    ///
    /// Returns the position the sheet ended up at.
    pub fn add_sheet(&mut self, name: &str, index: Option<usize>) -> XlsxResult<usize> {
        let name = self.sheets.check_new_name(name, None)?.to_string();

        let part = self.free_sheet_part();
        let rel_id = self
            .workbook_rels
            .add(ns::REL_WORKSHEET, &relative_target(&self.workbook_part, &part));
        self.content_types.set_override(&part, ns::CT_WORKSHEET);

        let sheet_id = self.sheets.next_sheet_id().max(self.max_sheet_id + 1);
        self.max_sheet_id = sheet_id;

        let position = self.sheets.insert(
            index.unwrap_or(usize::MAX),
            SheetRef {
                name,
                sheet_id,
                rel_id,
                part: part.clone(),
                state: None,
            },
        );
        log::debug!("added sheet part {} at position {}", part, position);

        self.loaded.insert(part.clone(), SheetStore::new());
        self.added.insert(part);
        self.structure_changed = true;
        Ok(position)
    }

    fn free_sheet_part(&self) -> String {
        let dir = resolve_target(&self.workbook_part, "worksheets");
        (1u32..)
            .map(|n| format!("{}/sheet{}.xml", dir, n))
            .find(|candidate| {
                !self.added.contains(candidate)
                    && !self.archive.file_names().any(|n| n == candidate)
            })
            .unwrap_or_else(|| format!("{}/sheet.xml", dir))
    }

    pub fn rename_sheet(&mut self, old: &str, new: &str) -> XlsxResult<()> {
        self.sheets.rename(old, new)?;
        self.structure_changed = true;
        Ok(())
    }

    /// Remove a sheet with its part, relationship and content type.
    ///
    /// The calculation chain is dropped as well since it refers to sheets
    /// by id; Excel rebuilds it on load.
    pub fn delete_sheet(&mut self, name: &str) -> XlsxResult<()> {
        let sheet = self.sheets.remove(name)?;
        self.workbook_rels.remove(&sheet.rel_id);
        self.content_types.remove_override(&sheet.part);
        self.loaded.remove(&sheet.part);
        self.added.remove(&sheet.part);
        self.removed.insert(rels_part_for(&sheet.part));
        self.removed.insert(sheet.part);

        let calc_chain = self
            .workbook_rels
            .iter()
            .find(|r| r.rel_type == ns::REL_CALC_CHAIN)
            .map(|r| (r.id.clone(), resolve_target(&self.workbook_part, &r.target)));
        if let Some((rel_id, part)) = calc_chain {
            log::debug!("dropping {}", part);
            self.workbook_rels.remove(&rel_id);
            self.content_types.remove_override(&part);
            self.removed.insert(part);
        }

        self.structure_changed = true;
        Ok(())
    }

    /// Write the package to `path`.
    ///
    /// The output goes to a sibling temporary file first and is renamed over
    /// `path` once complete, so a failed save leaves the target untouched.
    pub fn save<P: AsRef<Path>>(&mut self, path: P, options: &SaveOptions) -> XlsxResult<()> {
        let path = path.as_ref();
        let tmp = temp_path(path);

        let written = File::create(&tmp)
            .map_err(XlsxError::from)
            .and_then(|file| self.write_to(BufWriter::new(file), options))
            .and_then(|out| {
                let file = out.into_inner().map_err(|e| e.into_error())?;
                file.sync_all()?;
                Ok(())
            });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        fs::rename(&tmp, path)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    /// Serialize the package into memory
    pub fn to_bytes(&mut self, options: &SaveOptions) -> XlsxResult<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()), options)?.into_inner())
    }

    fn prepare_shared_strings(&mut self) -> bool {
        let dirty = self.strings.as_ref().is_some_and(|s| s.is_modified());
        if dirty && self.strings_part.is_none() {
            let part = resolve_target(&self.workbook_part, "sharedStrings.xml");
            self.workbook_rels.add(
                ns::REL_SHARED_STRINGS,
                &relative_target(&self.workbook_part, &part),
            );
            self.content_types.set_override(&part, ns::CT_SHARED_STRINGS);
            self.strings_part = Some(part);
            self.strings_is_new = true;
            self.structure_changed = true;
        }
        dirty || self.strings_is_new
    }

    fn prepare_styles(&mut self) -> bool {
        let dirty = self
            .styles
            .as_ref()
            .is_some_and(|(table, _)| table.is_modified());
        let registered = find_by_suffix(&self.workbook_rels, "styles").is_some();
        if dirty && self.styles_is_new && !registered {
            self.workbook_rels.add(
                ns::REL_STYLES,
                &relative_target(&self.workbook_part, &self.styles_part),
            );
            self.content_types
                .set_override(&self.styles_part, ns::CT_STYLES);
            self.structure_changed = true;
        }
        dirty
    }

    fn write_to<W: Write + Seek>(&mut self, out: W, options: &SaveOptions) -> XlsxResult<W> {
        let strings_dirty = self.prepare_shared_strings();
        let styles_dirty = self.prepare_styles();
        let workbook_rels_part = rels_part_for(&self.workbook_part);

        let mut writer = PackageWriter::new(out, options);
        let mut seen = AHashSet::new();

        for index in 0..self.archive.len() {
            let name = self.archive.by_index_raw(index)?.name().to_string();
            if self.removed.contains(&name) || !seen.insert(name.clone()) {
                continue;
            }

            if self.structure_changed && name == content_types::PART_NAME {
                writer.write_part(&name, self.content_types.to_xml().as_bytes())?;
            } else if self.structure_changed && name == self.workbook_part {
                let source = read_index(&mut self.archive, index)?;
                let xml = rewrite_workbook(&source, &self.sheets, &self.original_ids)?;
                writer.write_part(&name, &xml)?;
            } else if self.structure_changed && name == workbook_rels_part {
                writer.write_part(&name, self.workbook_rels.to_xml().as_bytes())?;
            } else if strings_dirty && self.strings_part.as_deref() == Some(name.as_str()) {
                if let Some(strings) = &self.strings {
                    write_shared_strings(strings, writer.start(&name)?)?;
                }
            } else if styles_dirty && name == self.styles_part {
                if let Some((table, part)) = &self.styles {
                    let source = read_index(&mut self.archive, index)?;
                    let xml = write_styles(&source, table, part)?;
                    writer.write_part(&name, &xml)?;
                }
            } else if let Some(sheet) = self.loaded.get(&name).filter(|s| s.is_modified()) {
                let source = read_index(&mut self.archive, index)?;
                write_worksheet(&source, sheet, writer.start(&name)?)?;
            } else {
                writer.copy_raw(&mut self.archive, index)?;
            }
        }

        // parts that did not exist in the source
        let empty_sheet = template::empty_worksheet();
        for sheet in self.sheets.iter() {
            if !self.added.contains(&sheet.part) || seen.contains(&sheet.part) {
                continue;
            }
            if let Some(store) = self.loaded.get(&sheet.part) {
                write_worksheet(empty_sheet.as_bytes(), store, writer.start(&sheet.part)?)?;
            }
        }
        if self.strings_is_new {
            if let (Some(part), Some(strings)) = (&self.strings_part, &self.strings) {
                if !seen.contains(part) {
                    write_shared_strings(strings, writer.start(part)?)?;
                }
            }
        }
        if styles_dirty && self.styles_is_new && !seen.contains(&self.styles_part) {
            if let Some((table, part)) = &self.styles {
                let xml = write_styles(template::default_styles().as_bytes(), table, part)?;
                writer.write_part(&self.styles_part, &xml)?;
            }
        }

        writer.finish()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook.xlsx".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
