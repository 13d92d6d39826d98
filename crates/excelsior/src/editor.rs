//! Mutation facade over one workbook

use std::path::Path;

use ahash::AHashMap;
use excelsior_core::{
    validate_width, AlignSpec, BorderStyle, CellAddress, CellRange, CellValue, ColumnBatch,
    ColumnSpan, FillStyle, FontPatch, NumberFormat, RangeRef, StylePatch, StyleRecord,
};
use excelsior_xlsx::{Package, SaveOptions, SheetContext};

use crate::error::{Error, Result};
use crate::scanner::Scanner;

/// Edits a workbook one active sheet at a time.
///
/// Every method validates its arguments before touching the workbook, so a
/// call that returns an error leaves nothing half-applied.
///
/// # Example
///
/// ```no_run
/// use excelsior::{AlignSpec, Editor, HorizontalAlignment};
///
/// let mut editor = Editor::open("report.xlsx", Some("Data"))?;
/// editor.append_table_at("A1", &[vec!["name", "value"], vec!["alpha", "10"]])?;
/// editor.set_alignment("A2:", AlignSpec::new().horizontal(HorizontalAlignment::Center))?;
/// editor.set_column_width("A", 18.5)?;
/// editor.save("report.xlsx")?;
/// # Ok::<(), excelsior::Error>(())
/// ```
#[derive(Debug)]
pub struct Editor {
    package: Package,
    active: String,
}

impl Editor {
    /// Open `path` and activate `sheet` (the first sheet when `None`)
    pub fn open<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Self> {
        Scanner::open(path)?.open_editor(sheet)
    }

    /// Write a new workbook with a single empty sheet to `path` and edit it
    pub fn create<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Self> {
        let mut package = Package::create(sheet)?;
        package.save(path.as_ref(), &SaveOptions::default())?;
        let first = package
            .sheet_names()
            .into_iter()
            .next()
            .ok_or(Error::NoSheets)?;
        Self::from_package(package, &first)
    }

    pub(crate) fn from_package(mut package: Package, sheet: &str) -> Result<Self> {
        package.context(sheet)?;
        let active = stored_name(&package, sheet)?;
        Ok(Self { package, active })
    }

    fn context(&mut self) -> Result<SheetContext<'_>> {
        Ok(self.package.context(&self.active)?)
    }

    /// Name of the sheet edits currently go to
    pub fn active_sheet(&self) -> &str {
        &self.active
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.package.sheet_names()
    }

    /// Make `name` the active sheet, loading it on first use
    pub fn with_worksheet(&mut self, name: &str) -> Result<&mut Self> {
        self.package.context(name)?;
        self.active = stored_name(&self.package, name)?;
        Ok(self)
    }

    // ---- cells ----

    /// Store `text` in a cell as a shared string
    pub fn set_cell(&mut self, addr: &str, text: &str) -> Result<()> {
        let at = CellAddress::parse(addr)?;
        let ctx = self.context()?;
        ctx.sheet.set_text(at.row, at.col, text, ctx.strings);
        Ok(())
    }

    pub fn set_cell_number(&mut self, addr: &str, value: f64) -> Result<()> {
        let at = CellAddress::parse(addr)?;
        if !value.is_finite() {
            return Err(excelsior_core::Error::other(format!(
                "cannot store {} in {}",
                value, at
            ))
            .into());
        }
        self.context()?
            .sheet
            .set_value(at.row, at.col, CellValue::Number(value));
        Ok(())
    }

    pub fn set_cell_bool(&mut self, addr: &str, value: bool) -> Result<()> {
        let at = CellAddress::parse(addr)?;
        self.context()?
            .sheet
            .set_value(at.row, at.col, CellValue::Boolean(value));
        Ok(())
    }

    /// Store a formula. It is written without a cached value; Excel
    /// computes it on load.
    pub fn set_formula(&mut self, addr: &str, formula: &str) -> Result<()> {
        let at = CellAddress::parse(addr)?;
        let text = formula.trim();
        let text = text.strip_prefix('=').unwrap_or(text);
        if text.is_empty() {
            return Err(excelsior_core::Error::other(format!("empty formula for {}", at)).into());
        }
        self.context()?
            .sheet
            .set_value(at.row, at.col, CellValue::formula(text));
        Ok(())
    }

    /// Remove a cell's value, keeping its style
    pub fn clear_cell(&mut self, addr: &str) -> Result<()> {
        let at = CellAddress::parse(addr)?;
        self.context()?
            .sheet
            .set_value(at.row, at.col, CellValue::Empty);
        Ok(())
    }

    pub fn cell_value(&mut self, addr: &str) -> Result<Option<CellValue>> {
        let at = CellAddress::parse(addr)?;
        let ctx = self.context()?;
        Ok(ctx.sheet.value(at.row, at.col).cloned())
    }

    /// A cell's value as text, with shared strings resolved
    pub fn cell_text(&mut self, addr: &str) -> Result<Option<String>> {
        let at = CellAddress::parse(addr)?;
        let ctx = self.context()?;
        Ok(ctx
            .sheet
            .value(at.row, at.col)
            .and_then(|v| v.display(ctx.strings)))
    }

    /// The style index a cell currently uses (0 for unstyled cells)
    pub fn cell_style(&mut self, addr: &str) -> Result<u32> {
        let at = CellAddress::parse(addr)?;
        Ok(self.context()?.sheet.style_at(at.row, at.col))
    }

    /// The formatting a cell currently has
    pub fn cell_format(&mut self, addr: &str) -> Result<StyleRecord> {
        let at = CellAddress::parse(addr)?;
        let ctx = self.context()?;
        let index = ctx.sheet.style_at(at.row, at.col);
        Ok(ctx
            .styles
            .get(index)
            .unwrap_or_else(|| ctx.styles.default_record())
            .clone())
    }

    // ---- bulk ----

    /// Write rows of text with the top-left corner at `anchor`.
    ///
    /// Every value is stored as text, numbers included. Returns the block
    /// written, or `None` for empty input.
    pub fn append_table_at<S: AsRef<str>>(
        &mut self,
        anchor: &str,
        rows: &[Vec<S>],
    ) -> Result<Option<CellRange>> {
        let at = CellAddress::parse(anchor)?;
        let ctx = self.context()?;
        Ok(ctx.sheet.write_text_block(at, rows, ctx.strings)?)
    }

    /// Write `values` as text into the row below the last populated row
    /// and return that row's index.
    pub fn append_row<S: AsRef<str>>(&mut self, values: &[S]) -> Result<u32> {
        let ctx = self.context()?;
        let row = ctx.sheet.max_row().map_or(0, |r| r + 1);
        let cells: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
        ctx.sheet
            .write_text_block(CellAddress::new(row, 0), &[cells], ctx.strings)?;
        Ok(row)
    }

    /// Write a typed batch as a header row followed by its values.
    ///
    /// Numbers and booleans keep their type. Only values are written; the
    /// styles of cells inside and outside the block are left alone.
    pub fn bulk_load_columnar(
        &mut self,
        anchor: &str,
        batch: &ColumnBatch,
    ) -> Result<Option<CellRange>> {
        let at = CellAddress::parse(anchor)?;
        let ctx = self.context()?;
        let block = ctx.sheet.write_columns(at, batch, ctx.strings)?;
        if let Some(block) = block {
            log::debug!("bulk load of {} cells at {}", block.cell_count(), block);
        }
        Ok(block)
    }

    // ---- formatting ----

    /// Merge `patch` into the style of every cell in `range`.
    ///
    /// Each cell keeps the parts of its current style that the patch does
    /// not mention, so cells with different styles may end up with
    /// different new indices.
    pub fn apply_style(&mut self, range: &str, patch: &StylePatch) -> Result<()> {
        patch.validate()?;
        let range = RangeRef::parse(range)?;
        let ctx = self.context()?;
        let Some(cells) = range.resolve(ctx.sheet) else {
            return Ok(());
        };

        let mut merged: AHashMap<u32, u32> = AHashMap::new();
        for at in cells.cells() {
            let base = ctx.sheet.style_at(at.row, at.col);
            let style = *merged
                .entry(base)
                .or_insert_with(|| ctx.styles.merge_partial(base, patch));
            ctx.sheet.set_style(at.row, at.col, style);
        }
        Ok(())
    }

    pub fn set_font(&mut self, range: &str, font: FontPatch) -> Result<()> {
        self.apply_style(range, &StylePatch::new().font(font))
    }

    pub fn set_fill(&mut self, range: &str, fill: FillStyle) -> Result<()> {
        self.apply_style(range, &StylePatch::new().fill(fill))
    }

    pub fn set_border(&mut self, range: &str, border: BorderStyle) -> Result<()> {
        self.apply_style(range, &StylePatch::new().border(border))
    }

    pub fn set_alignment(&mut self, range: &str, alignment: AlignSpec) -> Result<()> {
        self.apply_style(range, &StylePatch::new().alignment(alignment))
    }

    /// Apply a number format code such as `"0.00%"` or `"yyyy-mm-dd"`
    pub fn set_number_format(&mut self, range: &str, code: &str) -> Result<()> {
        let format = NumberFormat::from_code(code);
        self.apply_style(range, &StylePatch::new().number_format(format))
    }

    pub fn set_font_with_alignment(
        &mut self,
        range: &str,
        font: FontPatch,
        alignment: AlignSpec,
    ) -> Result<()> {
        self.apply_style(range, &StylePatch::new().font(font).alignment(alignment))
    }

    /// Reset the cells in `range` to the default style.
    ///
    /// Other cells sharing their previous style are not affected.
    pub fn remove_style(&mut self, range: &str) -> Result<()> {
        let range = RangeRef::parse(range)?;
        let ctx = self.context()?;
        if let Some(cells) = range.resolve(ctx.sheet) {
            for at in cells.cells() {
                ctx.sheet.set_style(at.row, at.col, 0);
            }
        }
        Ok(())
    }

    /// Merge the cells of a closed range such as `"A1:C1"`
    ///
    /// Returns `false` when exactly this region was already merged.
    pub fn merge_cells(&mut self, range: &str) -> Result<bool> {
        let range = match RangeRef::parse(range)? {
            RangeRef::Range(r) => r,
            RangeRef::Cell(a) => CellRange::single(a),
            other => {
                return Err(excelsior_core::Error::InvalidRange(other.to_string()).into());
            }
        };
        Ok(self.context()?.sheet.merged_mut().add(range)?)
    }

    // ---- column widths ----

    /// Set the width of one column (`"A"`) or a column run (`"B:D"`)
    pub fn set_column_width(&mut self, column: &str, width: f64) -> Result<()> {
        self.set_widths(vec![(ColumnSpan::parse(column)?, width)])
    }

    /// Set the width of a column range such as `"B:D"`
    pub fn set_column_width_range(&mut self, range: &str, width: f64) -> Result<()> {
        self.set_widths(vec![(ColumnSpan::parse(range)?, width)])
    }

    /// Give every listed column or run (`["F", "H:I"]`) the same width
    pub fn set_columns_width<S: AsRef<str>>(&mut self, columns: &[S], width: f64) -> Result<()> {
        let spans = columns
            .iter()
            .map(|c| ColumnSpan::parse(c.as_ref()).map(|span| (span, width)))
            .collect::<excelsior_core::Result<Vec<_>>>()?;
        self.set_widths(spans)
    }

    /// Set widths from `(column, width)` pairs, e.g. `[("K", 14.0), ("M:N", 33.0)]`
    pub fn set_column_widths<I, K>(&mut self, widths: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let spans = widths
            .into_iter()
            .map(|(c, w)| ColumnSpan::parse(c.as_ref()).map(|span| (span, w)))
            .collect::<excelsior_core::Result<Vec<_>>>()?;
        self.set_widths(spans)
    }

    fn set_widths(&mut self, spans: Vec<(ColumnSpan, f64)>) -> Result<()> {
        for (_, width) in &spans {
            validate_width(*width)?;
        }
        if spans.is_empty() {
            return Ok(());
        }
        let ctx = self.context()?;
        let columns = ctx.sheet.columns_mut();
        for (span, width) in spans {
            columns.set(span.first, span.last, width)?;
        }
        Ok(())
    }

    /// Effective width of a column, `None` when it has the default width
    pub fn column_width(&mut self, column: &str) -> Result<Option<f64>> {
        let col = excelsior_core::parse_column(column)?;
        Ok(self.context()?.sheet.columns().width(col))
    }

    // ---- queries ----

    /// 0-based index of the last row holding a value in the referenced
    /// column(s). Accepts `"B"`, `"B:D"`, `"B7"` or `"B7:"`.
    pub fn last_row_index(&mut self, reference: &str) -> Result<Option<u32>> {
        let span = columns_of(reference)?;
        Ok(self
            .context()?
            .sheet
            .last_row_in_columns(span.first, span.last))
    }

    /// [`last_row_index`](Self::last_row_index) for several references
    pub fn last_rows_index<S: AsRef<str>>(&mut self, references: &[S]) -> Result<Vec<Option<u32>>> {
        let spans = references
            .iter()
            .map(|r| columns_of(r.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let ctx = self.context()?;
        Ok(spans
            .iter()
            .map(|span| ctx.sheet.last_row_in_columns(span.first, span.last))
            .collect())
    }

    // ---- sheets ----

    /// Append an empty sheet; the active sheet does not change
    pub fn add_worksheet(&mut self, name: &str) -> Result<usize> {
        Ok(self.package.add_sheet(name, None)?)
    }

    /// Insert an empty sheet at `index` (clamped to the end)
    pub fn add_worksheet_at(&mut self, name: &str, index: usize) -> Result<usize> {
        Ok(self.package.add_sheet(name, Some(index))?)
    }

    pub fn rename_worksheet(&mut self, old: &str, new: &str) -> Result<()> {
        let renames_active = self.is_active(old);
        self.package.rename_sheet(old, new)?;
        if renames_active {
            self.active = new.trim().to_string();
        }
        Ok(())
    }

    /// Delete a sheet. Deleting the active sheet activates the first one.
    pub fn delete_worksheet(&mut self, name: &str) -> Result<()> {
        let deletes_active = self.is_active(name);
        self.package.delete_sheet(name)?;
        if deletes_active {
            let first = self
                .package
                .sheet_names()
                .into_iter()
                .next()
                .ok_or(Error::NoSheets)?;
            self.with_worksheet(&first)?;
        }
        Ok(())
    }

    fn is_active(&self, name: &str) -> bool {
        let sheets = self.package.sheets();
        sheets.position(name).is_some() && sheets.position(name) == sheets.position(&self.active)
    }

    // ---- output ----

    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.save_with(path, &SaveOptions::default())
    }

    pub fn save_with<P: AsRef<Path>>(&mut self, path: P, options: &SaveOptions) -> Result<()> {
        Ok(self.package.save(path, options)?)
    }

    /// Serialize the workbook into memory
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.package.to_bytes(&SaveOptions::default())?)
    }
}

/// Columns covered by a reference given to the "last row" queries
fn columns_of(reference: &str) -> Result<ColumnSpan> {
    Ok(match RangeRef::parse(reference)? {
        RangeRef::Cell(at) | RangeRef::OpenFrom(at) => ColumnSpan::single(at.col),
        RangeRef::Columns(span) => span,
        RangeRef::Range(range) => ColumnSpan {
            first: range.start.col,
            last: range.end.col,
        },
    })
}

/// The name as the workbook spells it
fn stored_name(package: &Package, name: &str) -> Result<String> {
    package
        .sheets()
        .find(name)
        .map(|s| s.name.clone())
        .ok_or_else(|| excelsior_core::Error::SheetNotFound(name.to_string()).into())
}
