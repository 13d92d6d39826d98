//! Cell value types

use crate::strings::SharedStringTable;
use std::fmt;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (style only, or nothing)
    #[default]
    Empty,

    /// Index into the workbook's [`SharedStringTable`]
    SharedString(u32),

    /// `t="inlineStr"` text stored in the cell itself
    InlineString(String),

    /// Numeric value (all numbers stored as f64, including dates)
    Number(f64),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Formula carried through unevaluated
    Formula(Box<FormulaCell>),

    /// Error literal such as `#N/A`
    Error(String),

    /// A typed value this crate does not interpret, such as an ISO 8601
    /// date (`t="d"`). Written back with the same `t` and `<v>` text.
    Raw { cell_type: String, value: String },
}

/// A formula cell as found in the sheet XML.
///
/// Formulas are never evaluated; the text, the `<f>` attributes (shared and
/// array formulas) and the cached result are kept so the cell is written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormulaCell {
    /// Formula text without a leading `=`
    pub text: String,
    /// Attributes of the `<f>` element (`t`, `ref`, `si`, ...)
    pub attributes: Vec<(String, String)>,
    /// Raw text of `<v>`, when a cached result is present
    pub cached: Option<String>,
    /// The cell's `t` attribute describing the cached result
    pub cached_type: Option<String>,
}

impl FormulaCell {
    pub fn new<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        let text = match text.strip_prefix('=') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        Self {
            text,
            ..Self::default()
        }
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Group index (`si`) of a shared formula
    pub fn shared_index(&self) -> Option<&str> {
        match self.attribute("t") {
            Some("shared") => self.attribute("si"),
            _ => None,
        }
    }

    /// The cell of a shared group that carries the text and the `ref`
    pub fn is_shared_master(&self) -> bool {
        self.shared_index().is_some() && self.attribute("ref").is_some()
    }

    /// The cached result as a plain value, typed by `cached_type`
    pub fn cached_value(&self) -> CellValue {
        let Some(cached) = &self.cached else {
            return CellValue::Empty;
        };
        match self.cached_type.as_deref() {
            None | Some("n") => match cached.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::InlineString(cached.clone()),
            },
            Some("str") | Some("inlineStr") => CellValue::InlineString(cached.clone()),
            Some("b") => CellValue::Boolean(matches!(cached.trim(), "1" | "true")),
            Some("e") => CellValue::Error(cached.clone()),
            Some(other) => CellValue::Raw {
                cell_type: other.to_string(),
                value: cached.clone(),
            },
        }
    }
}

impl CellValue {
    /// Create a new formula value
    pub fn formula<S: Into<String>>(text: S) -> Self {
        CellValue::Formula(Box::new(FormulaCell::new(text)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Text of the cell, resolving shared strings.
    ///
    /// Numbers use Rust's shortest round-trip formatting (`10` not `10.0`);
    /// formulas show their cached result when there is one.
    pub fn display(&self, strings: &SharedStringTable) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::SharedString(idx) => strings.get(*idx).map(str::to_string),
            CellValue::InlineString(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Boolean(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            CellValue::Formula(f) => f.cached.clone(),
            CellValue::Error(e) => Some(e.clone()),
            CellValue::Raw { value, .. } => Some(value.clone()),
        }
    }
}

/// Render a number the way it is written into `<v>`
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::SharedString(idx) => write!(f, "<sst {}>", idx),
            CellValue::InlineString(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Formula(formula) => write!(f, "={}", formula.text),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Raw { value, .. } => write!(f, "{}", value),
        }
    }
}

/// One stored cell: value, style index and any attributes we do not model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    /// Index into the workbook's style table; 0 is the default style
    pub style: u32,
    /// Extra `<c>` attributes from the source (`cm`, `vm`, `ph`)
    pub extra: Vec<(String, String)>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// A cell with no value, no style and nothing to preserve
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style == 0 && self.extra.is_empty()
    }
}
