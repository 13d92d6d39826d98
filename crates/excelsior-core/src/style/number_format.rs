//! Number format types

/// Number format of a style record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (id 0)
    #[default]
    General,

    /// Built-in format by ID; no `<numFmt>` entry is needed
    BuiltIn(u32),

    /// Custom format code, stored in `<numFmts>` with an id >= 164
    Custom(String),
}

/// Built-in formats Excel knows without a `<numFmt>` declaration
const BUILTIN_CODES: [(u32, &str); 27] = [
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

/// First id available for custom formats
pub const FIRST_CUSTOM_NUM_FMT_ID: u32 = 164;

impl NumberFormat {
    /// Map a format code to the built-in id when one exists.
    ///
    /// # Examples
    /// ```
    /// use excelsior_core::NumberFormat;
    ///
    /// assert_eq!(NumberFormat::from_code("0.00"), NumberFormat::BuiltIn(2));
    /// assert_eq!(NumberFormat::from_code("General"), NumberFormat::General);
    /// assert_eq!(
    ///     NumberFormat::from_code("0.000"),
    ///     NumberFormat::Custom("0.000".into())
    /// );
    /// ```
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("general") {
            return NumberFormat::General;
        }
        match BUILTIN_CODES.iter().find(|(_, c)| *c == code) {
            Some((id, _)) => NumberFormat::BuiltIn(*id),
            None => NumberFormat::Custom(code.to_string()),
        }
    }

    /// Map a `numFmtId` with no `<numFmt>` entry
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// The format code, when known
    pub fn code(&self) -> Option<&str> {
        match self {
            NumberFormat::General => Some("General"),
            NumberFormat::BuiltIn(id) => BUILTIN_CODES
                .iter()
                .find(|(i, _)| i == id)
                .map(|(_, code)| *code),
            NumberFormat::Custom(code) => Some(code),
        }
    }

    /// The id for non-custom formats
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }
}
