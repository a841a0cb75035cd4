//! Typed field conversion in both directions

use std::borrow::Cow;
use std::fmt;

use rowcsv_core::{ColumnType, FieldValue, FileFormat, ParseFailure};

/// A non-empty field that does not parse as its column type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    /// Declared type of the column
    pub column_type: ColumnType,
    /// Normalized field text
    pub text: String,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {} value", self.text, self.column_type)
    }
}

impl std::error::Error for InvalidField {}

/// Converts between field text and [`FieldValue`] using a file's conventions
#[derive(Debug, Clone, Copy)]
pub struct FieldConverter<'f> {
    format: &'f FileFormat,
}

impl<'f> FieldConverter<'f> {
    /// Create a converter for a file format
    pub fn new(format: &'f FileFormat) -> Self {
        Self { format }
    }

    /// Convert normalized field text into a value of the column's type
    ///
    /// Empty text is always null. Unparseable text follows the format's
    /// [`ParseFailure`] policy.
    pub fn convert(&self, column_type: ColumnType, raw: &str) -> Result<FieldValue, InvalidField> {
        if raw.is_empty() {
            return Ok(FieldValue::Null);
        }

        let parsed = match column_type {
            ColumnType::Unknown => return Ok(FieldValue::Null),
            ColumnType::String => return Ok(FieldValue::text(raw)),
            ColumnType::Boolean => {
                return Ok(FieldValue::Bool(
                    raw.to_lowercase() == self.format.true_value().to_lowercase(),
                ))
            }
            ColumnType::Integer => self.parse_integer(raw).map(FieldValue::Int),
            ColumnType::Decimal => self.parse_decimal(raw).map(FieldValue::Decimal),
            ColumnType::DateTime => self
                .format
                .date_pattern()
                .parse(raw)
                .map(FieldValue::Timestamp),
        };

        match parsed {
            Some(value) => Ok(value),
            None => self.fallback(column_type, raw),
        }
    }

    /// Render a value as field text (before quoting)
    ///
    /// Columns of unknown type always render empty. Infinite and NaN
    /// decimals render as `inf` and `NaN`, which do not read back;
    /// [`CsvWriter`](crate::CsvWriter) refuses them.
    pub fn render(&self, column_type: ColumnType, value: &FieldValue) -> String {
        if column_type == ColumnType::Unknown {
            return String::new();
        }

        match value {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(true) => self.format.true_value().to_string(),
            FieldValue::Bool(false) => self.format.false_value().to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Decimal(n) => self.render_decimal(*n),
            FieldValue::Timestamp(t) => self.format.date_pattern().format(t).unwrap_or_default(),
        }
    }

    fn fallback(&self, column_type: ColumnType, raw: &str) -> Result<FieldValue, InvalidField> {
        tracing::trace!(%column_type, text = raw, "unparseable field");

        match self.format.parse_failure() {
            ParseFailure::Default => Ok(match column_type {
                ColumnType::Integer => FieldValue::Int(0),
                ColumnType::Decimal => FieldValue::Decimal(0.0),
                _ => FieldValue::Null,
            }),
            ParseFailure::Null => Ok(FieldValue::Null),
            ParseFailure::Error => Err(InvalidField {
                column_type,
                text: raw.to_string(),
            }),
        }
    }

    fn parse_integer(&self, raw: &str) -> Option<i64> {
        self.ungroup(raw.trim()).parse().ok()
    }

    fn parse_decimal(&self, raw: &str) -> Option<f64> {
        let ungrouped = self.ungroup(raw.trim());
        let separator = self.format.decimal_separator();
        let text = if separator == '.' {
            ungrouped
        } else {
            Cow::Owned(ungrouped.replace(separator, "."))
        };

        if is_invariant_decimal(&text) {
            text.parse().ok()
        } else {
            None
        }
    }

    /// Remove thousands separators, but only from well formed digit groups
    fn ungroup<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let separator = self.format.thousands_separator();
        let decimal = self.format.decimal_separator();
        if !text.contains(separator) || separator.contains(decimal) {
            return Cow::Borrowed(text);
        }

        let (integer, fraction) = match text.find(decimal) {
            Some(pos) => text.split_at(pos),
            None => (text, ""),
        };
        let digits = integer.trim_start_matches(['+', '-']);
        let well_formed = !fraction.contains(separator)
            && digits.split(separator).enumerate().all(|(index, group)| {
                let sized = if index == 0 {
                    (1..=3).contains(&group.len())
                } else {
                    group.len() == 3
                };
                sized && group.bytes().all(|b| b.is_ascii_digit())
            });

        if well_formed {
            Cow::Owned(text.replace(separator, ""))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn render_decimal(&self, value: f64) -> String {
        let text = value.to_string();
        let separator = self.format.decimal_separator();
        if separator == '.' {
            text
        } else {
            text.replace('.', separator.encode_utf8(&mut [0; 4]))
        }
    }
}

/// Optional sign, digits and at most one decimal point
fn is_invariant_decimal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut points = 0;
    let mut numerals = 0;
    for b in digits.bytes() {
        match b {
            b'0'..=b'9' => numerals += 1,
            b'.' => points += 1,
            _ => return false,
        }
    }
    numerals > 0 && points <= 1
}
