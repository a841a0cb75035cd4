//! Per-file CSV conventions

use crate::date_pattern::DatePattern;
use crate::error::{Error, Result};
use crate::QUOTE;

const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";
const DEFAULT_THOUSANDS_SEPARATOR: &str = ",";
const DEFAULT_TRUE_VALUE: &str = "1";
const DEFAULT_FALSE_VALUE: &str = "0";

/// What to do with a non-empty field that does not parse as its column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseFailure {
    /// Integers become 0, decimals 0.0 and dates null
    #[default]
    Default,
    /// Every unparseable field becomes null
    Null,
    /// Reading fails with a parse error carrying the row and column
    Error,
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
    /// Mac classic (CR)
    CR,
}

impl LineTerminator {
    /// Terminator text
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::LF => "\n",
            LineTerminator::CRLF => "\r\n",
            LineTerminator::CR => "\r",
        }
    }
}

impl Default for LineTerminator {
    /// The platform convention
    fn default() -> Self {
        if cfg!(windows) {
            LineTerminator::CRLF
        } else {
            LineTerminator::LF
        }
    }
}

/// Formatting conventions of one CSV file
///
/// Shared by the reader and the writer of the same file. Built through
/// [`FileFormat::builder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFormat {
    separator: char,
    decimal_separator: char,
    thousands_separator: String,
    date_pattern: DatePattern,
    true_value: String,
    false_value: String,
    with_header: bool,
    typed_header: bool,
    parse_failure: ParseFailure,
    line_terminator: LineTerminator,
}

impl FileFormat {
    /// Start building a format from the defaults
    pub fn builder() -> FileFormatBuilder {
        FileFormatBuilder::default()
    }

    /// Field separator (default: comma)
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Decimal separator used in the file (default: point)
    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Thousands separator (default: comma)
    pub fn thousands_separator(&self) -> &str {
        &self.thousands_separator
    }

    /// Date format as configured (default: `yyyy-MM-dd`)
    pub fn date_format(&self) -> &str {
        self.date_pattern.source()
    }

    /// Compiled date pattern
    pub fn date_pattern(&self) -> &DatePattern {
        &self.date_pattern
    }

    /// Literal for true (default: `1`)
    pub fn true_value(&self) -> &str {
        &self.true_value
    }

    /// Literal for false (default: `0`)
    pub fn false_value(&self) -> &str {
        &self.false_value
    }

    /// Whether the first line is a header (default: true)
    pub fn with_header(&self) -> bool {
        self.with_header
    }

    /// Whether header cells carry `Name|Type` (default: false)
    pub fn typed_header(&self) -> bool {
        self.typed_header
    }

    /// Policy for unparseable typed fields
    pub fn parse_failure(&self) -> ParseFailure {
        self.parse_failure
    }

    /// Line terminator used on write
    pub fn line_terminator(&self) -> LineTerminator {
        self.line_terminator
    }
}

impl Default for FileFormat {
    fn default() -> Self {
        Self {
            separator: ',',
            decimal_separator: '.',
            thousands_separator: DEFAULT_THOUSANDS_SEPARATOR.to_string(),
            date_pattern: DatePattern::default(),
            true_value: DEFAULT_TRUE_VALUE.to_string(),
            false_value: DEFAULT_FALSE_VALUE.to_string(),
            with_header: true,
            typed_header: false,
            parse_failure: ParseFailure::Default,
            line_terminator: LineTerminator::default(),
        }
    }
}

/// Builder for [`FileFormat`]
///
/// Empty strings passed to the string setters fall back to the defaults.
#[derive(Debug, Clone)]
pub struct FileFormatBuilder {
    separator: char,
    decimal_separator: char,
    thousands_separator: String,
    date_format: String,
    true_value: String,
    false_value: String,
    with_header: bool,
    typed_header: bool,
    parse_failure: ParseFailure,
    line_terminator: LineTerminator,
}

impl Default for FileFormatBuilder {
    fn default() -> Self {
        Self {
            separator: ',',
            decimal_separator: '.',
            thousands_separator: DEFAULT_THOUSANDS_SEPARATOR.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            true_value: DEFAULT_TRUE_VALUE.to_string(),
            false_value: DEFAULT_FALSE_VALUE.to_string(),
            with_header: true,
            typed_header: false,
            parse_failure: ParseFailure::Default,
            line_terminator: LineTerminator::default(),
        }
    }
}

impl FileFormatBuilder {
    /// Set the field separator
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set the decimal separator
    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Set the thousands separator
    pub fn thousands_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.thousands_separator = or_default(separator.into(), DEFAULT_THOUSANDS_SEPARATOR);
        self
    }

    /// Set the exact date format
    pub fn date_format<S: Into<String>>(mut self, format: S) -> Self {
        self.date_format = or_default(format.into(), DEFAULT_DATE_FORMAT);
        self
    }

    /// Set the literal written and recognized for true
    pub fn true_value<S: Into<String>>(mut self, value: S) -> Self {
        self.true_value = or_default(value.into(), DEFAULT_TRUE_VALUE);
        self
    }

    /// Set the literal written for false
    pub fn false_value<S: Into<String>>(mut self, value: S) -> Self {
        self.false_value = or_default(value.into(), DEFAULT_FALSE_VALUE);
        self
    }

    /// Set whether the first line is a header
    pub fn with_header(mut self, with_header: bool) -> Self {
        self.with_header = with_header;
        self
    }

    /// Set whether header cells carry `Name|Type`
    pub fn typed_header(mut self, typed_header: bool) -> Self {
        self.typed_header = typed_header;
        self
    }

    /// Set the policy for unparseable typed fields
    pub fn parse_failure(mut self, policy: ParseFailure) -> Self {
        self.parse_failure = policy;
        self
    }

    /// Set the line terminator used on write
    pub fn line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Validate and build the format
    pub fn build(self) -> Result<FileFormat> {
        if matches!(self.separator, QUOTE | '\r' | '\n') {
            return Err(Error::InvalidSeparator(self.separator));
        }

        Ok(FileFormat {
            separator: self.separator,
            decimal_separator: self.decimal_separator,
            thousands_separator: self.thousands_separator,
            date_pattern: DatePattern::new(&self.date_format)?,
            true_value: self.true_value,
            false_value: self.false_value,
            with_header: self.with_header,
            typed_header: self.typed_header,
            parse_failure: self.parse_failure,
            line_terminator: self.line_terminator,
        })
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
