//! Exact date/time patterns
//!
//! Files describe their date layout with custom patterns such as `yyyy-MM-dd`
//! or `dd/MM/yyyy HH:mm:ss`. A [`DatePattern`] translates such a pattern into a
//! chrono strftime string once, and is then used both to parse fields on read
//! and to render timestamps on write.
//!
//! Supported specifiers:
//!
//! | Pattern | Meaning | strftime |
//! |---------|---------|----------|
//! | `yyyy` | four digit year | `%Y` |
//! | `yy` | two digit year | `%y` |
//! | `MM` / `M` | month | `%m` / `%-m` |
//! | `MMM` / `MMMM` | month name | `%b` / `%B` |
//! | `dd` / `d` | day | `%d` / `%-d` |
//! | `ddd` / `dddd` | weekday name | `%a` / `%A` |
//! | `HH` / `H` | hour (24h) | `%H` / `%-H` |
//! | `hh` / `h` | hour (12h) | `%I` / `%-I` |
//! | `mm` / `m` | minute | `%M` / `%-M` |
//! | `ss` / `s` | second | `%S` / `%-S` |
//! | `f`..`fffffffff` | fraction | `%3f` / `%6f` / `%9f` |
//! | `t` / `tt` | AM/PM | `%p` |
//!
//! Text between single or double quotes and characters escaped with `\` are
//! literals. A pattern that already contains `%` is taken as a strftime string.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// A validated exact date pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    strftime: String,
}

impl DatePattern {
    /// Translate and validate a pattern
    pub fn new(source: &str) -> Result<Self> {
        let strftime = if source.contains('%') {
            source.to_string()
        } else {
            translate(source)?
        };

        if StrftimeItems::new(&strftime).any(|item| item == Item::Error) {
            return Err(Error::InvalidDateFormat(source.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            strftime,
        })
    }

    /// Pattern as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Equivalent chrono strftime string
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Parse text that matches the pattern exactly
    ///
    /// Patterns without time components produce midnight.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, &self.strftime)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.strftime)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Render a timestamp, `None` when the pattern needs data a naive timestamp lacks
    pub fn format(&self, value: &NaiveDateTime) -> Option<String> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.strftime)).ok()?;
        Some(out)
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        Self {
            source: "yyyy-MM-dd".to_string(),
            strftime: "%Y-%m-%d".to_string(),
        }
    }
}

fn translate(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&next| next == c).count();

        match c {
            '\'' | '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&next| next == c)
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| Error::InvalidDateFormat(pattern.to_string()))?;
                for &literal in &chars[i + 1..end] {
                    push_literal(&mut out, literal);
                }
                i = end + 1;
                continue;
            }
            '\\' => {
                let literal = chars
                    .get(i + 1)
                    .ok_or_else(|| Error::InvalidDateFormat(pattern.to_string()))?;
                push_literal(&mut out, *literal);
                i += 2;
                continue;
            }
            'y' => out.push_str(if run <= 2 { "%y" } else { "%Y" }),
            'M' => out.push_str(match run {
                1 => "%-m",
                2 => "%m",
                3 => "%b",
                _ => "%B",
            }),
            'd' => out.push_str(match run {
                1 => "%-d",
                2 => "%d",
                3 => "%a",
                _ => "%A",
            }),
            'H' => out.push_str(if run == 1 { "%-H" } else { "%H" }),
            'h' => out.push_str(if run == 1 { "%-I" } else { "%I" }),
            'm' => out.push_str(if run == 1 { "%-M" } else { "%M" }),
            's' => out.push_str(if run == 1 { "%-S" } else { "%S" }),
            'f' | 'F' => out.push_str(match run {
                1..=3 => "%3f",
                4..=6 => "%6f",
                _ => "%9f",
            }),
            't' => out.push_str("%p"),
            // offsets and eras have no meaning for naive timestamps
            'z' | 'K' | 'g' => return Err(Error::InvalidDateFormat(pattern.to_string())),
            _ => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
            }
        }

        i += run;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_translate_common_patterns() {
        assert_eq!(DatePattern::new("yyyy-MM-dd").unwrap().strftime(), "%Y-%m-%d");
        assert_eq!(
            DatePattern::new("dd/MM/yyyy HH:mm:ss").unwrap().strftime(),
            "%d/%m/%Y %H:%M:%S"
        );
        assert_eq!(
            DatePattern::new("yyyy-MM-dd'T'HH:mm:ss.fff").unwrap().strftime(),
            "%Y-%m-%dT%H:%M:%S.%3f"
        );
        assert_eq!(DatePattern::new("d.M.yy").unwrap().strftime(), "%-d.%-m.%y");
    }

    #[test]
    fn test_strftime_passthrough() {
        let pattern = DatePattern::new("%Y%m%d").unwrap();
        assert_eq!(pattern.strftime(), "%Y%m%d");
        assert_eq!(pattern.parse("20240131"), Some(ts(2024, 1, 31, 0, 0, 0)));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(DatePattern::new("yyyy-MM-dd zzz").is_err());
        assert!(DatePattern::new("yyyy 'unterminated").is_err());
        assert!(DatePattern::new("%Q").is_err());
    }

    #[test]
    fn test_parse_date_only_gives_midnight() {
        let pattern = DatePattern::default();
        assert_eq!(pattern.parse("2023-07-04"), Some(ts(2023, 7, 4, 0, 0, 0)));
        assert_eq!(pattern.parse("04/07/2023"), None);
        assert_eq!(pattern.parse("2023-02-30"), None);
    }

    #[test]
    fn test_parse_and_format_with_time() {
        let pattern = DatePattern::new("dd/MM/yyyy HH:mm:ss").unwrap();
        let value = ts(1999, 12, 31, 23, 59, 58);
        assert_eq!(pattern.parse("31/12/1999 23:59:58"), Some(value));
        assert_eq!(pattern.format(&value).as_deref(), Some("31/12/1999 23:59:58"));
    }

    #[test]
    fn test_quoted_literals() {
        let pattern = DatePattern::new("yyyy 'week' MM").unwrap();
        assert_eq!(pattern.strftime(), "%Y week %m");
        assert_eq!(pattern.format(&ts(2020, 5, 1, 0, 0, 0)).as_deref(), Some("2020 week 05"));
    }
}
