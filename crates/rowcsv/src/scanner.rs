//! Field boundary scanning
//!
//! Offsets and lengths are byte offsets into the logical line; they always
//! fall on character boundaries because the scanner advances by whole
//! characters and the separator is a whole character.

use std::borrow::Cow;

use rowcsv_core::QUOTE;

const ESCAPED_QUOTE: &str = "\"\"";

/// Length of the field starting at `start`, up to the next unquoted separator
///
/// The length includes any quote characters; stripping them is done by
/// [`normalize_field`]. A doubled quote is an escape and never toggles the
/// quoted state. Returns 0 when `start` is at or past the end of the line.
pub fn scan_field(line: &str, start: usize, separator: char) -> usize {
    if start >= line.len() {
        return 0;
    }

    let mut in_quotes = false;
    let mut pending_escape = false;
    let mut length = 0;
    let mut chars = line[start..].chars().peekable();

    while let Some(current) = chars.next() {
        if current == separator && !in_quotes {
            break;
        }

        length += current.len_utf8();

        // the second quote of an escaped pair never opens another pair,
        // so the last quote of `"b"""` still closes the field
        if current == QUOTE {
            if pending_escape {
                pending_escape = false;
            } else if chars.peek() == Some(&QUOTE) {
                pending_escape = true;
            } else {
                in_quotes = !in_quotes;
            }
        }
    }

    length
}

/// Strip matching outer quotes and collapse doubled quotes
pub fn normalize_field(field: &str) -> Cow<'_, str> {
    if field.len() < 2 {
        return Cow::Borrowed(field);
    }

    let inner = if field.starts_with(QUOTE) && field.ends_with(QUOTE) {
        &field[1..field.len() - 1]
    } else {
        field
    };

    if inner.contains(ESCAPED_QUOTE) {
        Cow::Owned(inner.replace(ESCAPED_QUOTE, "\""))
    } else {
        Cow::Borrowed(inner)
    }
}

/// Split a logical line into its raw (not normalized) fields
///
/// A line with `n` unquoted separators always yields `n + 1` fields.
pub fn split_fields(line: &str, separator: char) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;

    loop {
        let length = scan_field(line, start, separator);
        fields.push(&line[start..start + length]);
        start += length;
        if start >= line.len() {
            break;
        }
        start += separator.len_utf8();
    }

    fields
}

/// Number of quote characters in a line
pub fn count_quotes(line: &str) -> usize {
    line.chars().filter(|&c| c == QUOTE).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_plain_fields() {
        let line = "a,bc,,d";
        assert_eq!(scan_field(line, 0, ','), 1);
        assert_eq!(scan_field(line, 2, ','), 2);
        assert_eq!(scan_field(line, 5, ','), 0);
        assert_eq!(scan_field(line, 6, ','), 1);
        assert_eq!(scan_field(line, 7, ','), 0);
    }

    #[test]
    fn test_scan_quoted_separator_is_not_a_boundary() {
        let line = "\"x,y\",z";
        assert_eq!(scan_field(line, 0, ','), 5);
        assert_eq!(&line[6..6 + scan_field(line, 6, ',')], "z");
    }

    #[test]
    fn test_scan_escaped_quotes() {
        let line = "\"b\"\"c\",d";
        assert_eq!(scan_field(line, 0, ','), 6);

        // escaped quote followed by a separator inside the quotes
        let line = "\"say \"\"hi, there\"\"\",next";
        let length = scan_field(line, 0, ',');
        assert_eq!(&line[..length], "\"say \"\"hi, there\"\"\"");
    }

    #[test]
    fn test_scan_quotes_next_to_outer_quotes() {
        // value `"b` written quoted
        assert_eq!(scan_field("\"\"\"b\",x", 0, ','), 5);
        // value `b"` written quoted
        assert_eq!(scan_field("\"b\"\"\",x", 0, ','), 5);
    }

    #[test]
    fn test_scan_empty_quoted_field() {
        assert_eq!(scan_field("\"\",x", 0, ','), 2);
    }

    #[test]
    fn test_scan_multibyte_separator_and_text() {
        let line = "año¦mañana";
        let length = scan_field(line, 0, '¦');
        assert_eq!(&line[..length], "año");
        let next = length + '¦'.len_utf8();
        assert_eq!(&line[next..next + scan_field(line, next, '¦')], "mañana");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_field("plain"), "plain");
        assert_eq!(normalize_field("\"quoted\""), "quoted");
        assert_eq!(normalize_field("\"\""), "");
        assert_eq!(normalize_field("\"b\"\"c\""), "b\"c");
        assert_eq!(normalize_field("\"\"\"\"\"\""), "\"\"");
        assert_eq!(normalize_field("\""), "\"");
        assert_eq!(normalize_field("ab\"\"c"), "ab\"c");
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a,b,,d", ','), vec!["a", "b", "", "d"]);
        assert_eq!(split_fields("a,b,", ','), vec!["a", "b", ""]);
        assert_eq!(split_fields("", ','), vec![""]);
        assert_eq!(
            split_fields("1;\"x;y\";3", ';'),
            vec!["1", "\"x;y\"", "3"]
        );
    }

    #[test]
    fn test_count_quotes() {
        assert_eq!(count_quotes("a,\"b"), 1);
        assert_eq!(count_quotes("\"\"\""), 3);
        assert_eq!(count_quotes("none"), 0);
    }
}
