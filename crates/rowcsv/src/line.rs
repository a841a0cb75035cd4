//! Logical line assembly
//!
//! A CSV record may span several physical lines when a quoted field contains
//! raw line breaks. [`LineAssembler`] reads physical lines and glues them back
//! together while the running count of quote characters is odd.

use std::io::{self, BufRead};

use crate::scanner::count_quotes;

const BOM: char = '\u{feff}';

/// Reads logical CSV lines from a buffered text source
#[derive(Debug)]
pub struct LineAssembler<R> {
    source: R,
    buffer: Vec<u8>,
    at_start: bool,
    physical_lines: u64,
}

impl<R: BufRead> LineAssembler<R> {
    /// Wrap a buffered source
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            at_start: true,
            physical_lines: 0,
        }
    }

    /// Number of physical lines consumed so far
    pub fn physical_lines(&self) -> u64 {
        self.physical_lines
    }

    /// Read the next logical line, `None` once the source is exhausted
    ///
    /// Empty physical lines before a record are skipped. The terminator that
    /// ended a physical line inside a quoted field is kept in the result.
    pub fn next_logical_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let mut quotes = 0usize;
        let mut started = false;

        while let Some((part, terminator)) = self.read_physical_line()? {
            if !started {
                if part.is_empty() {
                    continue;
                }
                started = true;
            }

            quotes += count_quotes(&part);
            line.push_str(&part);

            if quotes % 2 == 0 {
                return Ok(Some(line));
            }

            if let Some(terminator) = terminator {
                line.push_str(terminator);
            }
        }

        if started {
            tracing::trace!(
                physical_line = self.physical_lines,
                "unterminated quoted field at end of input"
            );
            Ok(Some(line))
        } else {
            Ok(None)
        }
    }

    /// Read one physical line without its terminator (`\n`, `\r\n` or `\r`)
    fn read_physical_line(&mut self) -> io::Result<Option<(String, Option<&'static str>)>> {
        self.buffer.clear();
        let mut terminator = None;

        loop {
            let available = match self.source.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if available.is_empty() {
                break;
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    let byte = available[pos];
                    self.buffer.extend_from_slice(&available[..pos]);
                    self.source.consume(pos + 1);
                    terminator = Some(if byte == b'\n' {
                        "\n"
                    } else if self.skip_line_feed()? {
                        "\r\n"
                    } else {
                        "\r"
                    });
                    break;
                }
                None => {
                    let len = available.len();
                    self.buffer.extend_from_slice(available);
                    self.source.consume(len);
                }
            }
        }

        if terminator.is_none() && self.buffer.is_empty() {
            return Ok(None);
        }

        self.physical_lines += 1;

        let text = std::str::from_utf8(&self.buffer).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {} is not valid UTF-8: {e}", self.physical_lines),
            )
        })?;

        let text = if self.at_start {
            self.at_start = false;
            text.strip_prefix(BOM).unwrap_or(text)
        } else {
            text
        };

        Ok(Some((text.to_string(), terminator)))
    }

    /// Consume a `\n` directly following a `\r`
    fn skip_line_feed(&mut self) -> io::Result<bool> {
        loop {
            match self.source.fill_buf() {
                Ok(available) => {
                    let line_feed = available.first() == Some(&b'\n');
                    if line_feed {
                        self.source.consume(1);
                    }
                    return Ok(line_feed);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
