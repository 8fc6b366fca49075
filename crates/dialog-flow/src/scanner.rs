//! Log entry scanner
//!
//! Splits the raw facilitator log into open-tag/body/close-tag entries. The
//! scanner is a lazy iterator over a `BufRead` source: it reads the source
//! exactly once and cannot be restarted. Lines are decoded lossily, so bytes
//! that are not UTF-8 become U+FFFD instead of failing the scan.
//!
//! ```text
//! <R T="10:02:33.27" S="PARSER">
//! (TELL :RECEIVER IM :CONTENT (...))
//! </R>
//! ```

use crate::error::{FlowError, FlowResult};
use dialog_types::{Entry, LogConfig, Relation};
use regex::Regex;
use serde::Serialize;
use std::io::BufRead;
use std::str::FromStr;
use tracing::debug;

/// Counters for lines and entries the scanner dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Entries handed to the caller
    pub entries: usize,
    /// `<LOG`/`<EXIT` markers and blank lines
    pub skipped_lines: usize,
    /// Lines outside any entry that are not an open tag
    pub stray_lines: usize,
    /// Entries whose kind is the configured error kind
    pub error_entries: usize,
    /// Entries whose body is an apology/refusal
    pub rejected_entries: usize,
}

/// Lazy entry iterator over a line-oriented log.
pub struct LogEntryScanner<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    finished: bool,
    error_kind: String,
    skip_re: Regex,
    open_re: Regex,
    close_re: Regex,
    reject_re: Regex,
    stats: ScanStats,
}

impl<R: BufRead> LogEntryScanner<R> {
    pub fn new(reader: R, config: &LogConfig) -> FlowResult<Self> {
        Ok(Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            finished: false,
            error_kind: config.error_kind.clone(),
            skip_re: Regex::new(r"^(<(LOG|EXIT) |$)")?,
            open_re: Regex::new(r#"^<(\w+) T="([^"]+)" ([RS])="([^"]+)">$"#)?,
            close_re: Regex::new(r"^</\w+>$")?,
            reject_re: Regex::new(r"^\(SORRY ")?,
            stats: ScanStats::default(),
        })
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    fn next_line(&mut self) -> FlowResult<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    fn next_entry(&mut self) -> FlowResult<Option<Entry>> {
        loop {
            let Some(line) = self.next_line()? else {
                return Ok(None);
            };

            if self.skip_re.is_match(&line) {
                self.stats.skipped_lines += 1;
                continue;
            }

            let Some(caps) = self.open_re.captures(&line) else {
                debug!(
                    "[LogEntryScanner] Skipping stray line {}: {}",
                    self.line_no, line
                );
                self.stats.stray_lines += 1;
                continue;
            };

            let open_line = self.line_no;
            let kind = caps[1].to_string();
            let timestamp = caps[2].to_string();
            let relation = Relation::from_str(&caps[3])
                .map_err(|_| FlowError::malformed(open_line, "relation must be R or S"))?;
            let other = caps[4].to_string();

            let mut body_lines = Vec::new();
            loop {
                match self.next_line()? {
                    Some(body_line) if self.close_re.is_match(&body_line) => break,
                    Some(body_line) => body_lines.push(body_line),
                    None => {
                        return Err(FlowError::malformed(
                            open_line,
                            format!("<{kind}> entry is never closed before end of log"),
                        ))
                    }
                }
            }
            let body = body_lines.join("\n");

            if kind == self.error_kind {
                self.stats.error_entries += 1;
                continue;
            }
            if self.reject_re.is_match(&body) {
                self.stats.rejected_entries += 1;
                continue;
            }

            self.stats.entries += 1;
            return Ok(Some(Entry {
                kind,
                timestamp,
                relation,
                other,
                body,
                line: open_line,
            }));
        }
    }
}

impl<R: BufRead> Iterator for LogEntryScanner<R> {
    type Item = FlowResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
