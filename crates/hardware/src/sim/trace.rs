//! Trace parsing.
//!
//! A trace is a text file with one event per line:
//!
//! ```text
//! # comment
//! 0 0x10019d94    load
//! 1 10019d94      store (the 0x prefix is optional)
//! 9               report request, no address needed
//! ```
//!
//! The first token is the operation code, the second the hexadecimal
//! address, and anything after is ignored. Blank lines, comment lines
//! (starting with `#`, `/`, `*` or `=`), lines that do not parse and
//! unknown operation codes are skipped rather than treated as errors.

use std::fmt;
use std::io::{self, BufRead};

use serde::Serialize;
use tracing::trace;

/// Operation codes understood by the trace driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Operation {
    /// `0`: data load.
    Read,
    /// `1`: data store.
    Write,
    /// `2`: instruction fetch.
    Fetch,
    /// `3`: eviction command from L2 (back-invalidation).
    EvictFromBackingStore,
    /// `8`: clear both caches and their statistics.
    Reset,
    /// `9`: emit a report of contents and statistics.
    ReportRequest,
}

impl Operation {
    /// Maps a numeric operation code.
    ///
    /// # Returns
    ///
    /// `None` for codes outside `{0, 1, 2, 3, 8, 9}`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Read),
            1 => Some(Self::Write),
            2 => Some(Self::Fetch),
            3 => Some(Self::EvictFromBackingStore),
            8 => Some(Self::Reset),
            9 => Some(Self::ReportRequest),
            _ => None,
        }
    }

    /// Numeric code of the operation.
    pub fn code(self) -> u32 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
            Self::Fetch => 2,
            Self::EvictFromBackingStore => 3,
            Self::Reset => 8,
            Self::ReportRequest => 9,
        }
    }

    /// Returns `true` if the operation acts on an address.
    pub fn needs_address(self) -> bool {
        !matches!(self, Self::Reset | Self::ReportRequest)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Fetch => "FETCH",
            Self::EvictFromBackingStore => "EVICT",
            Self::Reset => "RESET",
            Self::ReportRequest => "REPORT",
        };
        f.write_str(name)
    }
}

/// A parsed trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// What to do.
    pub op: Operation,
    /// Address operand; 0 for operations that take none.
    pub address: u32,
}

impl TraceEvent {
    /// Creates an event.
    pub fn new(op: Operation, address: u32) -> Self {
        Self { op, address }
    }
}

fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).ok()
}

/// Parses one trace line.
///
/// # Returns
///
/// The event, or `None` if the line is blank, a comment, malformed or
/// carries an unknown operation code.
pub fn parse_line(line: &str) -> Option<TraceEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(['#', '/', '*', '=']) {
        return None;
    }

    let mut tokens = line.split_whitespace();
    let op = tokens
        .next()
        .and_then(|t| t.parse::<u32>().ok())
        .and_then(Operation::from_code)?;

    let address = match tokens.next().and_then(parse_hex) {
        Some(address) => address,
        None if !op.needs_address() => 0,
        None => return None,
    };

    Some(TraceEvent { op, address })
}

/// Iterator over the events of a trace.
///
/// Yields `(line_number, event)` pairs with one-based line numbers. Skipped
/// lines, including lines that are not valid UTF-8, still count toward the
/// numbering and are logged at trace level. Only I/O failures are errors.
#[derive(Debug)]
pub struct TraceReader<R> {
    inner: R,
    line_no: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_no: 0,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = io::Result<(usize, TraceEvent)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let Ok(text) = std::str::from_utf8(&self.buf) else {
                        trace!(line = self.line_no, "skipped non-UTF-8 trace line");
                        continue;
                    };
                    if let Some(event) = parse_line(text) {
                        return Some(Ok((self.line_no, event)));
                    }
                    trace!(line = self.line_no, "skipped trace line {:?}", text.trim_end());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
