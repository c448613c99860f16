//! Line splitting and tolerant JSON-per-line parsing

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One successfully parsed line of a log document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    /// Zero-based line number in the source document
    pub line: usize,
    /// Raw line text, without the line terminator
    pub source: String,
    /// Parsed JSON record
    pub log_item: Value,
}

impl LogLine {
    /// Range covering the whole source line
    pub fn range(&self) -> Range {
        Range::full_line(self.line, &self.source)
    }
}

/// A line that could not be parsed as JSON
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {error}")]
pub struct ParsingError {
    pub line: usize,
    #[source]
    pub error: serde_json::Error,
}

/// Zero-based line/character position. Characters are UTF-16 code units, as editors count them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn full_line(line: usize, source: &str) -> Self {
        Self {
            start: Position { line, character: 0 },
            end: Position {
                line,
                character: source.encode_utf16().count(),
            },
        }
    }
}

/// Split text on `\r\n` or `\n`. Empty text has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        if let Some(stripped) = line.strip_suffix('\r') {
            *line = stripped;
        }
    }
    lines
}

/// Parse every non-blank line as JSON, silently dropping lines that fail
pub fn parse_text_log(text: &str) -> Vec<LogLine> {
    parse_text_log_with_errors(text, |_| {})
}

/// Parse every non-blank line as JSON, reporting lines that fail to `on_error`.
///
/// Line numbers always refer to the original document, blank and broken lines included.
pub fn parse_text_log_with_errors<F>(text: &str, mut on_error: F) -> Vec<LogLine>
where
    F: FnMut(ParsingError),
{
    let mut log_lines = Vec::new();

    for (index, source) in split_lines(text).into_iter().enumerate() {
        if source.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(source) {
            Ok(log_item) => log_lines.push(LogLine {
                line: index,
                source: source.to_string(),
                log_item,
            }),
            Err(error) => on_error(ParsingError { line: index, error }),
        }
    }

    log_lines
}
