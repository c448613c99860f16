//! Error and warning detection over raw log text
//!
//! Unlike [`crate::parse_text_log`], every non-blank line that fails to parse is surfaced as a problem.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::{split_lines, Range};

pub const PROBLEM_SOURCE: &str = "pridolog";

/// Editors show about 250 problems; a few more signals that the list was truncated
pub const MAX_PROBLEMS_COUNT: usize = 255;

const ERROR_LEVEL: i64 = 50;
const WARNING_LEVEL: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Information,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub severity: Severity,
    pub range: Range,
    pub message: String,
    pub source: String,
}

impl Problem {
    fn new(severity: Severity, line: usize, text: &str, message: String) -> Self {
        Self {
            severity,
            range: Range::full_line(line, text),
            message,
            source: PROBLEM_SOURCE.to_string(),
        }
    }
}

/// Find error-level and warning-level entries plus unparsable lines
pub fn find_log_problems(text: &str) -> Vec<Problem> {
    let mut problems = Vec::new();

    for (i, line) in split_lines(text).into_iter().enumerate() {
        if problems.len() >= MAX_PROBLEMS_COUNT {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(entry) => {
                let level = entry.get("level").and_then(Value::as_f64);
                let severity = match level {
                    Some(l) if l >= ERROR_LEVEL as f64 => Severity::Error,
                    Some(l) if l >= WARNING_LEVEL as f64 => Severity::Warning,
                    _ => continue,
                };
                problems.push(Problem::new(severity, i, line, problem_message(&entry)));
            }
            Err(e) => problems.push(Problem::new(
                Severity::Information,
                i,
                line,
                format!("Can not parse: {}", e),
            )),
        }
    }

    problems
}

/// Human summary of a problem entry: `msg`, `err.message` and `data.error.message`
pub fn problem_message(entry: &Value) -> String {
    let parts: Vec<&str> = ["/msg", "/err/message", "/data/error/message"]
        .iter()
        .filter_map(|pointer| entry.pointer(pointer).and_then(Value::as_str))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        entry.to_string()
    } else {
        parts.join("; ")
    }
}
