//! Results produced by the navigator

use pridolog_log::{entry_time, LogLine, Range};
use serde::{Deserialize, Serialize};

/// A span inside one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

impl Location {
    /// Location covering the full source text of a log line
    pub fn of_line(uri: &str, line: &LogLine) -> Self {
        Self {
            uri: uri.to_string(),
            range: line.range(),
        }
    }
}

/// One task instance: its begin marker and, once observed, its end marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPair {
    pub task_begin: LogLine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_end: Option<LogLine>,
}

impl TaskPair {
    pub fn is_completed(&self) -> bool {
        self.task_end.is_some()
    }

    /// Time from begin to end, when the task completed and both timestamps parse
    pub fn duration_ms(&self) -> Option<i64> {
        let end = self.task_end.as_ref()?;
        let begin = entry_time(&self.task_begin.log_item)?;
        let end = entry_time(&end.log_item)?;
        Some((end - begin).num_milliseconds())
    }
}

/// Gap between a line and the next line of the same task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDuration {
    /// The earlier line of the pair
    pub log_line: LogLine,
    pub duration_ms: u64,
}
