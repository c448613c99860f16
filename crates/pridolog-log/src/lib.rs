//! JSON-per-line log parsing, entry field access and log problem detection

mod entry;
mod problems;
mod text;
mod time;

pub use entry::{entry_time, flag, str_field, task_key, value_to_key};
pub use problems::{
    find_log_problems, problem_message, Problem, Severity, MAX_PROBLEMS_COUNT, PROBLEM_SOURCE,
};
pub use text::{
    parse_text_log, parse_text_log_with_errors, split_lines, LogLine, ParsingError, Position, Range,
};
pub use time::{duration_format, parse_time};
