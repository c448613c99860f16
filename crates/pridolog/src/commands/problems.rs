use super::{display_uri, document_uri, open_navigator, to_json};
use pridolog_core::DocumentStore;
use pridolog_log::{find_log_problems, Problem, Severity};
use std::path::Path;

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERR ",
        Severity::Warning => "WARN",
        Severity::Information => "INFO",
    }
}

fn render(file: &str, problems: &[Problem]) -> String {
    if problems.is_empty() {
        return format!("No problems in {}", file);
    }

    let mut out = format!("{} problems in {}\n", problems.len(), file);
    for problem in problems {
        out.push_str(&format!(
            "  {} {}:{} {}\n",
            severity_label(problem.severity),
            file,
            problem.range.start.line + 1,
            problem.message
        ));
    }
    out
}

pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let nav = open_navigator(root)?;
    let uri = document_uri(nav.store(), file);
    let text = nav.store().get_text(&uri)?;
    let problems = find_log_problems(&text);

    if json {
        println!("{}", to_json(&problems)?);
    } else {
        print!("{}", render(&display_uri(nav.store(), &uri), &problems));
    }
    Ok(())
}
