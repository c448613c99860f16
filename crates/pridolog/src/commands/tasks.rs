use super::{display_uri, document_uri, open_navigator, to_json};
use pridolog_core::TaskPair;
use pridolog_log::{duration_format, value_to_key};
use std::path::Path;

fn task_label(task: &TaskPair) -> String {
    let item = &task.task_begin.log_item;
    let taskid = item.get("taskid").and_then(value_to_key).unwrap_or_default();
    let gid = item.get("gid").and_then(value_to_key).unwrap_or_default();
    format!("Task {} ({})", taskid, gid)
}

fn render(file: &str, tasks: &[TaskPair]) -> String {
    if tasks.is_empty() {
        return format!("No tasks in {}", file);
    }

    let mut out = format!("Tasks in {}\n", file);
    for task in tasks {
        let begin = task.task_begin.line + 1;
        let line = match (&task.task_end, task.duration_ms()) {
            (Some(end), Some(ms)) if ms >= 0 => format!(
                "  {}-{}  {} completed in {}",
                begin,
                end.line + 1,
                task_label(task),
                duration_format(ms as u64)
            ),
            (Some(end), _) => format!("  {}-{}  {} completed", begin, end.line + 1, task_label(task)),
            (None, _) => format!("  {}  {} not completed", begin, task_label(task)),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let nav = open_navigator(root)?;
    let uri = document_uri(nav.store(), file);
    let tasks = nav.get_tasks_from_the_log_file(&uri);

    if json {
        println!("{}", to_json(&*tasks)?);
    } else {
        print!("{}", render(&display_uri(nav.store(), &uri), &tasks));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::sample_workspace;

    #[test]
    fn test_render_tasks() {
        let temp = sample_workspace();
        let nav = open_navigator(temp.path()).unwrap();
        let uri = document_uri(nav.store(), &temp.path().join("ContentConversionService.log"));
        let tasks = nav.get_tasks_from_the_log_file(&uri);

        let out = render("ContentConversionService.log", &tasks);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "  1-3  Task 1 (kjPhKGtz2zaCeReGf1Dkqg) completed in 2 seconds 13 ms"
        );
        assert_eq!(lines[2], "  4  Task 2 (kjPhKGtz2zaCeReGf1Dkqg) not completed");
    }

    #[test]
    fn test_render_no_tasks() {
        assert_eq!(render("a.log", &[]), "No tasks in a.log");
    }
}
