use super::{display_uri, document_uri, open_navigator, to_json};
use pridolog_core::{OperationDuration, Settings};
use pridolog_log::duration_format;
use std::path::Path;

fn render(file: &str, min_ms: u64, operations: &[OperationDuration]) -> String {
    if operations.is_empty() {
        return format!("No operations longer than {} ms in {}", min_ms, file);
    }

    let mut out = format!("Operations longer than {} ms in {}\n", min_ms, file);
    for op in operations {
        out.push_str(&format!(
            "  {}  {}\n",
            op.log_line.line + 1,
            duration_format(op.duration_ms)
        ));
    }
    out
}

pub fn run(
    root: &Path,
    file: &Path,
    min_ms: Option<u64>,
    settings: &Settings,
    json: bool,
) -> anyhow::Result<()> {
    let min_ms = min_ms.unwrap_or(settings.pridolog.show_long_operations.duration_in_ms);
    let nav = open_navigator(root)?;
    let uri = document_uri(nav.store(), file);
    let operations = nav.get_operations_longer_than(&uri, min_ms);

    if json {
        println!("{}", to_json(&*operations)?);
    } else {
        print!("{}", render(&display_uri(nav.store(), &uri), min_ms, &operations));
    }
    Ok(())
}
