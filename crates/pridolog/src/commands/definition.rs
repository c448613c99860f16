use super::{document_uri, format_location, open_navigator, to_json};
use anyhow::bail;
use std::path::Path;

pub fn run(root: &Path, file: &Path, line: usize, json: bool) -> anyhow::Result<()> {
    if line == 0 {
        bail!("line numbers start at 1");
    }
    let nav = open_navigator(root)?;
    let uri = document_uri(nav.store(), file);
    let entry = nav.log_entry_at(&uri, line - 1)?;
    let definition = nav.get_definition(&entry);

    if json {
        println!("{}", to_json(&definition)?);
        return Ok(());
    }
    match definition {
        Some(location) => println!("{}", format_location(nav.store(), &location)),
        None => println!("No definition found"),
    }
    Ok(())
}
