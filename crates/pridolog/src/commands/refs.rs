use super::{format_location, open_navigator, to_json};
use pridolog_core::{Location, Workspace};
use std::path::Path;

fn render(workspace: &Workspace, gid: &str, locations: &[Location]) -> String {
    if locations.is_empty() {
        return format!("No entries for gid {}", gid);
    }
    let mut out = format!("{} entries for gid {}\n", locations.len(), gid);
    for location in locations {
        out.push_str(&format!("  {}\n", format_location(workspace, location)));
    }
    out
}

pub fn run(root: &Path, gid: &str, json: bool) -> anyhow::Result<()> {
    let nav = open_navigator(root)?;
    let locations = nav.find_all_entries_for_gid(gid);

    if json {
        println!("{}", to_json(&locations)?);
    } else {
        print!("{}", render(nav.store(), gid, &locations));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{sample_workspace, GID};

    #[test]
    fn test_render_refs() {
        let temp = sample_workspace();
        let nav = open_navigator(temp.path()).unwrap();
        let locations = nav.find_all_entries_for_gid(GID);

        let out = render(nav.store(), GID, &locations);
        assert!(out.starts_with("5 entries"));
        assert!(out.contains("ContentConversionService.log:1"));
        assert!(out.contains("OfficeConversionService.log:1"));
    }

    #[test]
    fn test_render_no_refs() {
        let temp = sample_workspace();
        let nav = open_navigator(temp.path()).unwrap();
        assert_eq!(render(nav.store(), "x", &[]), "No entries for gid x");
    }
}
