pub mod definition;
pub mod problems;
pub mod refs;
pub mod services;
pub mod slow;
pub mod tasks;

use anyhow::Context;
use pridolog_core::{CodeNavigator, DocumentsCache, Location, Settings, Workspace};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub fn open_navigator(root: &Path) -> anyhow::Result<CodeNavigator<Workspace>> {
    let workspace = Workspace::new(root)
        .with_context(|| format!("cannot open workspace {}", root.display()))?;
    Ok(CodeNavigator::new(workspace, Arc::new(DocumentsCache::new())))
}

/// URI for a file given on the command line: relative to the current directory if it exists
/// there, otherwise relative to the workspace root
pub fn document_uri(workspace: &Workspace, file: &Path) -> String {
    match std::fs::canonicalize(file) {
        Ok(path) => workspace.uri_for_path(&path),
        Err(_) => workspace.uri_for_path(file),
    }
}

/// Workspace-relative form of a URI for display
pub fn display_uri(workspace: &Workspace, uri: &str) -> String {
    let root_uri = workspace.uri_for_path(workspace.root());
    match uri.strip_prefix(root_uri.as_str()) {
        Some(rest) => rest.trim_start_matches('/').to_string(),
        None => uri.to_string(),
    }
}

/// `file:line` with a 1-based line number
pub fn format_location(workspace: &Workspace, location: &Location) -> String {
    format!(
        "{}:{}",
        display_uri(workspace, &location.uri),
        location.range.start.line + 1
    )
}

pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match Settings::default_path() {
            Some(path) => path,
            None => return Ok(Settings::default()),
        },
    };
    tracing::debug!(path = %path.display(), "Loading settings");
    Ok(Settings::load(&path)?)
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
