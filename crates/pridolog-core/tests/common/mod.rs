#![allow(dead_code)]

use pridolog_core::{CodeNavigator, DocumentsCache, MemoryDocuments};
use serde_json::{json, Value};
use std::sync::Arc;

pub const GID: &str = "kjPhKGtz2zaCeReGf1Dkqg";

pub fn jsonl(entries: &[Value]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn at(ms: u32) -> String {
    format!("2018-01-10T12:00:{:02}.{:03}Z", ms / 1000, ms % 1000)
}

fn parent_ccs() -> Value {
    json!({"name": "ContentConversionService", "pid": 4120, "taskid": 1})
}

/// Content conversion calling office conversion twice within one session
pub fn ccs_log() -> String {
    jsonl(&[
        json!({"gid": GID, "name": "ContentConversionService", "taskid": 1, "time": at(0), "taskBegin": true, "msg": "Conversion started"}),
        json!({"gid": GID, "name": "ContentConversionService", "taskid": 1, "time": at(10), "reqBegin": true, "req": {"method": "POST", "path": "/OCS/convert"}}),
        json!({"gid": GID, "name": "ContentConversionService", "taskid": 1, "time": at(500), "reqBegin": true, "req": {"method": "POST", "path": "/OCS/convert"}}),
        json!({"gid": GID, "name": "ContentConversionService", "taskid": 1, "time": at(1000), "taskEnd": true}),
    ])
}

pub fn ocs_log() -> String {
    jsonl(&[
        json!({"gid": "otherSession", "name": "OfficeConversionService", "taskid": 3, "time": at(15), "reqAccepted": true, "req": {"method": "POST", "path": "/OCS/convert"}, "parent": parent_ccs()}),
        json!({"gid": GID, "name": "OfficeConversionService", "taskid": 7, "time": at(2), "reqAccepted": true, "req": {"method": "POST", "path": "/OCS/convert"}, "parent": parent_ccs()}),
        json!({"gid": GID, "name": "OfficeConversionService", "taskid": 8, "time": at(20), "reqAccepted": true, "req": {"method": "POST", "path": "/OCS/convert?trace=1"}, "parent": parent_ccs()}),
        json!({"gid": GID, "name": "OfficeConversionService", "taskid": 9, "time": at(510), "reqAccepted": true, "req": {"method": "POST", "path": "/OCS/convert"}, "parent": parent_ccs()}),
    ])
}

pub fn email_session() -> MemoryDocuments {
    MemoryDocuments::new()
        .with("ContentConversionService.log", &ccs_log())
        .with("OfficeConversionService.log", &ocs_log())
        .with("another.log", "{gid:\"another\"}")
}

pub fn navigator(docs: MemoryDocuments) -> CodeNavigator<MemoryDocuments> {
    CodeNavigator::new(docs, Arc::new(DocumentsCache::new()))
}

/// Parsed entry on `line` of `text`
pub fn entry(text: &str, line: usize) -> Value {
    serde_json::from_str(text.lines().nth(line).unwrap()).unwrap()
}
