//! Per-document cache of derived results

use crate::types::{OperationDuration, TaskPair};
use pridolog_log::LogLine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Derived results that can be cached for a document. Absent fields have not been computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentData {
    pub lines: Option<Arc<[LogLine]>>,
    pub tasks: Option<Arc<[TaskPair]>>,
    pub long_operations: Option<Arc<[OperationDuration]>>,
}

impl DocumentData {
    pub fn with_lines(mut self, lines: impl Into<Arc<[LogLine]>>) -> Self {
        self.lines = Some(lines.into());
        self
    }

    pub fn with_tasks(mut self, tasks: impl Into<Arc<[TaskPair]>>) -> Self {
        self.tasks = Some(tasks.into());
        self
    }

    pub fn with_long_operations(mut self, ops: impl Into<Arc<[OperationDuration]>>) -> Self {
        self.long_operations = Some(ops.into());
        self
    }
}

/// Cached results for one document.
///
/// Copies handed out by [`DocumentsCache::get`] share the cached slices but not the field slots,
/// so replacing a field on a copy never reaches the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContainer {
    pub uri: String,
    pub lines: Option<Arc<[LogLine]>>,
    pub tasks: Option<Arc<[TaskPair]>>,
    pub long_operations: Option<Arc<[OperationDuration]>>,
}

impl DocumentContainer {
    fn empty(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            lines: None,
            tasks: None,
            long_operations: None,
        }
    }

    fn merge(&mut self, data: DocumentData) {
        if let Some(lines) = data.lines {
            self.lines = Some(lines);
        }
        if let Some(tasks) = data.tasks {
            self.tasks = Some(tasks);
        }
        if let Some(ops) = data.long_operations {
            self.long_operations = Some(ops);
        }
    }

    fn clear(&mut self, property: CachedProperty) {
        match property {
            CachedProperty::Lines => self.lines = None,
            CachedProperty::Tasks => self.tasks = None,
            CachedProperty::LongOperations => self.long_operations = None,
        }
    }
}

/// Field of [`DocumentContainer`] that can be invalidated across all documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedProperty {
    Lines,
    Tasks,
    LongOperations,
}

/// Document URI -> cached results. Every operation holds the lock for its whole read-modify-write.
#[derive(Debug, Default)]
pub struct DocumentsCache {
    map: Mutex<HashMap<String, DocumentContainer>>,
}

impl DocumentsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the present fields of `data` into the container for `uri`, creating it if needed
    pub fn set(&self, uri: &str, data: DocumentData) {
        self.map()
            .entry(uri.to_string())
            .or_insert_with(|| DocumentContainer::empty(uri))
            .merge(data);
    }

    /// Shallow copy of the container for `uri`
    pub fn get(&self, uri: &str) -> Option<DocumentContainer> {
        self.map().get(uri).cloned()
    }

    /// Forget everything cached for `uri`
    pub fn drop_uri(&self, uri: &str) {
        self.map().remove(uri);
    }

    /// Forget one field for every cached document
    pub fn drop_property(&self, property: CachedProperty) {
        for container in self.map().values_mut() {
            container.clear(property);
        }
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, DocumentContainer>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_line(line: usize, source: &str, item: serde_json::Value) -> LogLine {
        LogLine {
            line,
            source: source.to_string(),
            log_item: item,
        }
    }

    #[test]
    fn test_set_creates_container() {
        let cache = DocumentsCache::new();
        let lines = vec![log_line(0, "log source", json!({"foo": 1}))];
        cache.set("test_uri", DocumentData::default().with_lines(lines.clone()));

        let container = cache.get("test_uri").unwrap();
        assert_eq!(container.uri, "test_uri");
        assert_eq!(container.lines.as_deref(), Some(lines.as_slice()));
        assert!(container.tasks.is_none());
        assert!(container.long_operations.is_none());
    }

    #[test]
    fn test_set_replaces_specified_fields() {
        let cache = DocumentsCache::new();
        cache.set(
            "test_uri",
            DocumentData::default().with_lines(vec![log_line(0, "log source", json!({"foo": 1}))]),
        );

        let new_lines = vec![
            log_line(1, "first line", json!({"bar": 1})),
            log_line(2, "second line", json!({"bar": 2})),
        ];
        cache.set("test_uri", DocumentData::default().with_lines(new_lines.clone()));

        let container = cache.get("test_uri").unwrap();
        assert_eq!(container.lines.as_deref(), Some(new_lines.as_slice()));
    }

    #[test]
    fn test_set_keeps_unspecified_fields() {
        let cache = DocumentsCache::new();
        let lines = vec![log_line(0, "log source", json!({"foo": 1}))];
        cache.set("test_uri", DocumentData::default().with_lines(lines.clone()));

        let tasks = vec![TaskPair {
            task_begin: log_line(2, "task begin", json!({"taskBegin": true})),
            task_end: Some(log_line(5, "task end", json!({"taskEnd": true}))),
        }];
        cache.set("test_uri", DocumentData::default().with_tasks(tasks.clone()));

        let container = cache.get("test_uri").unwrap();
        assert_eq!(container.lines.as_deref(), Some(lines.as_slice()));
        assert_eq!(container.tasks.as_deref(), Some(tasks.as_slice()));
    }

    #[test]
    fn test_get_unknown_uri() {
        let cache = DocumentsCache::new();
        assert!(cache.get("no_such_uri").is_none());
    }

    #[test]
    fn test_get_returns_shallow_copy() {
        let cache = DocumentsCache::new();
        cache.set(
            "test_uri",
            DocumentData::default().with_lines(vec![log_line(0, "log source", json!({"foo": 1}))]),
        );

        let mut copy1 = cache.get("test_uri").unwrap();
        let copy2 = cache.get("test_uri").unwrap();

        copy1.long_operations = Some(Arc::from(Vec::<OperationDuration>::new()));
        assert_ne!(copy1, copy2);
        assert!(cache.get("test_uri").unwrap().long_operations.is_none());

        // Slices are shared, not duplicated
        assert!(Arc::ptr_eq(
            copy1.lines.as_ref().unwrap(),
            copy2.lines.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_drop_uri() {
        let cache = DocumentsCache::new();
        cache.set(
            "test_uri",
            DocumentData::default().with_lines(vec![log_line(0, "log source", json!({"foo": 1}))]),
        );
        cache.drop_uri("test_uri");
        assert!(cache.get("test_uri").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_drop_property_for_every_document() {
        let cache = DocumentsCache::new();
        let line1 = log_line(0, "log uri_1 source", json!({"foo": 1}));
        let line2 = log_line(1, "log uri_2 source", json!({"bar": 2}));

        cache.set(
            "test_uri_1",
            DocumentData::default()
                .with_lines(vec![line1.clone()])
                .with_long_operations(vec![OperationDuration {
                    log_line: line1.clone(),
                    duration_ms: 123,
                }]),
        );
        cache.set(
            "test_uri_2",
            DocumentData::default()
                .with_lines(vec![line2.clone()])
                .with_long_operations(vec![OperationDuration {
                    log_line: line2.clone(),
                    duration_ms: 456,
                }]),
        );

        cache.drop_property(CachedProperty::LongOperations);

        let c1 = cache.get("test_uri_1").unwrap();
        let c2 = cache.get("test_uri_2").unwrap();
        assert!(c1.long_operations.is_none());
        assert!(c2.long_operations.is_none());
        assert_eq!(c1.lines.as_deref(), Some(vec![line1].as_slice()));
        assert_eq!(c2.lines.as_deref(), Some(vec![line2].as_slice()));
    }
}
