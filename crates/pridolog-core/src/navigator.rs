//! Correlation engine: navigation between causally related log entries across service logs

use crate::cache::{DocumentData, DocumentsCache};
use crate::documents::DocumentStore;
use crate::error::NavigatorError;
use crate::services::{effective_request_path, same_request, Matcher, ServiceDescriptor, ServiceTable};
use crate::types::{Location, OperationDuration, TaskPair};
use pridolog_log::{entry_time, flag, parse_text_log, split_lines, str_field, task_key, LogLine};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct CodeNavigator<S: DocumentStore> {
    store: S,
    cache: Arc<DocumentsCache>,
    services: ServiceTable,
}

impl<S: DocumentStore> CodeNavigator<S> {
    /// Navigator over `store` using the built-in service table
    pub fn new(store: S, cache: Arc<DocumentsCache>) -> Self {
        Self {
            store,
            cache,
            services: ServiceTable::builtin().clone(),
        }
    }

    pub fn with_services(mut self, services: ServiceTable) -> Self {
        self.services = services;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn cache(&self) -> &Arc<DocumentsCache> {
        &self.cache
    }

    pub fn services(&self) -> &ServiceTable {
        &self.services
    }

    /// Parsed lines of a document, parsing and caching them on first use.
    ///
    /// Unreadable documents have no lines and are not cached.
    pub fn get_lines(&self, uri: &str) -> Arc<[LogLine]> {
        if let Some(lines) = self.cache.get(uri).and_then(|c| c.lines) {
            return lines;
        }

        let text = match self.store.get_text(uri) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                debug!(uri, "Log document not found");
                return Arc::from(Vec::new());
            }
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", uri, e);
                return Arc::from(Vec::new());
            }
        };

        let lines: Arc<[LogLine]> = parse_text_log(&text).into();
        debug!(uri, lines = lines.len(), "Parsed log document");
        self.cache
            .set(uri, DocumentData::default().with_lines(lines.clone()));
        lines
    }

    /// Every line, in every known document, logged under `gid`
    pub fn find_all_entries_for_gid(&self, gid: &str) -> Vec<Location> {
        let mut locations = Vec::new();
        for uri in self.documents() {
            let lines = self.get_lines(&uri);
            locations.extend(
                lines
                    .iter()
                    .filter(|l| str_field(&l.log_item, "gid") == Some(gid))
                    .map(|l| Location::of_line(&uri, l)),
            );
        }
        locations
    }

    /// The counterpart of a request entry in another service's log.
    ///
    /// For a `reqBegin` entry this is where the request was accepted; for a `reqAccepted` entry
    /// with a `parent`, it is where the request was sent.
    pub fn get_definition(&self, entry: &Value) -> Option<Location> {
        if flag(entry, "reqBegin") {
            self.find_request_acceptance(entry)
        } else if flag(entry, "reqAccepted") && entry.get("parent").is_some() {
            self.find_request_sender(entry)
        } else {
            None
        }
    }

    /// Earliest acceptance at or after the request was sent, in the service owning its path
    fn find_request_acceptance(&self, entry: &Value) -> Option<Location> {
        let gid = entry.get("gid")?;
        let sent_at = entry_time(entry)?;
        let path = effective_request_path(entry)?;
        let Some(service) = self.services.find_by_request_path(&path) else {
            debug!(path = %path, "No service owns request path");
            return None;
        };

        self.log_files_of(service).into_iter().find_map(|uri| {
            let lines = self.get_lines(&uri);
            lines
                .iter()
                .filter(|l| l.log_item.get("gid") == Some(gid) && flag(&l.log_item, "reqAccepted"))
                .filter_map(|l| entry_time(&l.log_item).map(|t| (t, l)))
                .filter(|(t, _)| *t >= sent_at)
                .min_by_key(|(t, _)| *t)
                .map(|(_, l)| Location::of_line(&uri, l))
        })
    }

    /// Latest matching send at or before the request was accepted, in the parent's log
    fn find_request_sender(&self, entry: &Value) -> Option<Location> {
        let gid = entry.get("gid")?;
        let accepted_at = entry_time(entry)?;
        let parent_name = entry.get("parent").and_then(|p| str_field(p, "name"))?;
        let Some(service) = self.services.find_by_name(parent_name) else {
            debug!(parent_name, "Unknown parent service");
            return None;
        };

        self.log_files_of(service).into_iter().find_map(|uri| {
            let lines = self.get_lines(&uri);
            lines
                .iter()
                .filter(|l| l.log_item.get("gid") == Some(gid) && flag(&l.log_item, "reqBegin"))
                .filter(|l| same_request(&l.log_item, entry))
                .filter_map(|l| entry_time(&l.log_item).map(|t| (t, l)))
                .filter(|(t, _)| *t <= accepted_at)
                // max_by_key keeps the last of equal maxima, i.e. the later line in the file
                .max_by_key(|(t, _)| *t)
                .map(|(_, l)| Location::of_line(&uri, l))
        })
    }

    /// Begin/end task pairs of a document in first-opened order, unterminated tasks included
    pub fn get_tasks_from_the_log_file(&self, uri: &str) -> Arc<[TaskPair]> {
        if let Some(tasks) = self.cache.get(uri).and_then(|c| c.tasks) {
            return tasks;
        }

        let lines = self.get_lines(uri);
        let mut tasks: Vec<TaskPair> = Vec::new();
        let mut open: HashMap<String, usize> = HashMap::new();

        for line in lines.iter() {
            let key = task_key(&line.log_item);
            if flag(&line.log_item, "taskBegin") {
                open.insert(key, tasks.len());
                tasks.push(TaskPair {
                    task_begin: line.clone(),
                    task_end: None,
                });
            } else if flag(&line.log_item, "taskEnd") {
                if let Some(&index) = open.get(&key) {
                    tasks[index].task_end = Some(line.clone());
                }
            }
        }

        let tasks: Arc<[TaskPair]> = tasks.into();
        self.cache
            .set(uri, DocumentData::default().with_tasks(tasks.clone()));
        tasks
    }

    /// Gaps between consecutive lines of the same task that exceed `min_duration_ms`.
    ///
    /// A cached result is returned as is whatever the threshold; drop
    /// [`crate::CachedProperty::LongOperations`] when it changes.
    pub fn get_operations_longer_than(
        &self,
        uri: &str,
        min_duration_ms: u64,
    ) -> Arc<[OperationDuration]> {
        if let Some(ops) = self.cache.get(uri).and_then(|c| c.long_operations) {
            return ops;
        }

        let lines = self.get_lines(uri);
        let mut operations = Vec::new();
        let mut last_seen: HashMap<String, &LogLine> = HashMap::new();

        for line in lines.iter() {
            if let Some(previous) = last_seen.insert(task_key(&line.log_item), line) {
                let gap = entry_time(&previous.log_item)
                    .zip(entry_time(&line.log_item))
                    .map(|(from, to)| (to - from).num_milliseconds());
                if let Some(duration_ms) = gap.and_then(|ms| u64::try_from(ms).ok()) {
                    if duration_ms > min_duration_ms {
                        operations.push(OperationDuration {
                            log_line: previous.clone(),
                            duration_ms,
                        });
                    }
                }
            }
        }

        let operations: Arc<[OperationDuration]> = operations.into();
        self.cache.set(
            uri,
            DocumentData::default().with_long_operations(operations.clone()),
        );
        operations
    }

    /// Parse the entry on one line of a document, as under an editor cursor
    pub fn log_entry_at(&self, uri: &str, line: usize) -> Result<Value, NavigatorError> {
        let text = self.store.get_text(uri)?;
        let source = split_lines(&text)
            .get(line)
            .copied()
            .ok_or_else(|| NavigatorError::LineOutOfRange {
                uri: uri.to_string(),
                line,
            })?;
        serde_json::from_str(source).map_err(|source| NavigatorError::NotJson {
            uri: uri.to_string(),
            line,
            source,
        })
    }

    fn documents(&self) -> Vec<String> {
        self.store.list_documents().unwrap_or_else(|e| {
            tracing::warn!("Cannot list log documents: {}", e);
            Vec::new()
        })
    }

    /// Concrete documents a service logs to. Patterns are matched against file names.
    fn log_files_of(&self, service: &ServiceDescriptor) -> Vec<String> {
        match &service.log_file {
            Matcher::Literal(file) => vec![self.store.resolve_relative_path(file)],
            Matcher::Pattern(re) => self
                .documents()
                .into_iter()
                .filter(|uri| re.is_match(file_name(uri)))
                .collect(),
        }
    }
}

fn file_name(uri: &str) -> &str {
    uri.rsplit(['/', '\\']).next().unwrap_or(uri)
}
