//! Cross-service log correlation: request routing, task pairing and long operation detection

mod cache;
mod config;
mod documents;
mod error;
mod navigator;
mod services;
mod types;

pub use cache::{CachedProperty, DocumentContainer, DocumentData, DocumentsCache};
pub use config::{LongOperationSettings, PridologSettings, Settings, SettingsTracker};
pub use documents::{DocumentStore, MemoryDocuments, Workspace};
pub use error::{DocumentError, NavigatorError, SettingsError};
pub use navigator::CodeNavigator;
pub use services::{
    effective_request_path, request_path, same_request, Matcher, ServiceDescriptor, ServiceTable,
};
pub use types::{Location, OperationDuration, TaskPair};
