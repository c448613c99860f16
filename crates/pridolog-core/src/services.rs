//! Service routing table: which log file each service writes and which request paths it owns

use pridolog_log::str_field;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static BUILTIN_SERVICES: OnceLock<ServiceTable> = OnceLock::new();
static URL_RE: OnceLock<Regex> = OnceLock::new();
static INTERNAL_REQUEST_RE: OnceLock<Regex> = OnceLock::new();

/// A literal value or a compiled pattern
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn literal(value: &str) -> Self {
        Matcher::Literal(value.to_string())
    }

    pub fn pattern(re: &str) -> Result<Self, regex::Error> {
        Ok(Matcher::Pattern(Regex::new(re)?))
    }

    /// Literals match as a prefix, patterns by search
    pub fn matches_prefix(&self, text: &str) -> bool {
        match self {
            Matcher::Literal(prefix) => text.starts_with(prefix.as_str()),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Matcher::Literal(value) => value,
            Matcher::Pattern(re) => re.as_str(),
        }
    }
}

/// A service known to the routing table
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Name the service logs itself as (`name`, `parent.name`)
    pub name: String,
    /// Log file name, or a pattern over file names for sharded services
    pub log_file: Matcher,
    /// Request paths owned by this service; `None` for services nobody calls by path
    pub request_path: Option<Matcher>,
}

impl ServiceDescriptor {
    pub fn new(name: &str, log_file: Matcher, request_path: Option<Matcher>) -> Self {
        Self {
            name: name.to_string(),
            log_file,
            request_path,
        }
    }

    pub fn owns_path(&self, path: &str) -> bool {
        self.request_path
            .as_ref()
            .is_some_and(|m| m.matches_prefix(path))
    }
}

/// Ordered, immutable set of service descriptors. Earlier entries win on ambiguous paths.
#[derive(Debug, Clone)]
pub struct ServiceTable {
    services: Vec<ServiceDescriptor>,
}

impl ServiceTable {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self { services }
    }

    /// The table of services shipped with a product installation
    pub fn builtin() -> &'static ServiceTable {
        BUILTIN_SERVICES.get_or_init(build_builtin_table)
    }

    pub fn find_by_request_path(&self, path: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.owns_path(path))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn literal(name: &str, log_file: &str) -> ServiceDescriptor {
    ServiceDescriptor::new(name, Matcher::literal(log_file), None)
}

fn routed(name: &str, log_file: &str, path_re: &str) -> ServiceDescriptor {
    ServiceDescriptor::new(
        name,
        Matcher::literal(log_file),
        Some(Matcher::Pattern(Regex::new(path_re).unwrap())),
    )
}

fn build_builtin_table() -> ServiceTable {
    ServiceTable::new(vec![
        // Must precede the front door, which owns the rest of /PCCIS/
        routed("WorkfileService", "WorkfileService.log", r"^/PCCIS/V1/WorkFile"),
        // Front door, one log per instance folder (Pccis0/, Pccis1/, ...)
        ServiceDescriptor::new(
            "ImagingServices",
            Matcher::Pattern(Regex::new(r"^ImagingServices(\.\d+)?\.log$").unwrap()),
            Some(Matcher::Pattern(Regex::new(r"^/PCCIS/").unwrap())),
        ),
        routed("OfficeConversionService", "OfficeConversionService.log", r"^/OCS/"),
        routed("PDFConversionService", "PDFConversionService.log", r"^/PDFCS/"),
        routed("ContentConversionService", "ContentConversionService.log", r"^/v2/contentConverters"),
        routed("EmailConversionService", "EmailConversionService.log", r"^/ECS/"),
        routed("HTMLConversionService", "HTMLConversionService.log", r"^/HCS/"),
        routed("RasterConversionService", "RasterConversionService.log", r"^/RCS/"),
        routed("VectorConversionService", "VectorConversionService.log", r"^/VCS/"),
        routed("FormatDetectionService", "FormatDetectionService.log", r"^/FDS/"),
        routed("AutoRedactionService", "AutoRedactionService.log", r"^/v2/redactionCreators"),
        routed("RedactionService", "RedactionService.log", r"^/RS/"),
        routed("document-conversion-service", "document-conversion-service.log", r"^/DCS/"),
        routed("text-service", "text-service.log", r"^/v2/searchTasks"),
        routed("form-extraction-service", "form-extraction-service.log", r"^/v2/formExtractors"),
        literal("config-normalizer", "config-normalizer.log"),
        literal("configuration-service", "configuration-service.log"),
        literal("EmailProcessingService", "EmailProcessingService.log"),
        literal("ErrorReportingService", "ErrorReportingService.log"),
        literal("health-service", "health-service.log"),
        literal("licensing-service", "licensing-service.log"),
        literal("mongo-manager-service", "mongo-manager-service.log"),
        literal("ms-office-conversion-service", "ms-office-conversion-service.log"),
        literal("PccErrors", "PccErrors.log"),
        literal("PDFProcessingService", "PDFProcessingService.log"),
        literal("process-state-service", "process-state-service.log"),
        literal("raster-form-extraction-service", "raster-form-extraction-service.log"),
        literal("watchdog", "watchdog.log"),
    ])
}

/// Path of the request an entry describes, from `req.path` or, failing that, the path part of `req.url`
pub fn request_path(entry: &Value) -> Option<String> {
    let req = entry.get("req")?;
    if let Some(path) = str_field(req, "path") {
        return Some(path.to_string());
    }
    str_field(req, "url").map(strip_origin)
}

/// Request path as the routing table sees it.
///
/// Components that annotate their message with `InternalRequest (<service>)` log paths without
/// the service prefix, so `/<service>` is prepended.
pub fn effective_request_path(entry: &Value) -> Option<String> {
    let path = request_path(entry)?;
    let internal_re = INTERNAL_REQUEST_RE
        .get_or_init(|| Regex::new(r"InternalRequest \(([^)\s]+)\)").unwrap());

    let service = str_field(entry, "msg")
        .and_then(|msg| internal_re.captures(msg))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    match service {
        Some(service) if path.starts_with('/') => Some(format!("/{}{}", service, path)),
        Some(service) => Some(format!("/{}/{}", service, path)),
        None => Some(path),
    }
}

fn strip_origin(url: &str) -> String {
    let url_re = URL_RE.get_or_init(|| Regex::new(r"^(\w+)://([^/:?#]+)(?::(\d+))?(.*)$").unwrap());
    match url_re.captures(url) {
        Some(caps) => {
            let rest = caps.get(4).map_or("", |m| m.as_str());
            if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            }
        }
        None => url.to_string(),
    }
}

/// Whether a sent request (`sender`, a `reqBegin` entry) is the request `receiver` accepted.
///
/// Methods must agree when both sides log one. Paths are compared with their query strings only
/// when both carry one; otherwise the query string is ignored on both sides.
pub fn same_request(sender: &Value, receiver: &Value) -> bool {
    let sender_method = sender.get("req").and_then(|r| str_field(r, "method"));
    let receiver_method = receiver.get("req").and_then(|r| str_field(r, "method"));
    if let (Some(a), Some(b)) = (sender_method, receiver_method) {
        if a != b {
            return false;
        }
    }

    let (Some(sent), Some(received)) = (effective_request_path(sender), request_path(receiver))
    else {
        return false;
    };

    if sent.contains('?') && received.contains('?') {
        sent == received
    } else {
        strip_query(&sent) == strip_query(&received)
    }
}

fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}
