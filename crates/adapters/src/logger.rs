//! JSON-lines logging adapter for gateway events.
//!
//! Every search produces a short stream of structured events —
//! `search.start`, `search.completed`, field-list conflicts, skipped Solr
//! documents. This adapter renders each event as one JSON object per line,
//! stamps it with a timestamp and the logger's scope fields (collection
//! name, correlation id), and scrubs secret-looking values such as
//! embedding API keys before anything reaches the sink.

use searchgate_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use searchgate_shared::{REDACTED, is_secret_key};
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Destination for rendered log lines.
pub trait LogWriter: Send + Sync {
    /// Write one rendered line (trailing newline included).
    fn write_line(&self, line: &str);
}

/// Writer sending lines to stderr, keeping stdout free for search output.
#[derive(Debug, Default)]
pub struct StderrWriter;

impl LogWriter for StderrWriter {
    fn write_line(&self, line: &str) {
        // Nothing sensible is left to do if stderr itself is gone.
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }
}

/// Logger adapter emitting one JSON object per event.
///
/// Scope fields are stamped on every event; `child` extends the scope, so
/// the search use-case can derive a per-request logger carrying the
/// correlation id without threading it through every call.
pub struct JsonLineLogger {
    writer: Arc<dyn LogWriter>,
    scope: LogFields,
    min_level: LogLevel,
}

impl JsonLineLogger {
    /// Create a logger with an empty scope.
    #[must_use]
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        Self {
            writer,
            scope: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Create a logger whose scope names the collection it serves.
    #[must_use]
    pub fn for_collection(collection: &str, writer: Arc<dyn LogWriter>) -> Self {
        let mut logger = Self::new(writer);
        logger.scope.insert(
            "collectionName".into(),
            Value::String(collection.to_owned()),
        );
        logger
    }

    /// Set the minimum level; events below it are dropped.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl LoggerPort for JsonLineLogger {
    fn log(&self, event: LogEvent) {
        if rank(event.level) < rank(self.min_level) {
            return;
        }

        let mut data = self.scope.clone();
        if let Some(extra) = event.fields {
            data.extend(extra);
        }
        for (key, value) in data.iter_mut() {
            scrub_value(key, value);
        }

        let mut payload = Map::new();
        payload.insert("ts".to_string(), Value::from(epoch_ms()));
        payload.insert(
            "level".to_string(),
            Value::String(level_label(event.level).to_string()),
        );
        payload.insert("event".to_string(), Value::String(event.event.to_string()));
        payload.insert(
            "message".to_string(),
            Value::String(event.message.to_string()),
        );
        if !data.is_empty() {
            let entries = data
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect::<Map<String, Value>>();
            payload.insert("data".to_string(), Value::Object(entries));
        }

        let line = match serde_json::to_string(&Value::Object(payload)) {
            Ok(mut encoded) => {
                encoded.push('\n');
                encoded
            },
            Err(_) => format!(
                "{{\"ts\":{},\"level\":\"error\",\"event\":\"logger.render_failed\",\
                 \"message\":\"could not render log event\"}}\n",
                epoch_ms()
            ),
        };
        self.writer.write_line(&line);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut scope = self.scope.clone();
        scope.extend(fields);
        Box::new(Self {
            writer: Arc::clone(&self.writer),
            scope,
            min_level: self.min_level,
        })
    }
}

const fn rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Debug => 0,
        LogLevel::Info => 1,
        LogLevel::Warn => 2,
        LogLevel::Error => 3,
    }
}

const fn level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

fn scrub_value(key: &str, value: &mut Value) {
    if is_secret_key(key) {
        *value = Value::String(REDACTED.to_string());
        return;
    }
    match value {
        Value::Object(map) => {
            for (nested_key, nested) in map.iter_mut() {
                scrub_value(nested_key, nested);
            }
        },
        Value::Array(items) => {
            for item in items {
                scrub_value("", item);
            }
        },
        _ => {},
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CaptureWriter {
        lines: Mutex<Vec<String>>,
    }

    impl CaptureWriter {
        fn take(&self) -> Vec<String> {
            self.lines
                .lock()
                .map(|mut guard| std::mem::take(&mut *guard))
                .unwrap_or_default()
        }
    }

    impl LogWriter for CaptureWriter {
        fn write_line(&self, line: &str) {
            if let Ok(mut guard) = self.lines.lock() {
                guard.push(line.to_string());
            }
        }
    }

    fn parse_single_line(writer: &CaptureWriter) -> Value {
        let lines = writer.take();
        assert_eq!(lines.len(), 1);
        serde_json::from_str(lines[0].trim()).unwrap_or(Value::Null)
    }

    #[test]
    fn search_events_carry_collection_and_correlation_scope() {
        let writer = Arc::new(CaptureWriter::default());
        let logger = JsonLineLogger::for_collection("documents", writer.clone());

        let mut request_scope = LogFields::new();
        request_scope.insert("correlationId".into(), Value::String("search_42".into()));
        let request_logger = logger.child(request_scope);

        let mut fields = LogFields::new();
        fields.insert("strategies".into(), Value::from(2));
        request_logger.info("search.start", "Search started", Some(fields));

        let payload = parse_single_line(&writer);
        assert_eq!(
            payload.pointer("/event").and_then(Value::as_str),
            Some("search.start")
        );
        assert_eq!(
            payload.pointer("/data/collectionName").and_then(Value::as_str),
            Some("documents")
        );
        assert_eq!(
            payload.pointer("/data/correlationId").and_then(Value::as_str),
            Some("search_42")
        );
        assert_eq!(
            payload.pointer("/data/strategies").and_then(Value::as_u64),
            Some(2)
        );
    }

    #[test]
    fn embedding_credentials_never_reach_the_sink() {
        let writer = Arc::new(CaptureWriter::default());
        let logger = JsonLineLogger::new(writer.clone());

        let mut fields = LogFields::new();
        fields.insert("apiKey".into(), Value::String("sk-live-123".into()));
        fields.insert(
            "embedding".into(),
            json!({ "address": "http://embed:9000", "bearerToken": "shhh" }),
        );
        logger.error(
            "embedding.request_failed",
            "Embedding request failed",
            Some(fields),
        );

        let line = writer.take().pop().unwrap_or_default();
        assert!(!line.contains("sk-live-123"));
        assert!(!line.contains("shhh"));
        assert!(line.contains(REDACTED));
        assert!(line.contains("http://embed:9000"));
    }

    #[test]
    fn planner_debug_events_respect_the_minimum_level() {
        let writer = Arc::new(CaptureWriter::default());
        let logger = JsonLineLogger::new(writer.clone());

        logger.debug("plan.fragment", "Composed keyword fragment", None);
        logger.warn(
            "search.field_list.conflict",
            "Field requested for both inclusion and exclusion; excluding",
            None,
        );

        let lines = writer.take();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("search.field_list.conflict"));
    }
}
