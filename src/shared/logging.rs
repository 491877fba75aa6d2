use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Append-only JSON-lines event log. Writes are best effort.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
    echo: bool,
}

impl EventLog {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            echo: false,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Also print each record to stderr. Only safe once no TUI owns the
    /// screen.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, message: &str) {
        self.append(Level::Info, event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.append(Level::Warn, event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.append(Level::Error, event, message);
    }

    pub fn append(&self, level: Level, event: &str, message: &str) {
        if self.echo {
            eprintln!("[{}] {message}", level.as_str().to_ascii_uppercase());
        }
        let Some(path) = &self.path else {
            return;
        };
        let payload = serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "level": level.as_str(),
            "event": event,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };
        let _ = writeln!(file, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_json_object_per_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs/bootstrap.log");
        let log = EventLog::to_file(&path);
        log.info("field.resolved", "Using workspace: acme [1]");
        log.warn("schema.skipped", "bad entry");

        let raw = fs::read_to_string(&path).expect("read log");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["event"], "field.resolved");
        assert_eq!(lines[1]["message"], "bad entry");
        assert!(lines[1]["timestamp"]
            .as_str()
            .is_some_and(|ts| chrono::DateTime::parse_from_rfc3339(ts).is_ok()));
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = EventLog::disabled();
        log.error("anything", "ignored");
        assert!(log.path().is_none());
    }
}
