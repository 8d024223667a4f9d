use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;

const LOG_PREAMBLE: &str = "\
<!-- taskman recovery log: append-only copies of task data that could not
     be read or written. If tasks went missing, look here.
     Safe to delete once you have what you need. -->

---
";

/// Why task data ended up in the recovery log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// The data file existed but could not be read or parsed
    Load,
    /// The data file could not be written
    Write,
}

impl RecoveryCategory {
    fn as_str(self) -> &'static str {
        match self {
            RecoveryCategory::Load => "load",
            RecoveryCategory::Write => "write",
        }
    }
}

/// One block of the recovery log: a heading, `key: value` lines, and the
/// raw task data in a fenced block.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    at: DateTime<Utc>,
    category: RecoveryCategory,
    summary: String,
    fields: Vec<(String, String)>,
    body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, summary: impl Into<String>) -> Self {
        RecoveryEntry {
            at: Utc::now(),
            category,
            summary: summary.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn category(&self) -> RecoveryCategory {
        self.category
    }
}

impl fmt::Display for RecoveryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} | {}: {}\n",
            self.at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.category.as_str(),
            self.summary
        )?;
        for (key, value) in &self.fields {
            writeln!(f, "{}: {}", key, value)?;
        }
        if !self.body.is_empty() {
            let newline = if self.body.ends_with('\n') { "" } else { "\n" };
            write!(f, "\n```text\n{}{}```\n", self.body, newline)?;
        }
        writeln!(f, "\n---")
    }
}

// ---------------------------------------------------------------------------
// Path helper
// ---------------------------------------------------------------------------

/// The recovery log sits next to the data file: `tasks.json` ->
/// `tasks.json.recovery.log`.
pub fn recovery_log_path(data_file: &Path) -> PathBuf {
    let mut name = data_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "tasks".into());
    name.push(".recovery.log");
    data_file.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Replace `path` with `content` via a sibling temp file and a rename, so
/// readers see either the old file or the new one.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(content)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map(|_| ()).map_err(|e| e.error)
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append `entry` to the log beside `data_file`. Failures here never reach
/// the caller; they are reported through tracing.
pub fn log_recovery(data_file: &Path, entry: RecoveryEntry) {
    let log = recovery_log_path(data_file);
    if let Err(e) = append_entry(&log, &entry) {
        tracing::warn!(log = %log.display(), error = %e, "could not write to recovery log");
        return;
    }
    tracing::warn!(
        log = %log.display(),
        category = entry.category().as_str(),
        "copied task data to the recovery log"
    );
}

fn append_entry(log: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let fresh = std::fs::metadata(log).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(log)?;
    if fresh {
        file.write_all(LOG_PREAMBLE.as_bytes())?;
    }
    write!(file, "{}", entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recovery_log_path() {
        let path = recovery_log_path(Path::new("/data/tasks.json"));
        assert_eq!(path, PathBuf::from("/data/tasks.json.recovery.log"));

        let bare = recovery_log_path(Path::new("tasks.json"));
        assert_eq!(bare, PathBuf::from("tasks.json.recovery.log"));
    }

    #[test]
    fn test_entry_layout() {
        let entry = RecoveryEntry::new(RecoveryCategory::Write, "save failed")
            .field("Target", "tasks.json")
            .body("[]");
        let md = entry.to_string();
        assert!(md.starts_with("## "));
        assert!(md.contains("| write: save failed"));
        assert!(md.contains("Target: tasks.json\n"));
        assert!(md.contains("```text\n[]\n```\n"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_empty_body_has_no_fence() {
        let entry = RecoveryEntry::new(RecoveryCategory::Load, "unreadable");
        assert!(!entry.to_string().contains("```"));
    }

    #[test]
    fn test_preamble_written_once() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("tasks.json");

        log_recovery(&data, RecoveryEntry::new(RecoveryCategory::Load, "first").body("a"));
        log_recovery(&data, RecoveryEntry::new(RecoveryCategory::Write, "second").body("b"));

        let content = std::fs::read_to_string(recovery_log_path(&data)).unwrap();
        assert_eq!(content.matches("taskman recovery log").count(), 1);
        assert!(content.contains("load: first"));
        assert!(content.contains("write: second"));
    }

    #[test]
    fn test_atomic_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");

        atomic_write(&path, b"[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        atomic_write(&path, b"[1]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");
    }

    #[test]
    fn test_atomic_write_missing_dir_leaves_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no-such-dir").join("tasks.json");
        assert!(atomic_write(&path, b"[]").is_err());
        assert!(!path.exists());
    }
}
