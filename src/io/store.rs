use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::Task;

/// Error type for task store I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    DecodeError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[error("{path} is not a valid task list: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// What a successful `load` found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No data file yet; the store is empty
    Missing,
    /// The data file was read; holds the number of tasks loaded
    Loaded(usize),
}

/// The authoritative in-memory task list, mirrored to a JSON file.
///
/// The file is opened per read or write and never held across the session.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// An empty store bound to `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Replace the in-memory list with the contents of the data file.
    ///
    /// A missing file yields an empty list. On any error the list is left
    /// empty and the raw file content is copied to the recovery log, so a
    /// later save cannot destroy it unnoticed.
    pub fn load(&mut self) -> Result<LoadOutcome, StoreError> {
        self.tasks.clear();

        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no data file, starting empty");
            return Ok(LoadOutcome::Missing);
        }

        let bytes = fs::read(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                let raw = e.as_bytes();
                recovery::log_recovery(
                    &self.path,
                    RecoveryEntry::new(RecoveryCategory::Load, "data file is not valid UTF-8")
                        .field("Source", self.path.display().to_string())
                        .field("Error", e.utf8_error().to_string())
                        .field("Raw bytes", raw.escape_ascii().to_string())
                        .body(String::from_utf8_lossy(raw)),
                );
                return Err(StoreError::DecodeError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        match serde_json::from_str::<Vec<Task>>(&text) {
            Ok(tasks) => {
                tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
                let dupes = duplicate_ids(&tasks);
                if !dupes.is_empty() {
                    tracing::warn!(
                        path = %self.path.display(),
                        ids = ?dupes,
                        "data file repeats task ids; selection resolves to the first match"
                    );
                }
                self.tasks = tasks;
                Ok(LoadOutcome::Loaded(self.tasks.len()))
            }
            Err(e) => {
                recovery::log_recovery(
                    &self.path,
                    RecoveryEntry::new(RecoveryCategory::Load, "data file could not be parsed")
                        .field("Source", self.path.display().to_string())
                        .field("Error", e.to_string())
                        .body(text),
                );
                Err(StoreError::ParseError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        }
    }

    /// Overwrite the data file with the full in-memory list.
    ///
    /// The write is a temp-file-and-rename, so a failure leaves the previous
    /// file untouched. The in-memory list is never modified here.
    pub fn save(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.tasks)?;
        if let Err(e) = recovery::atomic_write(&self.path, content.as_bytes()) {
            tracing::error!(path = %self.path.display(), error = %e, "save failed");
            recovery::log_recovery(
                &self.path,
                RecoveryEntry::new(RecoveryCategory::Write, "data file write failed")
                    .field("Target", self.path.display().to_string())
                    .field("Error", e.to_string())
                    .body(content),
            );
            return Err(StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            });
        }
        tracing::debug!(path = %self.path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Discard the in-memory list and reload it from disk.
    pub fn revert(&mut self) -> Result<LoadOutcome, StoreError> {
        self.load()
    }
}

/// Ids that appear on more than one task, in ascending order
fn duplicate_ids(tasks: &[Task]) -> Vec<u32> {
    let mut ids: Vec<u32> = tasks.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    let mut dupes: Vec<u32> = ids.windows(2).filter(|w| w[0] == w[1]).map(|w| w[0]).collect();
    dupes.dedup();
    dupes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_tasks() -> Vec<Task> {
        let mut first = Task::new(1, "Buy milk".into());
        first.priority = Priority::High;
        let mut second = Task::new(2, "File taxes".into());
        second.due_date = NaiveDate::from_ymd_opt(2025, 4, 15);
        second.priority = Priority::Low;
        second.completed = true;
        vec![first, second]
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let mut store = TaskStore::new(tmp.path().join("tasks.json"));
        assert_eq!(store.load().unwrap(), LoadOutcome::Missing);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");

        let mut store = TaskStore::new(&path);
        *store.tasks_mut() = sample_tasks();
        store.save().unwrap();

        let mut reloaded = TaskStore::new(&path);
        assert_eq!(reloaded.load().unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(reloaded.tasks(), sample_tasks().as_slice());
    }

    #[test]
    fn test_saved_document_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        let mut store = TaskStore::new(&path);
        store.tasks_mut().push(Task::new(1, "Buy milk".into()));
        store.save().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"id\": 1,\n    \"title\": \"Buy milk\",\n    \"due_date\": \"\",\n    \"priority\": \"Medium\",\n    \"completed\": false\n  }\n]"
        );
    }

    #[test]
    fn test_load_corrupt_file_empties_and_logs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = TaskStore::new(&path);
        store.tasks_mut().push(Task::new(9, "stale".into()));
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::ParseError { .. }));
        assert!(store.is_empty());

        let log = fs::read_to_string(recovery::recovery_log_path(&path)).unwrap();
        assert!(log.contains("{ not json"));
    }

    #[test]
    fn test_load_non_utf8_file_is_logged_before_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        let original: &[u8] = b"[{\"id\": 1, \"title\": \"Caf\xe9\"}]";
        fs::write(&path, original).unwrap();

        let mut store = TaskStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::DecodeError { .. }));
        assert!(store.is_empty());

        let log_path = recovery::recovery_log_path(&path);
        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("not valid UTF-8"));
        assert!(log.contains(r"Caf\xe9"));

        // A later save replaces the file, but the log still has the bytes
        store.tasks_mut().push(Task::new(1, "New".into()));
        store.save().unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), log);
    }

    #[test]
    fn test_failed_save_keeps_old_content_and_logs_body() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory at the data path makes the final rename fail
        // while the parent directory stays writable.
        let path = tmp.path().join("tasks.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "old content").unwrap();

        let mut store = TaskStore::new(&path);
        *store.tasks_mut() = sample_tasks();
        let err = store.save().unwrap_err();
        assert!(matches!(err, StoreError::WriteError { .. }));
        assert_eq!(store.tasks().len(), 2);

        assert_eq!(fs::read_to_string(path.join("keep.txt")).unwrap(), "old content");
        let mut names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["tasks.json", "tasks.json.recovery.log"]);

        let body = serde_json::to_string_pretty(&sample_tasks()).unwrap();
        let log = fs::read_to_string(recovery::recovery_log_path(&path)).unwrap();
        assert!(log.contains("write: data file write failed"));
        assert!(log.contains(&body));
    }

    #[test]
    fn test_duplicate_ids_load_and_are_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": 2, "title": "a"}, {"id": 2, "title": "b"}, {"id": 5, "title": "c"}]"#,
        )
        .unwrap();

        let mut store = TaskStore::new(&path);
        assert_eq!(store.load().unwrap(), LoadOutcome::Loaded(3));
        assert_eq!(duplicate_ids(store.tasks()), vec![2]);
        assert_eq!(store.find(2).unwrap().title, "a");
    }

    #[test]
    fn test_duplicate_ids_none() {
        assert!(duplicate_ids(&sample_tasks()).is_empty());
    }

    #[test]
    fn test_save_failure_keeps_memory_and_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing-dir").join("tasks.json");
        let mut store = TaskStore::new(&path);
        *store.tasks_mut() = sample_tasks();

        let err = store.save().unwrap_err();
        assert!(matches!(err, StoreError::WriteError { .. }));
        assert_eq!(store.tasks().len(), 2);
        assert!(!path.exists());
    }

    #[test]
    fn test_revert_discards_unsaved_changes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        let mut store = TaskStore::new(&path);
        *store.tasks_mut() = sample_tasks();
        store.save().unwrap();

        store.find_mut(1).unwrap().title = "Changed".into();
        store.revert().unwrap();
        assert_eq!(store.find(1).unwrap().title, "Buy milk");
    }

    #[test]
    fn test_find_by_id() {
        let mut store = TaskStore::new("unused.json");
        *store.tasks_mut() = sample_tasks();
        assert_eq!(store.find(2).unwrap().title, "File taxes");
        assert!(store.find(3).is_none());
    }
}
