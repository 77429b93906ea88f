//! Reminder storage and persistence.
//!
//! Reminders live in a single JSON document that is fully rewritten on
//! every mutation. There is no locking: the store is safe for one writer
//! in one process, and concurrent writers race as last-writer-wins.
//! Callers that need more serialize access themselves.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::error::StoreError;

/// A persisted reminder record.
///
/// `time` is `HH:MM` and `date` is `YYYY-MM-DD`, but neither is validated:
/// malformed values are stored as-is and simply never match a due check.
/// Any extra fields the caller supplied (label, message, ...) ride along
/// unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub time: String,
    pub date: String,
    #[serde(default)]
    pub notified: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Caller-supplied fields of a reminder about to be created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub time: String,
    pub date: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// File-backed reminder store.
pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    /// Open the store against the application data directory.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Ok(Self {
            path: dir.join("reminders.json"),
        })
    }

    /// Create a store with a custom path (for testing)
    #[cfg(test)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Full collection in insertion order, read fresh from disk.
    ///
    /// A missing, unreadable or malformed file reads as the empty
    /// collection - persistence corruption is never surfaced here.
    pub fn list_all(&self) -> Vec<Reminder> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Append a new reminder with a fresh id and persist the collection.
    pub fn add(&self, draft: ReminderDraft) -> Result<Reminder, StoreError> {
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            time: draft.time,
            date: draft.date,
            notified: false,
            extra: draft.extra,
        };
        let mut all = self.list_all();
        all.push(reminder.clone());
        self.save_all(&all)?;
        Ok(reminder)
    }

    /// Unnotified reminders whose `time` and `date` equal the arguments.
    ///
    /// Literal string comparison at minute granularity - no ranges, no
    /// timezone handling.
    pub fn due_now(&self, current_time: &str, current_date: &str) -> Vec<Reminder> {
        self.list_all()
            .into_iter()
            .filter(|r| !r.notified && r.time == current_time && r.date == current_date)
            .collect()
    }

    /// Set `notified = true` on the matching record. Unknown ids are a
    /// silent no-op; the collection is persisted either way.
    pub fn mark_notified(&self, id: &str) -> Result<(), StoreError> {
        let mut all = self.list_all();
        if let Some(r) = all.iter_mut().find(|r| r.id == id) {
            r.notified = true;
        }
        self.save_all(&all)
    }

    /// Remove the matching record. Unknown ids are a silent no-op; the
    /// collection is persisted either way.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut all = self.list_all();
        all.retain(|r| r.id != id);
        self.save_all(&all)
    }

    /// Rewrite the whole document.
    fn save_all(&self, reminders: &[Reminder]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(reminders)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn draft(time: &str, date: &str) -> ReminderDraft {
        ReminderDraft {
            time: time.to_string(),
            date: date.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn add_then_list_contains_the_record() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        let added = store.add(draft("14:30", "2024-01-01")).unwrap();
        assert!(!added.id.is_empty());
        assert!(!added.notified);

        let all = store.list_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, added.id);
        assert_eq!(all[0].time, "14:30");
    }

    #[test]
    fn ids_are_unique_across_adds() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        let a = store.add(draft("08:00", "2024-01-01")).unwrap();
        let b = store.add(draft("08:00", "2024-01-01")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_all().len(), 2);
    }

    #[test]
    fn due_now_matches_exact_time_and_date_only() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        store.add(draft("14:30", "2024-01-01")).unwrap();
        store.add(draft("14:31", "2024-01-01")).unwrap();
        store.add(draft("14:30", "2024-01-02")).unwrap();

        let due = store.due_now("14:30", "2024-01-01");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].time, "14:30");
        assert_eq!(due[0].date, "2024-01-01");
    }

    #[test]
    fn mark_notified_excludes_from_due() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        let added = store.add(draft("14:30", "2024-01-01")).unwrap();
        store.mark_notified(&added.id).unwrap();

        assert!(store.due_now("14:30", "2024-01-01").is_empty());
        assert!(store.list_all()[0].notified);
    }

    #[test]
    fn mark_notified_unknown_id_is_a_no_op() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        store.add(draft("14:30", "2024-01-01")).unwrap();
        store.mark_notified("no-such-id").unwrap();
        assert!(!store.list_all()[0].notified);
    }

    #[test]
    fn delete_removes_only_the_matching_record() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        let a = store.add(draft("08:00", "2024-01-01")).unwrap();
        let b = store.add(draft("09:00", "2024-01-01")).unwrap();

        store.delete(&a.id).unwrap();
        let all = store.list_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, b.id);

        store.delete("no-such-id").unwrap();
        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));
        assert!(store.list_all().is_empty());
        assert!(store.due_now("14:30", "2024-01-01").is_empty());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(&path, "{ not json ]").unwrap();

        let store = ReminderStore::with_path(path);
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn extra_fields_round_trip_unmodified() {
        let dir = tempdir().unwrap();
        let store = ReminderStore::with_path(dir.path().join("reminders.json"));

        let mut d = draft("07:15", "2024-06-01");
        d.extra
            .insert("label".to_string(), serde_json::json!("take medication"));
        d.extra.insert("priority".to_string(), serde_json::json!(2));
        store.add(d).unwrap();

        let all = store.list_all();
        assert_eq!(all[0].extra["label"], "take medication");
        assert_eq!(all[0].extra["priority"], 2);
    }
}
