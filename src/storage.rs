//! Durable storage for the three persisted records.
//!
//! The data directory holds three independent records: `tasks.json`,
//! `categories.json`, and `user`. Every load degrades to a safe default on
//! a missing or unreadable record, and every save overwrites the record in
//! full via a temp file + rename. Storage failures are reported on stderr
//! and never surfaced to callers; the worst outcome is falling back to an
//! empty collection.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::task::Task;

const TASKS_FILE: &str = "tasks.json";
const CATEGORIES_FILE: &str = "categories.json";
const USER_FILE: &str = "user";

/// Categories seeded when no category record exists yet.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Personal", "Work", "Shopping"];

/// Load the task collection, or an empty one when missing or corrupt.
pub fn load_tasks(dir: &Path) -> Vec<Task> {
    match read_json(&dir.join(TASKS_FILE)) {
        Ok(Some(tasks)) => tasks,
        Ok(None) => Vec::new(),
        Err(e) => {
            eprintln!("Failed to load tasks, starting fresh: {e}");
            Vec::new()
        }
    }
}

/// Persist the full task collection, replacing the prior record.
pub fn save_tasks(dir: &Path, tasks: &[Task]) {
    if let Err(e) = write_json(&dir.join(TASKS_FILE), tasks) {
        eprintln!("Failed to save tasks: {e}");
    }
}

/// Load the category registry, or the default seed when the record is
/// missing, corrupt, or empty.
pub fn load_categories(dir: &Path) -> Vec<String> {
    let loaded: Vec<String> = match read_json(&dir.join(CATEGORIES_FILE)) {
        Ok(Some(categories)) => categories,
        Ok(None) => Vec::new(),
        Err(e) => {
            eprintln!("Failed to load categories, using defaults: {e}");
            Vec::new()
        }
    };
    if loaded.is_empty() {
        DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
    } else {
        loaded
    }
}

/// Persist the full category registry, replacing the prior record.
pub fn save_categories(dir: &Path, categories: &[String]) {
    if let Err(e) = write_json(&dir.join(CATEGORIES_FILE), categories) {
        eprintln!("Failed to save categories: {e}");
    }
}

/// Load the persisted username. `None` means logged out; an absent record
/// is distinct from an empty string (which never round-trips through
/// `save_user`).
pub fn load_user(dir: &Path) -> Option<String> {
    let path = dir.join(USER_FILE);
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(name) => {
            let name = name.trim().to_string();
            if name.is_empty() { None } else { Some(name) }
        }
        Err(e) => {
            eprintln!("Failed to load user: {e}");
            None
        }
    }
}

/// Persist the username as a raw string record.
pub fn save_user(dir: &Path, name: &str) {
    if let Err(e) = write_atomic(&dir.join(USER_FILE), name.as_bytes()) {
        eprintln!("Failed to save user: {e}");
    }
}

/// Remove the username record entirely, so a later load yields no user.
pub fn clear_user(dir: &Path) {
    let path = dir.join(USER_FILE);
    if path.exists() {
        if let Err(e) = fs::remove_file(&path) {
            eprintln!("Failed to clear user: {e}");
        }
    }
}

/// Read and deserialize a JSON record. `Ok(None)` means the record does
/// not exist yet; `Err` covers IO and parse failures.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let mut buf = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut buf))
        .map_err(|e| e.to_string())?;
    let value = serde_json::from_str(&buf).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serialize and write a JSON record atomically.
fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), String> {
    let data = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    write_atomic(path, data.as_bytes()).map_err(|e| e.to_string())
}

/// Atomic-ish write via temp + rename.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    let mut f = File::create(&tmp)?;
    f.write_all(data)?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use chrono::{Duration, Utc};

    #[test]
    fn missing_records_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tasks(dir.path()).is_empty());
        assert_eq!(load_categories(dir.path()), DEFAULT_CATEGORIES.to_vec());
        assert_eq!(load_user(dir.path()), None);
    }

    #[test]
    fn tasks_round_trip_with_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = vec![
            Task::new(
                "Buy milk".into(),
                "2 litres".into(),
                Some(Utc::now() + Duration::days(2)),
                Priority::Low,
                "Shopping".into(),
            ),
            Task::new("No due".into(), String::new(), None, Priority::High, "Work".into()),
        ];
        save_tasks(dir.path(), &tasks);
        let loaded = load_tasks(dir.path());
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn corrupt_tasks_record_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TASKS_FILE), "{not json").unwrap();
        assert!(load_tasks(dir.path()).is_empty());
    }

    #[test]
    fn empty_category_record_falls_back_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        save_categories(dir.path(), &[]);
        assert_eq!(load_categories(dir.path()), DEFAULT_CATEGORIES.to_vec());
    }

    #[test]
    fn categories_round_trip_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let cats = vec!["Personal".to_string(), "Work".to_string(), "Errands".to_string()];
        save_categories(dir.path(), &cats);
        assert_eq!(load_categories(dir.path()), cats);
    }

    #[test]
    fn clear_user_removes_the_record() {
        let dir = tempfile::tempdir().unwrap();
        save_user(dir.path(), "alex");
        assert_eq!(load_user(dir.path()), Some("alex".to_string()));
        clear_user(dir.path());
        assert_eq!(load_user(dir.path()), None);
        assert!(!dir.path().join(USER_FILE).exists());
    }
}
