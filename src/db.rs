//! In-memory task store and category registry.
//!
//! `Database` is the single source of truth for a session. The only way to
//! obtain one is `Database::load`, which reads the persisted records first,
//! so a write can never clobber storage before the initial load has
//! happened. Every successful mutation rewrites the affected record(s) in
//! full through the storage layer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::fields::Priority;
use crate::storage;
use crate::task::Task;

/// In-memory database holding the task collection and category registry.
#[derive(Debug)]
pub struct Database {
    tasks: Vec<Task>,
    categories: Vec<String>,
    dir: PathBuf,
}

impl Database {
    /// Load both records from the data directory.
    pub fn load(dir: &Path) -> Self {
        Database {
            tasks: storage::load_tasks(dir),
            categories: storage::load_categories(dir),
            dir: dir.to_path_buf(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a new task at the front of the collection (newest first).
    ///
    /// Rejects titles that trim to empty, leaving the store untouched.
    /// Returns a reference to the created task.
    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
        priority: Priority,
        category: &str,
    ) -> Option<&Task> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = Task::new(
            title.to_string(),
            description.to_string(),
            due_date,
            priority,
            category.to_string(),
        );
        self.tasks.insert(0, task);
        self.ensure_category(category);
        storage::save_tasks(&self.dir, &self.tasks);
        self.tasks.first()
    }

    /// Replace the mutable fields of a task in place, preserving `id`,
    /// `created_at`, and `completed`. No-op on unknown id or empty title.
    pub fn edit_task(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
        priority: Priority,
        category: &str,
    ) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.title = title.to_string();
        task.description = description.to_string();
        task.due_date = due_date;
        task.priority = priority;
        task.category = category.to_string();
        self.ensure_category(category);
        storage::save_tasks(&self.dir, &self.tasks);
        true
    }

    /// Flip the completion flag of a task. No-op on unknown id.
    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        storage::save_tasks(&self.dir, &self.tasks);
        true
    }

    /// Remove a task. No-op on unknown id. Categories are never shrunk.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        storage::save_tasks(&self.dir, &self.tasks);
        true
    }

    /// Append a category label if not already registered (case-sensitive
    /// exact match). Idempotent; persists only when the registry grows.
    pub fn ensure_category(&mut self, label: &str) -> bool {
        if self.categories.iter().any(|c| c == label) {
            return false;
        }
        self.categories.push(label.to_string());
        storage::save_categories(&self.dir, &self.categories);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_CATEGORIES;
    use chrono::Duration;
    use std::collections::HashSet;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::load(dir.path())
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        assert!(db.add_task("   ", "", None, Priority::Medium, "Personal").is_none());
        assert!(db.tasks().is_empty());
        // Nothing was persisted either.
        assert!(storage::load_tasks(dir.path()).is_empty());
    }

    #[test]
    fn add_prepends_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        db.add_task("first", "", None, Priority::Medium, "Personal");
        db.add_task("second", "", None, Priority::Medium, "Personal");
        assert_eq!(db.tasks()[0].title, "second");
        assert_eq!(db.tasks()[1].title, "first");
    }

    #[test]
    fn ids_stay_unique_and_created_at_immutable_across_edits() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        for i in 0..5 {
            db.add_task(&format!("task {i}"), "", None, Priority::Medium, "Personal");
        }
        let ids: HashSet<String> = db.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 5);

        let target = db.tasks()[2].clone();
        assert!(db.edit_task(
            &target.id,
            "renamed",
            "desc",
            Some(Utc::now() + Duration::days(1)),
            Priority::High,
            "Work",
        ));
        let edited = db.get(&target.id).unwrap();
        assert_eq!(edited.created_at, target.created_at);
        assert_eq!(edited.completed, target.completed);
        assert_eq!(edited.title, "renamed");
        assert_eq!(edited.priority, Priority::High);
    }

    #[test]
    fn edit_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        db.add_task("a", "", None, Priority::Medium, "Personal");
        assert!(!db.edit_task("nope", "x", "", None, Priority::Low, "Personal"));
        assert_eq!(db.tasks()[0].title, "a");
    }

    #[test]
    fn toggle_flips_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        db.add_task("a", "", None, Priority::Medium, "Personal");
        let id = db.tasks()[0].id.clone();
        assert!(db.toggle_complete(&id));
        assert!(db.tasks()[0].completed);
        assert!(db.toggle_complete(&id));
        assert!(!db.tasks()[0].completed);
        assert!(!db.toggle_complete("nope"));
    }

    #[test]
    fn delete_removes_but_keeps_category() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        db.add_task("a", "", None, Priority::Medium, "Errands");
        let id = db.tasks()[0].id.clone();
        assert!(db.delete_task(&id));
        assert!(db.tasks().is_empty());
        assert!(!db.delete_task(&id));
        // Soft reference: the category survives its last task.
        assert!(db.categories().iter().any(|c| c == "Errands"));
    }

    #[test]
    fn new_category_appends_exactly_once_after_seed() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir);
        assert_eq!(db.categories(), DEFAULT_CATEGORIES.to_vec());

        // Already-seeded category: no change.
        db.add_task("milk", "", None, Priority::Low, "Shopping");
        assert_eq!(db.categories(), DEFAULT_CATEGORIES.to_vec());

        // New category appends after all pre-existing ones, once.
        db.add_task("stamps", "", None, Priority::Low, "Errands");
        db.add_task("post office", "", None, Priority::Low, "Errands");
        let expected: Vec<String> = DEFAULT_CATEGORIES
            .iter()
            .map(|s| s.to_string())
            .chain(["Errands".to_string()])
            .collect();
        assert_eq!(db.categories(), expected);
    }

    #[test]
    fn mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut db = open_db(&dir);
            db.add_task("persisted", "body", None, Priority::High, "Work");
            let id = db.tasks()[0].id.clone();
            db.toggle_complete(&id);
        }
        let db = open_db(&dir);
        assert_eq!(db.tasks().len(), 1);
        assert_eq!(db.tasks()[0].title, "persisted");
        assert!(db.tasks()[0].completed);
    }
}
