//! The view pipeline: pure derivation of the rendered task list.
//!
//! `visible_tasks` applies status filter, search, category filter, and a
//! stable sort, in that fixed order. It has no side effects and is
//! recomputed on demand; identical inputs always yield the identical
//! sequence.

use chrono::{DateTime, Utc};

use crate::fields::{SortKey, StatusFilter};
use crate::task::Task;

/// Counts over the unfiltered collection, consumed by the filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Derive the ordered sequence of tasks to render.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    query: &str,
    category: &str,
    sort: SortKey,
) -> Vec<&'a Task> {
    let query = query.to_lowercase();

    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| match status {
            StatusFilter::All => true,
            StatusFilter::Completed => t.completed,
            StatusFilter::Pending => !t.completed,
        })
        .filter(|t| {
            query.is_empty()
                || t.title.to_lowercase().contains(&query)
                || t.description.to_lowercase().contains(&query)
                || t.category.to_lowercase().contains(&query)
        })
        .filter(|t| category.is_empty() || t.category == category)
        .collect();

    match sort {
        SortKey::Title => visible.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::Priority => {
            visible.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()))
        }
        SortKey::DueDate => visible.sort_by(|a, b| match (a.due_date, b.due_date) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(da), Some(db)) => da.cmp(&db),
        }),
        SortKey::CreatedAt => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    visible
}

/// Count tasks by completion state over the unfiltered collection.
pub fn task_counts(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskCounts {
        all: tasks.len(),
        completed,
        pending: tasks.len() - completed,
    }
}

/// Count incomplete tasks whose due date is strictly before `now`.
pub fn overdue_count(tasks: &[Task], now: DateTime<Utc>) -> usize {
    tasks.iter().filter(|t| t.is_overdue(now)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use chrono::Duration;

    fn task(title: &str, category: &str) -> Task {
        Task::new(title.into(), String::new(), None, Priority::Medium, category.into())
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn status_filter_splits_by_completion() {
        let mut tasks = vec![task("open", "Personal"), task("done", "Personal")];
        tasks[1].completed = true;

        let all = visible_tasks(&tasks, StatusFilter::All, "", "", SortKey::Title);
        assert_eq!(titles(&all), ["done", "open"]);
        let completed = visible_tasks(&tasks, StatusFilter::Completed, "", "", SortKey::Title);
        assert_eq!(titles(&completed), ["done"]);
        let pending = visible_tasks(&tasks, StatusFilter::Pending, "", "", SortKey::Title);
        assert_eq!(titles(&pending), ["open"]);
    }

    #[test]
    fn search_matches_title_description_or_category_case_insensitively() {
        let mut tasks = vec![
            task("Buy milk", "Shopping"),
            task("Buy eggs", "Shopping"),
            task("report", "Work"),
        ];
        tasks[2].description = "quarterly MILK figures".into();

        let hits = visible_tasks(&tasks, StatusFilter::All, "MILK", "", SortKey::Title);
        assert_eq!(titles(&hits), ["Buy milk", "report"]);

        let by_category = visible_tasks(&tasks, StatusFilter::All, "shop", "", SortKey::Title);
        assert_eq!(titles(&by_category), ["Buy eggs", "Buy milk"]);
    }

    #[test]
    fn category_filter_is_exact() {
        let tasks = vec![task("a", "Work"), task("b", "Workout")];
        let hits = visible_tasks(&tasks, StatusFilter::All, "", "Work", SortKey::Title);
        assert_eq!(titles(&hits), ["a"]);
    }

    #[test]
    fn due_date_sort_puts_undated_last_and_is_stable() {
        let now = Utc::now();
        let mut a = task("A", "Personal");
        a.due_date = Some(now - Duration::days(1));
        let b = task("B", "Personal");
        let c = task("C", "Personal");
        let mut d = task("D", "Personal");
        d.due_date = Some(now + Duration::days(3));
        // Input order B, C among the undated must be preserved.
        let tasks = vec![b, a, c, d];

        let sorted = visible_tasks(&tasks, StatusFilter::Pending, "", "", SortKey::DueDate);
        assert_eq!(titles(&sorted), ["A", "D", "B", "C"]);
        assert_eq!(overdue_count(&tasks, now), 1);
    }

    #[test]
    fn priority_sort_is_descending_and_stable() {
        let mut tasks = vec![
            task("m1", "Personal"),
            task("h1", "Personal"),
            task("l1", "Personal"),
            task("m2", "Personal"),
            task("h2", "Personal"),
        ];
        tasks[1].priority = Priority::High;
        tasks[2].priority = Priority::Low;
        tasks[4].priority = Priority::High;

        let sorted = visible_tasks(&tasks, StatusFilter::All, "", "", SortKey::Priority);
        assert_eq!(titles(&sorted), ["h1", "h2", "m1", "m2", "l1"]);
    }

    #[test]
    fn created_at_sort_is_newest_first() {
        let mut old = task("old", "Personal");
        old.created_at = Utc::now() - Duration::days(2);
        let new = task("new", "Personal");
        let tasks = vec![old, new];

        let sorted = visible_tasks(&tasks, StatusFilter::All, "", "", SortKey::CreatedAt);
        assert_eq!(titles(&sorted), ["new", "old"]);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let mut tasks = vec![task("x", "Work"), task("y", "Shopping"), task("z", "Work")];
        tasks[0].completed = true;

        let first = visible_tasks(&tasks, StatusFilter::Pending, "", "Work", SortKey::Title);
        let second = visible_tasks(&tasks, StatusFilter::Pending, "", "Work", SortKey::Title);
        assert_eq!(titles(&first), titles(&second));
    }

    #[test]
    fn counts_cover_the_unfiltered_collection() {
        let mut tasks = vec![task("a", "Personal"), task("b", "Personal"), task("c", "Personal")];
        tasks[0].completed = true;
        let counts = task_counts(&tasks);
        assert_eq!(counts, TaskCounts { all: 3, completed: 1, pending: 2 });
    }
}
