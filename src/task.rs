//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single
//! to-do item with its metadata, along with due-date parsing and display
//! helpers.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;

/// Category assigned to tasks created without an explicit one.
pub const DEFAULT_CATEGORY: &str = "Personal";

/// A single to-do item.
///
/// `id` and `created_at` are assigned once at creation and never change.
/// `priority` and `category` carry serde defaults so records written before
/// those fields existed load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    /// Construct a new task with a fresh opaque id and `created_at = now`.
    pub fn new(
        title: String,
        description: String,
        due_date: Option<DateTime<Utc>>,
        priority: Priority,
        category: String,
    ) -> Self {
        Task {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            completed: false,
            created_at: Utc::now(),
            due_date,
            priority,
            category,
        }
    }

    /// True when the task is incomplete and its due date has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|d| d < now)
    }
}

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow"
/// - "in 3d", "in 2w"
/// - bare weekday names ("friday" means this week's occurrence)
/// - "YYYY-MM-DD" format
///
/// The result is midnight local time, expressed in UTC.
pub fn parse_due_input(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return midnight_utc(today),
        "tomorrow" => return midnight_utc(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return midnight_utc(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return midnight_utc(today + Duration::weeks(weeks));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    for (day_name, target_day) in weekdays {
        if s == day_name {
            let current = chrono::Datelike::weekday(&today).num_days_from_monday() as i32;
            let days_ahead = (target_day + 7 - current) % 7;
            return midnight_utc(today + Duration::days(days_ahead as i64));
        }
    }

    let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()?;
    midnight_utc(date)
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    let local = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    Some(local.with_timezone(&Utc))
}

/// Format a due date relative to now ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = d.with_timezone(&Local).date_naive()
                - now.with_timezone(&Local).date_naive();
            match days.num_days() {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_gets_unique_ids() {
        let a = Task::new("A".into(), String::new(), None, Priority::Medium, "Personal".into());
        let b = Task::new("B".into(), String::new(), None, Priority::Medium, "Personal".into());
        assert_ne!(a.id, b.id);
        assert!(!a.completed);
    }

    #[test]
    fn overdue_requires_incomplete_and_past_due() {
        let now = Utc::now();
        let mut t = Task::new(
            "A".into(),
            String::new(),
            Some(now - Duration::days(1)),
            Priority::Medium,
            "Personal".into(),
        );
        assert!(t.is_overdue(now));
        t.completed = true;
        assert!(!t.is_overdue(now));
        t.completed = false;
        t.due_date = None;
        assert!(!t.is_overdue(now));
    }

    #[test]
    fn parse_due_accepts_iso_and_relative() {
        assert!(parse_due_input("2030-01-15").is_some());
        assert!(parse_due_input("today").is_some());
        assert!(parse_due_input("in 3d").is_some());
        assert!(parse_due_input("in 2w").is_some());
        assert!(parse_due_input("friday").is_some());
        assert!(parse_due_input("not a date").is_none());
    }

    #[test]
    fn legacy_record_backfills_priority_and_category() {
        // Records written before priority/category existed.
        let json = r#"{
            "id": "x1",
            "title": "old task",
            "description": "",
            "completed": false,
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.category, DEFAULT_CATEGORY);
        assert!(t.due_date.is_none());
    }
}
