//! Enumerations and field types for task management.
//!
//! This module defines the structured data types used to categorise and
//! organise tasks, plus the filter and sort selectors consumed by the
//! view pipeline.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl Priority {
    /// Numeric rank used for sorting: high outranks medium outranks low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Completion-state filter for task lists.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

/// Format a status filter for display.
pub fn format_status_filter(f: StatusFilter) -> &'static str {
    match f {
        StatusFilter::All => "all",
        StatusFilter::Completed => "completed",
        StatusFilter::Pending => "pending",
    }
}

/// Format a sort key for display.
pub fn format_sort_key(k: SortKey) -> &'static str {
    match k {
        SortKey::CreatedAt => "created",
        SortKey::DueDate => "due",
        SortKey::Priority => "priority",
        SortKey::Title => "title",
    }
}
