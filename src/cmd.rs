//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers, from session management
//! and task CRUD operations to the filtered list view and the TUI
//! dashboard launcher.

use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::Utc;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::db::Database;
use crate::fields::*;
use crate::session::Session;
use crate::task::{format_due_relative, parse_due_input, Task, DEFAULT_CATEGORY};
use crate::tui::run::run_tui;
use crate::view::{overdue_count, task_counts, visible_tasks};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in under a username (no password, just a nickname).
    Login {
        /// Username to log in as.
        name: String,
    },

    /// Log out and clear the stored username.
    Logout,

    /// Show the currently logged-in username.
    Whoami,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd", or a weekday.
        #[arg(long)]
        due: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category label. New labels are registered automatically.
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Edit fields on a task. Unspecified fields keep their current values.
    Edit {
        /// Task id (or unique prefix) or exact title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Due date input, same formats as `add`.
        #[arg(long)]
        due: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear_due: bool,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Toggle a task between pending and completed.
    Toggle {
        /// Task id (or unique prefix) or exact title.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task id (or unique prefix) or exact title.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// List tasks through the view pipeline.
    List {
        /// Completion-state filter.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Case-insensitive substring match on title, description, or category.
        #[arg(long)]
        search: Option<String>,
        /// Exact category filter.
        #[arg(long)]
        category: Option<String>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::CreatedAt)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List registered categories in first-seen order.
    Categories,

    /// Show task counts: all, completed, pending, overdue.
    Stats,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Launch the dashboard TUI.
    Ui,
}

impl Commands {
    /// Commands usable without a logged-in session.
    pub fn requires_login(&self) -> bool {
        !matches!(self, Commands::Login { .. } | Commands::Completions { .. })
    }
}

/// Log in, rejecting empty names.
pub fn cmd_login(session: &mut Session, name: &str) {
    if let Some(current) = session.username() {
        println!("Already logged in as {current}; switching.");
    }
    if session.login(name) {
        println!("Logged in as {}.", session.username().unwrap_or_default());
    } else {
        eprintln!("Username cannot be empty.");
        std::process::exit(1);
    }
}

/// Log out and clear the stored username.
pub fn cmd_logout(session: &mut Session) {
    session.logout();
    println!("Logged out.");
}

/// Print the current username.
pub fn cmd_whoami(session: &Session) {
    match session.username() {
        Some(name) => println!("{name}"),
        None => println!("Not logged in."),
    }
}

/// Add a new task to the store.
pub fn cmd_add(
    db: &mut Database,
    title: String,
    desc: String,
    due: Option<String>,
    priority: Priority,
    category: String,
) {
    let due_date = match due.as_deref() {
        Some(input) => match parse_due_input(input) {
            Some(d) => Some(d),
            None => {
                eprintln!("Unrecognised due date: {input}");
                std::process::exit(1);
            }
        },
        None => None,
    };
    match db.add_task(&title, &desc, due_date, priority, &category) {
        Some(task) => println!("Added task {}", short_id(&task.id)),
        None => {
            eprintln!("Title cannot be empty.");
            std::process::exit(1);
        }
    }
}

/// Edit a task, filling unspecified fields from the existing record.
pub fn cmd_edit(
    db: &mut Database,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
    category: Option<String>,
) {
    let task_id = resolve_or_exit(db, &id);
    let Some(current) = db.get(&task_id).cloned() else {
        eprintln!("Task {} not found.", short_id(&task_id));
        std::process::exit(1);
    };

    let due_date = if clear_due {
        None
    } else {
        match due.as_deref() {
            Some(input) => match parse_due_input(input) {
                Some(d) => Some(d),
                None => {
                    eprintln!("Unrecognised due date: {input}");
                    std::process::exit(1);
                }
            },
            None => current.due_date,
        }
    };

    let applied = db.edit_task(
        &task_id,
        title.as_deref().unwrap_or(&current.title),
        desc.as_deref().unwrap_or(&current.description),
        due_date,
        priority.unwrap_or(current.priority),
        category.as_deref().unwrap_or(&current.category),
    );
    if applied {
        println!("Updated task {}", short_id(&task_id));
    } else {
        eprintln!("Title cannot be empty.");
        std::process::exit(1);
    }
}

/// Toggle completion on a task.
pub fn cmd_toggle(db: &mut Database, id: String) {
    let task_id = resolve_or_exit(db, &id);
    db.toggle_complete(&task_id);
    let state = match db.get(&task_id) {
        Some(t) if t.completed => "completed",
        _ => "pending",
    };
    println!("Task {} is now {state}.", short_id(&task_id));
}

/// Delete a task, confirming on stdin unless --yes was passed.
pub fn cmd_delete(db: &mut Database, id: String, yes: bool) {
    let task_id = resolve_or_exit(db, &id);
    let title = db.get(&task_id).map(|t| t.title.clone()).unwrap_or_default();

    if !yes {
        print!("Delete \"{title}\"? [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err()
            || !matches!(answer.trim(), "y" | "Y" | "yes")
        {
            println!("Aborted.");
            return;
        }
    }

    if db.delete_task(&task_id) {
        println!("Deleted task {}", short_id(&task_id));
    }
}

/// List tasks after running them through the view pipeline.
pub fn cmd_list(
    db: &Database,
    status: StatusFilter,
    search: Option<String>,
    category: Option<String>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let now = Utc::now();
    let visible = visible_tasks(
        db.tasks(),
        status,
        search.as_deref().unwrap_or(""),
        category.as_deref().unwrap_or(""),
        sort,
    );

    let counts = task_counts(db.tasks());
    let overdue = overdue_count(db.tasks(), now);
    println!(
        "{} pending, {} completed, {} overdue (showing {}, sorted by {})",
        counts.pending,
        counts.completed,
        overdue,
        format_status_filter(status),
        format_sort_key(sort),
    );

    let rows = limit.unwrap_or(usize::MAX);
    print_table(visible.iter().take(rows).copied());
}

/// List the category registry in insertion order.
pub fn cmd_categories(db: &Database) {
    for c in db.categories() {
        println!("{c}");
    }
}

/// Print task counts over the full collection.
pub fn cmd_stats(db: &Database) {
    let counts = task_counts(db.tasks());
    let overdue = overdue_count(db.tasks(), Utc::now());
    println!("{:<10} {}", "all", counts.all);
    println!("{:<10} {}", "completed", counts.completed);
    println!("{:<10} {}", "pending", counts.pending);
    println!("{:<10} {}", "overdue", overdue);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Launch the dashboard terminal user interface.
pub fn cmd_ui(dir: &Path, username: &str) {
    if let Err(e) = run_tui(dir, username) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print tasks in a fixed-width table.
fn print_table<'a>(tasks: impl Iterator<Item = &'a Task>) {
    println!(
        "{:<9} {:<3} {:<8} {:<10} {:<12} {}",
        "ID", "", "Pri", "Due", "Category", "Title"
    );
    let now = Utc::now();
    for t in tasks {
        let mark = if t.completed { "[x]" } else { "[ ]" };
        println!(
            "{:<9} {:<3} {:<8} {:<10} {:<12} {}",
            short_id(&t.id),
            mark,
            format_priority(t.priority),
            format_due_relative(t.due_date, now),
            truncate(&t.category, 12),
            t.title,
        );
    }
}

/// Shortened id used for display and prefix lookup.
fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

/// Resolve a task identifier (id, unique id prefix, or exact title) to a
/// full task id, or exit with an error message.
fn resolve_or_exit(db: &Database, identifier: &str) -> String {
    match resolve_task_identifier(db, identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Resolve a task identifier to a task id.
/// Returns an error when nothing matches or the match is ambiguous.
pub fn resolve_task_identifier(db: &Database, identifier: &str) -> Result<String, String> {
    if let Some(task) = db.get(identifier) {
        return Ok(task.id.clone());
    }

    let prefix_matches: Vec<&Task> = db
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(identifier))
        .collect();
    if prefix_matches.len() == 1 {
        return Ok(prefix_matches[0].id.clone());
    }
    if prefix_matches.len() > 1 {
        return Err(format!(
            "Id prefix '{identifier}' is ambiguous ({} matches). Use more characters.",
            prefix_matches.len()
        ));
    }

    let title_matches: Vec<&Task> = db
        .tasks()
        .iter()
        .filter(|t| t.title.to_lowercase() == identifier.to_lowercase())
        .collect();
    match title_matches.len() {
        0 => Err(format!("No task found matching '{identifier}'")),
        1 => Ok(title_matches[0].id.clone()),
        _ => {
            let mut msg = format!("Multiple tasks titled '{identifier}':\n");
            for task in title_matches {
                msg.push_str(&format!("  {}: {}\n", short_id(&task.id), task.title));
            }
            msg.push_str("Please use the id instead.");
            Err(msg)
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    #[test]
    fn resolve_by_prefix_and_title() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::load(dir.path());
        db.add_task("Buy milk", "", None, Priority::Low, "Shopping");
        db.add_task("Buy eggs", "", None, Priority::Low, "Shopping");
        let full_id = db.tasks()[0].id.clone();

        assert_eq!(resolve_task_identifier(&db, &full_id).unwrap(), full_id);
        assert_eq!(resolve_task_identifier(&db, &full_id[..8]).unwrap(), full_id);
        let by_title = resolve_task_identifier(&db, "buy milk").unwrap();
        assert_eq!(db.get(&by_title).unwrap().title, "Buy milk");
        assert!(resolve_task_identifier(&db, "nothing here").is_err());
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 12), "short");
        assert_eq!(truncate("a much longer label", 8), "a much …");
    }
}
