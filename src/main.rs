//! # TM - Personal Task Manager
//!
//! A file-backed personal task manager with a quick CLI and an interactive
//! dashboard TUI.
//!
//! ## Key Features
//!
//! - **Session by nickname**: log in with a plain username to unlock the
//!   dashboard; no password, no server.
//! - **Task lifecycle**: add, edit, toggle, delete, with priorities,
//!   categories, and optional due dates.
//! - **View pipeline**: combined status filter, live search, category
//!   filter, and stable sorting over the task collection.
//! - **Category registry**: free-text labels, seeded with
//!   Personal/Work/Shopping, growing automatically as tasks introduce new
//!   ones.
//! - **Local JSON storage**: three independent records (tasks, categories,
//!   username) rewritten in full on every change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Log in and add a task
//! tm login alex
//! tm add "Buy milk" --category Shopping --priority low --due tomorrow
//!
//! # List pending tasks sorted by due date
//! tm list --status pending --sort due-date
//!
//! # Launch the dashboard TUI
//! tm ui
//! ```
//!
//! Data is stored locally in `~/.tm/`. Records are shared across usernames;
//! logging in as someone else shows the same task collection.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod session;
pub mod storage;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use db::Database;
use session::Session;

fn main() {
    let cli = Cli::parse();

    // Determine the data directory.
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".tm")
    });
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }

    let mut session = Session::load(&data_dir);

    // Everything except login and completions needs a logged-in session.
    if cli.command.requires_login() && !session.is_logged_in() {
        eprintln!("Not logged in. Run `tm login <name>` first.");
        std::process::exit(1);
    }

    // Session commands do not touch the task records.
    match &cli.command {
        Commands::Login { name } => {
            cmd_login(&mut session, name);
            return;
        }
        Commands::Logout => {
            cmd_logout(&mut session);
            return;
        }
        Commands::Whoami => {
            cmd_whoami(&session);
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        Commands::Ui => {
            let username = session.username().unwrap_or_default().to_string();
            cmd_ui(&data_dir, &username);
            return;
        }
        _ => {}
    }

    let mut db = Database::load(&data_dir);

    match cli.command {
        Commands::Login { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Completions { .. }
        | Commands::Ui => unreachable!("session commands handled above"),

        Commands::Add { title, desc, due, priority, category } =>
            cmd_add(&mut db, title, desc, due, priority, category),

        Commands::Edit { id, title, desc, due, clear_due, priority, category } =>
            cmd_edit(&mut db, id, title, desc, due, clear_due, priority, category),

        Commands::Toggle { id } => cmd_toggle(&mut db, id),

        Commands::Delete { id, yes } => cmd_delete(&mut db, id, yes),

        Commands::List { status, search, category, sort, limit } =>
            cmd_list(&db, status, search, category, sort, limit),

        Commands::Categories => cmd_categories(&db),

        Commands::Stats => cmd_stats(&db),
    }
}
