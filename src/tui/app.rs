//! Main application logic for the dashboard terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, and renders the dashboard: a task table driven by
//! the view pipeline, filter/sort/search controls, a quick-add prompt, and
//! a delete confirmation dialog.

use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

use crate::db::Database;
use crate::fields::*;
use crate::task::{format_due_relative, DEFAULT_CATEGORY};
use crate::tui::colors::{ALERT_RED, DIM_GREY, GOLD, HIGH_RED, SOFT_GREEN};
use crate::view::{overdue_count, task_counts, visible_tasks};

/// Input mode for the dashboard.
#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    Search,
    AddTitle,
    ConfirmDelete,
}

/// Main application state for the dashboard TUI.
///
/// Holds the database, the active filter/search/sort selections, and the
/// derived list of visible task ids, recomputed through the view pipeline
/// after every input event.
pub struct App {
    db: Database,
    username: String,
    table_state: TableState,
    visible: Vec<String>,
    mode: Mode,
    status_filter: StatusFilter,
    sort_key: SortKey,
    search: String,
    input: String,
    // None: all categories; Some(i): index into the registry.
    category_index: Option<usize>,
    pending_delete: Option<String>,
    status_message: String,
    should_quit: bool,
}

impl App {
    /// Create a new App instance, loading the database from the data directory.
    pub fn new(dir: &Path, username: &str) -> Self {
        let db = Database::load(dir);
        let mut app = App {
            db,
            username: username.to_string(),
            table_state: TableState::default(),
            visible: Vec::new(),
            mode: Mode::Normal,
            status_filter: StatusFilter::All,
            sort_key: SortKey::CreatedAt,
            search: String::new(),
            input: String::new(),
            category_index: None,
            pending_delete: None,
            status_message: String::new(),
            should_quit: false,
        };
        app.refresh_visible();
        app
    }

    /// Main event loop: draw, poll, handle.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    /// Re-run the view pipeline and keep the selection in bounds.
    fn refresh_visible(&mut self) {
        let category = self.selected_category().unwrap_or_default();
        self.visible = visible_tasks(
            self.db.tasks(),
            self.status_filter,
            &self.search,
            &category,
            self.sort_key,
        )
        .into_iter()
        .map(|t| t.id.clone())
        .collect();

        if self.visible.is_empty() {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0);
            self.table_state.select(Some(selected.min(self.visible.len() - 1)));
        }
    }

    fn selected_category(&self) -> Option<String> {
        self.category_index
            .and_then(|i| self.db.categories().get(i).cloned())
    }

    fn selected_task_id(&self) -> Option<String> {
        self.table_state
            .selected()
            .and_then(|i| self.visible.get(i).cloned())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.mode {
            Mode::Normal => self.handle_normal_key(code),
            Mode::Search => self.handle_search_key(code),
            Mode::AddTitle => self.handle_add_key(code),
            Mode::ConfirmDelete => self.handle_confirm_key(code),
        }
        self.refresh_visible();
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        self.status_message.clear();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task_id() {
                    self.db.toggle_complete(&id);
                }
            }
            KeyCode::Char('f') => {
                self.status_filter = match self.status_filter {
                    StatusFilter::All => StatusFilter::Pending,
                    StatusFilter::Pending => StatusFilter::Completed,
                    StatusFilter::Completed => StatusFilter::All,
                };
            }
            KeyCode::Char('s') => {
                self.sort_key = match self.sort_key {
                    SortKey::CreatedAt => SortKey::DueDate,
                    SortKey::DueDate => SortKey::Priority,
                    SortKey::Priority => SortKey::Title,
                    SortKey::Title => SortKey::CreatedAt,
                };
            }
            KeyCode::Char('c') => {
                // Cycle: all -> each registered category -> all.
                let count = self.db.categories().len();
                self.category_index = match self.category_index {
                    None if count > 0 => Some(0),
                    Some(i) if i + 1 < count => Some(i + 1),
                    _ => None,
                };
            }
            KeyCode::Char('/') => {
                self.input = self.search.clone();
                self.mode = Mode::Search;
            }
            KeyCode::Char('x') => self.search.clear(),
            KeyCode::Char('a') => {
                self.input.clear();
                self.mode = Mode::AddTitle;
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task_id() {
                    self.pending_delete = Some(id);
                    self.mode = Mode::ConfirmDelete;
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.search = self.input.clone();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.input.pop();
                // Live filtering while typing.
                self.search = self.input.clone();
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
                self.search = self.input.clone();
            }
            _ => {}
        }
    }

    fn handle_add_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let title = self.input.trim().to_string();
                if self.db
                    .add_task(&title, "", None, Priority::Medium, DEFAULT_CATEGORY)
                    .is_some()
                {
                    self.status_message = format!("Added \"{title}\"");
                    self.table_state.select(Some(0));
                } else {
                    self.status_message = "Title cannot be empty".into();
                }
                self.input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => self.input.push(ch),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.pending_delete.take() {
                    self.db.delete_task(&id);
                    self.status_message = "Task deleted".into();
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i64) {
        if self.visible.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let last = self.visible.len() as i64 - 1;
        let next = (current + delta).clamp(0, last);
        self.table_state.select(Some(next as usize));
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Length(1), // controls
                Constraint::Min(3),    // table
                Constraint::Length(1), // footer / input
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_controls(f, chunks[1]);
        self.render_table(f, chunks[2]);
        self.render_footer(f, chunks[3]);

        if self.mode == Mode::ConfirmDelete {
            self.render_confirm(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let counts = task_counts(self.db.tasks());
        let overdue = overdue_count(self.db.tasks(), Utc::now());

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.username),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "· {} tasks · {} pending · {} completed ",
                counts.all, counts.pending, counts.completed
            )),
        ];
        if overdue > 0 {
            spans.push(Span::styled(
                format!("· {overdue} overdue "),
                Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD),
            ));
        }

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(" Task Dashboard "));
        f.render_widget(header, area);
    }

    fn render_controls(&self, f: &mut Frame, area: Rect) {
        let category = self
            .selected_category()
            .unwrap_or_else(|| "all".to_string());
        let search = if self.search.is_empty() { "-" } else { self.search.as_str() };
        let line = Line::from(vec![
            Span::raw(format!(" filter: {} ", format_status_filter(self.status_filter))),
            Span::styled("· ", Style::default().fg(DIM_GREY)),
            Span::raw(format!("sort: {} ", format_sort_key(self.sort_key))),
            Span::styled("· ", Style::default().fg(DIM_GREY)),
            Span::raw(format!("category: {category} ")),
            Span::styled("· ", Style::default().fg(DIM_GREY)),
            Span::raw(format!("search: {search}")),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let now = Utc::now();
        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|id| self.db.get(id))
            .map(|t| {
                let mark = if t.completed { "[x]" } else { "[ ]" };
                let style = if t.completed {
                    Style::default().fg(DIM_GREY).add_modifier(Modifier::CROSSED_OUT)
                } else if t.is_overdue(now) {
                    Style::default().fg(ALERT_RED)
                } else {
                    Style::default().fg(priority_color(t.priority))
                };
                Row::new(vec![
                    mark.to_string(),
                    format_priority(t.priority).to_string(),
                    format_due_relative(t.due_date, now),
                    t.category.clone(),
                    t.title.clone(),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
        )
        .header(
            Row::new(vec!["", "Pri", "Due", "Category", "Title"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let line = match self.mode {
            Mode::Search => format!(" search: {}_", self.input),
            Mode::AddTitle => format!(" new task title: {}_", self.input),
            _ if !self.status_message.is_empty() => format!(" {}", self.status_message),
            _ => " a add · space toggle · d delete · f filter · s sort · c category · / search · x clear · q quit".to_string(),
        };
        f.render_widget(
            Paragraph::new(line).style(Style::default().fg(DIM_GREY)),
            area,
        );
    }

    fn render_confirm(&self, f: &mut Frame) {
        let title = self
            .pending_delete
            .as_deref()
            .and_then(|id| self.db.get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();
        let area = centered_rect(50, 20, f.area());
        let popup = Paragraph::new(format!("Delete \"{title}\"? (y/n)"))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Confirm "));
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => HIGH_RED,
        Priority::Medium => GOLD,
        Priority::Low => SOFT_GREEN,
    }
}

/// Create a centered rect using a percentage of the available area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
