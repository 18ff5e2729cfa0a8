//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Used for high-priority rows.
pub const HIGH_RED: Color = Color::Rgb(200, 60, 60);
/// Used for medium-priority rows.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for low-priority rows.
pub const SOFT_GREEN: Color = Color::Rgb(110, 170, 110);
/// Used for completed rows and de-emphasised text.
pub const DIM_GREY: Color = Color::Rgb(120, 120, 120);
/// Used for the overdue badge.
pub const ALERT_RED: Color = Color::Rgb(220, 40, 40);
