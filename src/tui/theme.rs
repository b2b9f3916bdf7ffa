//! Palette and style helpers for the documents TUI.
//!
//! All colors are RGB truecolor. Views import from here instead of using
//! inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::documents::Role;
use crate::tui::events::NotificationLevel;

// ── Palette ─────────────────────────────────────────────────────────────────

/// Indigo — primary accent, focused borders, headings.
pub const PRIMARY: Color = Color::Rgb(0x3F, 0x51, 0xB5);
/// Light indigo — selected rows, hints.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x79, 0x86, 0xCB);

/// Amber — calls to action ("Create the document", "Add a document").
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);

/// Base background.
pub const BG_BASE: Color = Color::Rgb(0x12, 0x14, 0x1C);

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Style helpers ───────────────────────────────────────────────────────────

/// Level-2 heading (document title).
pub fn heading() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

/// Level-3 heading (card sections).
pub fn subheading() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn error() -> Style {
    Style::default().fg(ERROR)
}

/// A button; focused buttons are drawn reversed.
pub fn button(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BG_BASE)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    }
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn role(role: &Role) -> Style {
    match role {
        Role::Owner => Style::default().fg(ACCENT),
        Role::Admin => Style::default().fg(INFO),
        Role::Member => Style::default().fg(TEXT),
        Role::Other(_) => muted(),
    }
}

pub fn visibility(is_public: bool) -> Style {
    if is_public {
        Style::default().fg(SUCCESS)
    } else {
        Style::default().fg(WARNING)
    }
}

/// Toast badge, bold in the level's color.
pub fn notification(level: NotificationLevel) -> Style {
    let color = match level {
        NotificationLevel::Info => INFO,
        NotificationLevel::Success => SUCCESS,
        NotificationLevel::Warning => WARNING,
        NotificationLevel::Error => ERROR,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// Bordered block whose border follows input focus.
pub fn block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(if focused {
            border_focused()
        } else {
            border_default()
        })
}
