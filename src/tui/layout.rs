//! Root layout: documents panel + main content + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the closed panel strip (holds the open toggle).
pub const PANEL_CLOSED_WIDTH: u16 = 3;
/// Narrowest main area we leave when the panel is open.
pub const MIN_MAIN_WIDTH: u16 = 30;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    pub panel: Rect,
    pub main: Rect,
    /// Bottom row.
    pub status: Rect,
}

impl AppLayout {
    /// Split the terminal. An open panel shrinks to leave the main area at
    /// least `MIN_MAIN_WIDTH` columns; it never disappears entirely.
    pub fn compute(area: Rect, panel_open: bool, panel_width: u16) -> Self {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Panel + main
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let content = rows[0];
        let status = rows[1];

        let width = if panel_open {
            panel_width
                .min(content.width.saturating_sub(MIN_MAIN_WIDTH))
                .max(PANEL_CLOSED_WIDTH)
        } else {
            PANEL_CLOSED_WIDTH
        };

        let cols =
            Layout::horizontal([Constraint::Length(width), Constraint::Min(1)]).split(content);

        AppLayout {
            panel: cols[0],
            main: cols[1],
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_panel_width() {
        let layout = AppLayout::compute(Rect::new(0, 0, 120, 40), true, 36);
        assert_eq!(layout.panel.width, 36);
        assert_eq!(layout.main.width, 84);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.panel.height, 39);
    }

    #[test]
    fn test_closed_panel_is_a_strip() {
        let layout = AppLayout::compute(Rect::new(0, 0, 120, 40), false, 36);
        assert_eq!(layout.panel.width, PANEL_CLOSED_WIDTH);
        assert_eq!(layout.main.width, 117);
    }

    #[test]
    fn test_narrow_terminal_shrinks_panel() {
        let layout = AppLayout::compute(Rect::new(0, 0, 50, 20), true, 36);
        assert_eq!(layout.panel.width, 20);
        assert_eq!(layout.main.width, 30);
    }

    #[test]
    fn test_panel_plus_main_fills_width() {
        let area = Rect::new(0, 0, 100, 30);
        for open in [true, false] {
            let layout = AppLayout::compute(area, open, 36);
            assert_eq!(layout.panel.width + layout.main.width, area.width);
        }
    }
}
