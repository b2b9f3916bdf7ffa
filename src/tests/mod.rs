//! Shared test helpers: scripted API fakes, a recording navigator and
//! buffer inspection for rendering assertions.

pub mod fakes;

use ratatui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};

/// Draw once into an in-memory terminal and return the buffer.
pub fn draw<F>(width: u16, height: u16, render: F) -> Buffer
where
    F: FnOnce(&mut Frame),
{
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(render).unwrap();
    terminal.backend().buffer().clone()
}

/// Buffer contents, one string per row.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

/// Whole buffer as one newline-joined string.
pub fn buffer_text(buffer: &Buffer) -> String {
    buffer_lines(buffer).join("\n")
}
