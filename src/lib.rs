//! docs-panel - Documents workspace TUI for a collaborative editor.
//!
//! Lists the user's documents page by page, walks through creating a new
//! one, and routes to documents by path.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
