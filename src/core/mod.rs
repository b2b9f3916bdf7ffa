//! Core logic independent of the terminal: API client, list model, routing
//! and logging setup.

pub mod doc_list_model;
pub mod documents;
pub mod logging;
pub mod routing;
