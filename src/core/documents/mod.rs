//! Documents REST resource: wire models, errors and the API client.

pub mod api;
pub mod error;
pub mod http;
pub mod models;

pub use api::DocumentsApi;
pub use error::{ApiError, ListError};
pub use http::HttpDocumentsClient;
pub use models::{
    Access, CreateDocument, Document, DocumentId, DocumentOrdering, Page, PageRequest, Role,
};

#[cfg(test)]
pub use api::MockDocumentsApi;
