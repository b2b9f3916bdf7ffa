//! Client contract for the documents REST resource.

use async_trait::async_trait;

use super::error::ApiError;
use super::models::{CreateDocument, Document, DocumentId, Page, PageRequest};

/// Operations the panel needs from the backend.
///
/// The HTTP implementation lives in [`super::http`]; views only ever see
/// `Arc<dyn DocumentsApi>` so tests can swap in scripted fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    /// `GET /documents/?page={n}&ordering=-created_at`
    async fn list(&self, request: PageRequest) -> Result<Page, ApiError>;

    /// `POST /documents/`, expecting the created document back.
    async fn create(&self, request: CreateDocument) -> Result<Document, ApiError>;

    /// `GET /documents/{id}/`
    async fn retrieve(&self, id: DocumentId) -> Result<Document, ApiError>;
}
