//! Hand-written fakes for ordering and scripting scenarios that are awkward
//! to express with mockall expectations.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::core::documents::{
    ApiError, CreateDocument, Document, DocumentId, DocumentsApi, Page, PageRequest,
};
use crate::core::routing::Navigator;

// ============================================================================
// Scripted API
// ============================================================================

/// Answers from queues filled up front. An empty queue answers with a
/// network error so a missing script shows up as a failed fetch.
#[derive(Default)]
pub struct ScriptedApi {
    lists: Mutex<VecDeque<Result<Page, ApiError>>>,
    creates: Mutex<VecDeque<Result<Document, ApiError>>>,
    documents: Mutex<HashMap<String, Result<Document, ApiError>>>,
    list_calls: Mutex<Vec<u32>>,
    create_calls: Mutex<Vec<CreateDocument>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, response: Result<Page, ApiError>) -> Self {
        self.lists.lock().unwrap().push_back(response);
        self
    }

    pub fn with_create(self, response: Result<Document, ApiError>) -> Self {
        self.creates.lock().unwrap().push_back(response);
        self
    }

    pub fn with_document(self, id: &str, response: Result<Document, ApiError>) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(id.to_string(), response);
        self
    }

    pub fn list_pages(&self) -> Vec<u32> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<CreateDocument> {
        self.create_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentsApi for ScriptedApi {
    async fn list(&self, request: PageRequest) -> Result<Page, ApiError> {
        self.list_calls.lock().unwrap().push(request.page());
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted list response".into())))
    }

    async fn create(&self, request: CreateDocument) -> Result<Document, ApiError> {
        self.create_calls.lock().unwrap().push(request);
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted create response".into())))
    }

    async fn retrieve(&self, id: DocumentId) -> Result<Document, ApiError> {
        self.documents
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .unwrap_or(Err(ApiError::server(404)))
    }
}

// ============================================================================
// Gated API
// ============================================================================

/// List calls block until the test releases the matching gate, in call order.
pub struct GatedApi {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<Page, ApiError>>>>,
}

impl GatedApi {
    pub fn new(calls: usize) -> (Self, Vec<oneshot::Sender<Result<Page, ApiError>>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..calls).map(|_| oneshot::channel()).unzip();
        (
            Self {
                gates: Mutex::new(receivers),
            },
            senders,
        )
    }
}

#[async_trait]
impl DocumentsApi for GatedApi {
    async fn list(&self, _request: PageRequest) -> Result<Page, ApiError> {
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("gate dropped".into()))),
            None => Err(ApiError::Network("no gate left".into())),
        }
    }

    async fn create(&self, _request: CreateDocument) -> Result<Document, ApiError> {
        Err(ApiError::server(405))
    }

    async fn retrieve(&self, _id: DocumentId) -> Result<Document, ApiError> {
        Err(ApiError::server(404))
    }
}

// ============================================================================
// Recording navigator
// ============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}
