//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ratatui::{backend::TestBackend, Terminal};
use tokio::sync::mpsc;

use docs_panel::config::AppConfig;
use docs_panel::core::documents::{
    Access, ApiError, CreateDocument, Document, DocumentId, DocumentsApi, Page, PageRequest, Role,
};
use docs_panel::tui::app::AppState;
use docs_panel::tui::services::Services;

/// In-memory documents backend: creation prepends to the stored list and
/// pages are cut from it, newest first.
pub struct InMemoryApi {
    documents: Mutex<VecDeque<Document>>,
    page_size: usize,
    next_id: Mutex<u32>,
    pub list_calls: Mutex<Vec<u32>>,
    pub create_calls: Mutex<Vec<CreateDocument>>,
}

impl InMemoryApi {
    pub fn new(page_size: usize) -> Self {
        Self {
            documents: Mutex::new(VecDeque::new()),
            page_size,
            next_id: Mutex::new(0),
            list_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_documents(self, docs: Vec<Document>) -> Self {
        self.documents.lock().unwrap().extend(docs);
        self
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
    }

    pub fn list_pages(&self) -> Vec<u32> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentsApi for InMemoryApi {
    async fn list(&self, request: PageRequest) -> Result<Page, ApiError> {
        self.list_calls.lock().unwrap().push(request.page());
        let docs = self.documents.lock().unwrap();
        let start = (request.page() as usize - 1) * self.page_size;
        if start > docs.len() {
            return Err(ApiError::server(404));
        }
        let results: Vec<Document> = docs.iter().skip(start).take(self.page_size).cloned().collect();
        let next = (start + results.len() < docs.len())
            .then(|| format!("?page={}", request.page() + 1));
        Ok(Page {
            count: docs.len(),
            results,
            next,
            previous: None,
        })
    }

    async fn create(&self, request: CreateDocument) -> Result<Document, ApiError> {
        self.create_calls.lock().unwrap().push(request.clone());
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let doc = Document {
            id: DocumentId::from(format!("created-{next_id}")),
            name: request.name,
            is_public: request.is_public,
            accesses: vec![owner_access(*next_id)],
            created_at: None,
        };
        self.documents.lock().unwrap().push_front(doc.clone());
        Ok(doc)
    }

    async fn retrieve(&self, id: DocumentId) -> Result<Document, ApiError> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(ApiError::server(404))
    }
}

fn owner_access(n: u32) -> Access {
    Access {
        id: format!("access-{n}"),
        role: Role::Owner,
    }
}

pub fn document(id: &str, name: &str, roles: &[Role]) -> Document {
    Document {
        id: DocumentId::from(id),
        name: name.to_string(),
        is_public: false,
        accesses: roles
            .iter()
            .enumerate()
            .map(|(i, role)| Access {
                id: format!("{id}-{i}"),
                role: role.clone(),
            })
            .collect(),
        created_at: None,
    }
}

pub fn app(api: Arc<InMemoryApi>, start: &str) -> AppState {
    let (tx, rx) = mpsc::unbounded_channel();
    let services = Services::with_api(api, tx);
    AppState::new(&AppConfig::default(), start, services, rx)
}

/// Render the whole app and return the screen as text.
pub fn screen(app: &AppState, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
