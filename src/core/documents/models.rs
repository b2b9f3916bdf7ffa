//! Wire models for the documents resource.
//!
//! Field names follow the backend's JSON. Fields the list endpoint may omit
//! (`is_public`, `accesses`, `created_at`) decode to their defaults so a
//! sparse payload still renders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque, backend-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ── Access ──────────────────────────────────────────────────────────────────

/// Role granted by an access entry.
///
/// The set is open-ended on the server side; anything we don't know is kept
/// verbatim in `Other` instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::Owner => "Owner",
            Role::Admin => "Administrator",
            Role::Member => "Member",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "owner" => Role::Owner,
            "administrator" | "admin" => Role::Admin,
            "member" => Role::Member,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One user's access to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub id: String,
    pub role: Role,
}

// ── Document ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub accesses: Vec<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    /// True when someone besides the presumptive owner was granted access.
    pub fn has_collaborators(&self) -> bool {
        self.accesses.len() > 1
    }
}

// ── Pagination ──────────────────────────────────────────────────────────────

/// Sort order for the list endpoint. Newest first is the only one offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentOrdering {
    #[default]
    CreatedAtDesc,
}

impl DocumentOrdering {
    pub fn as_query(self) -> &'static str {
        match self {
            DocumentOrdering::CreatedAtDesc => "-created_at",
        }
    }
}

/// Parameters of a single list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    pub ordering: DocumentOrdering,
}

impl PageRequest {
    /// Page numbers are 1-based; 0 is bumped to 1.
    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            ordering: DocumentOrdering::default(),
        }
    }

    pub fn first() -> Self {
        Self::new(1)
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

/// One page of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Total number of documents matching the query, across all pages.
    pub count: usize,
    #[serde(default)]
    pub results: Vec<Document>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

// ── Creation ────────────────────────────────────────────────────────────────

/// Body of `POST /documents/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDocument {
    pub name: String,
    pub is_public: bool,
}
