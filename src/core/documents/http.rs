//! reqwest-backed [`DocumentsApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::DocumentsApi;
use super::error::ApiError;
use super::models::{CreateDocument, Document, DocumentId, Page, PageRequest};
use crate::config::ApiConfig;

const DOCUMENTS_PATH: &str = "documents/";

/// HTTP client for the documents endpoints under a configured base URL.
#[derive(Clone)]
pub struct HttpDocumentsClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpDocumentsClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        // Without the trailing slash `join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn list_url(&self, request: PageRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(DOCUMENTS_PATH)?;
        url.query_pairs_mut()
            .append_pair("page", &request.page().to_string())
            .append_pair("ordering", request.ordering.as_query());
        Ok(url)
    }

    fn detail_url(&self, id: &DocumentId) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(DOCUMENTS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id.as_str())
            .push("");
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::server(status.as_u16()));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentsApi for HttpDocumentsClient {
    #[instrument(skip(self))]
    async fn list(&self, request: PageRequest) -> Result<Page, ApiError> {
        let url = self.list_url(request)?;
        log::debug!("GET {url}");
        let response = self.request(Method::GET, url).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, request))]
    async fn create(&self, request: CreateDocument) -> Result<Document, ApiError> {
        let url = self.base_url.join(DOCUMENTS_PATH)?;
        log::debug!("POST {url} name={:?} is_public={}", request.name, request.is_public);
        let response = self.request(Method::POST, url).json(&request).send().await?;
        if response.status() != StatusCode::CREATED && response.status().is_success() {
            log::warn!("Document creation answered {} instead of 201", response.status());
        }
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn retrieve(&self, id: DocumentId) -> Result<Document, ApiError> {
        let url = self.detail_url(&id)?;
        log::debug!("GET {url}");
        let response = self.request(Method::GET, url).send().await?;
        Self::decode(response).await
    }
}
