use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::documents::{ApiError, DocumentsApi, HttpDocumentsClient};
use crate::core::routing::Navigator;

use super::events::AppEvent;

/// Handles to the backend and the router, shared by every view.
///
/// Created once at startup. Views clone the `Arc`s they need into their
/// own state.
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn DocumentsApi>,
    pub navigator: Arc<dyn Navigator>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the HTTP client from config.
    ///
    /// A bad base URL is fatal: nothing works without the documents API.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, ApiError> {
        let client = HttpDocumentsClient::new(&config.api)?;
        log::info!("Documents API at {}", client.base_url());
        Ok(Self::with_api(Arc::new(client), event_tx))
    }

    /// Services around a given client (tests, alternate backends).
    pub fn with_api(
        api: Arc<dyn DocumentsApi>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let navigator = Arc::new(ChannelNavigator::new(event_tx.clone()));
        Self {
            api,
            navigator,
            event_tx,
        }
    }
}

/// Navigator that forwards requests into the TUI event channel, where the
/// app's router picks them up on the next loop turn.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self.tx.send(AppEvent::Navigate(path.to_string())).is_err() {
            log::debug!("Navigation to {path} dropped: event loop gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::documents::DocumentId;

    #[test]
    fn test_navigator_sends_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let navigator = ChannelNavigator::new(tx);
        navigator.navigate("/docs");
        navigator.navigate_to_document(&DocumentId::from("42"));

        assert!(matches!(rx.try_recv(), Ok(AppEvent::Navigate(p)) if p == "/docs"));
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Navigate(p)) if p == "/docs/42"));
    }

    #[test]
    fn test_navigator_survives_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelNavigator::new(tx).navigate("/");
    }

    #[test]
    fn test_init_rejects_bad_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "not a url".to_string();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(Services::init(&config, tx).is_err());
    }
}
