use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::Client;

use crate::{config::Settings, editor::DocumentStore};

/// The stubgen backend that implements the Language Server Protocol.
pub struct StubServer {
    /// The LSP client handle, used to push edits and messages back.
    pub(crate) client: Client,

    /// Thread-safe store of all open documents.
    pub(crate) document_store: Arc<DocumentStore>,

    /// Runtime settings: `stubgen.toml`, then LSP configuration on top.
    pub(crate) settings: Arc<RwLock<Settings>>,
}

impl StubServer {
    /// Create a new `StubServer` wired to the given LSP client.
    pub fn new(client: Client) -> Self {
        Self::with_settings(client, Settings::default())
    }

    /// Create a server whose settings start from `settings` instead of the
    /// defaults, e.g. a `--config` file given on the command line.
    pub fn with_settings(
        client: Client,
        settings: Settings,
    ) -> Self {
        Self {
            client,
            document_store: Arc::new(DocumentStore::new()),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub(crate) async fn settings_snapshot(&self) -> Settings {
        self.settings.read().await.clone()
    }

    pub(crate) async fn apply_settings(
        &self,
        settings: Settings,
    ) {
        *self.settings.write().await = settings;
    }
}
