use serde_json::Value;
use tower_lsp::{LanguageServer, jsonrpc::Result, lsp_types::*};
use tracing::{debug, info, warn};

use crate::{
    config::find_config,
    server::{commands::COMMANDS, state::StubServer},
};

const CLIENT_NOTIFICATION_PREFIX: &str = "stubgen:";

#[tower_lsp::async_trait]
impl LanguageServer for StubServer {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> Result<InitializeResult> {
        info!("Initializing stubgen...");

        let root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| folder.uri.clone())
            .or(params.root_uri.clone())
            .and_then(|uri| uri.to_file_path().ok());

        let mut settings = self.settings_snapshot().await;
        if let Some(path) = root.as_deref().and_then(find_config) {
            match settings.merged_with_file(&path) {
                Ok(merged) => {
                    info!("Loaded {}", path.display());
                    settings = merged;
                },
                Err(err) => warn!("Ignoring {err}"),
            }
        }
        if let Some(options) = params.initialization_options.as_ref() {
            settings = settings.merged_with_payload(options);
        }
        self.apply_settings(settings).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMANDS.iter().map(|command| command.to_string()).collect(),
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "stubgen".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(
        &self,
        _: InitializedParams,
    ) {
        info!("stubgen initialized");
    }

    async fn did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) {
        let current = self.settings_snapshot().await;
        let merged = current.merged_with_payload(&params.settings);
        if merged == current {
            return;
        }
        self.apply_settings(merged).await;
        info!("Applied updated stubgen settings");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down stubgen");
        Ok(())
    }

    async fn did_open(
        &self,
        params: DidOpenTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let Ok(path) = uri.to_file_path() else {
            debug!("Ignoring non-file document {uri}");
            return;
        };
        info!(
            "Opened {} (v{}, {} bytes)",
            short_name(&uri),
            params.text_document.version,
            params.text_document.text.len()
        );
        self.document_store.open(&path, params.text_document.text, params.text_document.version);
    }

    async fn did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) {
        let Ok(path) = params.text_document.uri.to_file_path() else {
            return;
        };
        self.document_store.apply_changes(&path, params.content_changes, params.text_document.version);
    }

    async fn did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) {
        if let Ok(path) = params.text_document.uri.to_file_path() {
            self.document_store.close(&path);
        }
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<Value>> {
        self.execute_stub_command(params).await
    }
}

fn short_name(uri: &Url) -> String {
    uri.path().rsplit('/').next().unwrap_or(uri.path()).to_owned()
}

pub(crate) fn prefixed_client_message(message: impl AsRef<str>) -> String {
    format!("{CLIENT_NOTIFICATION_PREFIX} {}", message.as_ref())
}
