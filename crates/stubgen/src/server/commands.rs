//! `workspace/executeCommand` handlers.

use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;
use serde_json::{Value, json};
use tower_lsp::{
    jsonrpc,
    lsp_types::{
        ExecuteCommandParams, MessageType, Position, Range, ShowDocumentParams, TextEdit, Url, WorkspaceEdit,
    },
};
use tracing::{debug, info, warn};

use crate::{
    ast::clang::ClangParser,
    config::Settings,
    editor::{Document, Editor, ModifiedBuffer, Workspace},
    server::{handler::prefixed_client_message, state::StubServer},
    stub::{Generator, StubError},
    text_pos::clang_position,
    vfs::normalized_path,
};

pub const GENERATE_DEFINITION: &str = "stubgen.generateDefinition";
pub const GENERATE_DEFINITIONS_IN_RANGE: &str = "stubgen.generateDefinitionsInRange";
pub const GENERATE_ACCESSORS: &str = "stubgen.generateAccessors";

pub(crate) const COMMANDS: [&str; 3] = [GENERATE_DEFINITION, GENERATE_DEFINITIONS_IN_RANGE, GENERATE_ACCESSORS];

/// The single argument object every command takes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommandArgs {
    pub(crate) uri: Url,
    #[serde(default)]
    pub(crate) position: Option<Position>,
    #[serde(default)]
    pub(crate) range: Option<Range>,
    #[serde(default)]
    pub(crate) force_inline: bool,
    #[serde(default)]
    pub(crate) force_overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandKind {
    Definition,
    DefinitionsInRange,
    Accessors,
}

impl CommandKind {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            GENERATE_DEFINITION => Some(Self::Definition),
            GENERATE_DEFINITIONS_IN_RANGE => Some(Self::DefinitionsInRange),
            GENERATE_ACCESSORS => Some(Self::Accessors),
            _ => None,
        }
    }
}

/// What a command did to the in-memory workspace.
#[derive(Debug)]
pub(crate) struct CommandOutcome {
    pub(crate) result: Result<Value, StubError>,
    pub(crate) modified: Vec<ModifiedBuffer>,
    /// Buffer and 1-based line the cursor ended up on.
    pub(crate) focus: Option<(PathBuf, u32)>,
}

pub(crate) fn parse_command(
    params: &ExecuteCommandParams,
) -> std::result::Result<(CommandKind, CommandArgs), String> {
    let kind = CommandKind::from_name(&params.command).ok_or_else(|| format!("unknown command {}", params.command))?;
    let arg = params.arguments.first().cloned().ok_or_else(|| format!("{} expects one argument", params.command))?;
    let args: CommandArgs = serde_json::from_value(arg).map_err(|err| format!("invalid arguments: {err}"))?;
    match kind {
        CommandKind::DefinitionsInRange if args.range.is_none() => Err("missing `range`".to_owned()),
        CommandKind::Definition | CommandKind::Accessors if args.position.is_none() => {
            Err("missing `position`".to_owned())
        },
        _ => Ok((kind, args)),
    }
}

/// Run one command against a snapshot of the open documents.
///
/// Blocking: spawns the AST toolchain.
pub(crate) fn run_command(
    kind: CommandKind,
    args: &CommandArgs,
    path: PathBuf,
    settings: &Settings,
    documents: Vec<Document>,
) -> CommandOutcome {
    let path = normalized_path(&path);
    let text = documents.iter().find(|doc| doc.path == path).map(|doc| doc.text.clone()).unwrap_or_default();
    let start = args.position.or(args.range.map(|range| range.start)).unwrap_or_default();
    let cursor = clang_position(&text, start);

    let mut workspace = Workspace::from_documents(&path, cursor, documents);
    let generator = Generator::new(ClangParser::new(settings.compiler.clone()), settings.generation.clone());

    let result = match kind {
        CommandKind::Definition => generator
            .generate_at_cursor(&mut workspace, args.force_inline, args.force_overwrite)
            .map(|insertion| json!({ "file": insertion.file, "line": insertion.line, "lines": insertion.lines.len() })),
        CommandKind::DefinitionsInRange => {
            let end = args.range.map_or(start, |range| range.end);
            generator
                .generate_for_line_range(
                    &mut workspace,
                    start.line + 1,
                    end.line + 1,
                    args.force_inline,
                    args.force_overwrite,
                )
                .map(|report| {
                    let failures: Vec<Value> = report
                        .failures
                        .iter()
                        .map(|failure| json!({ "line": failure.line, "message": failure.error.to_string() }))
                        .collect();
                    json!({
                        "inserted": report.insertions.len(),
                        "skipped": report.skipped,
                        "failures": failures,
                    })
                })
        },
        CommandKind::Accessors => generator
            .generate_accessors_at_cursor(&mut workspace)
            .map(|insertion| json!({ "file": insertion.file, "line": insertion.line, "lines": insertion.lines })),
    };

    let modified = workspace.modified();
    let focus = (!modified.is_empty()).then(|| (workspace.current_file_name(), workspace.cursor_position().0));

    CommandOutcome {
        result,
        modified,
        focus,
    }
}

/// One edit per buffer, replacing its whole original text.
pub(crate) fn workspace_edit(modified: &[ModifiedBuffer]) -> WorkspaceEdit {
    let mut changes: HashMap<Url, Vec<TextEdit>> = HashMap::new();
    for buffer in modified {
        let Ok(uri) = Url::from_file_path(&buffer.path) else {
            continue;
        };
        changes.insert(uri, vec![TextEdit::new(full_range(&buffer.original), buffer.text.clone())]);
    }
    WorkspaceEdit::new(changes)
}

/// Range covering all of `text`.
pub(crate) fn full_range(text: &str) -> Range {
    let last_line = text.split('\n').count().saturating_sub(1) as u32;
    let last_len = text.rsplit('\n').next().map_or(0, |tail| tail.encode_utf16().count() as u32);
    Range::new(Position::new(0, 0), Position::new(last_line, last_len))
}

impl StubServer {
    pub(crate) async fn execute_stub_command(
        &self,
        params: ExecuteCommandParams,
    ) -> jsonrpc::Result<Option<Value>> {
        let (kind, args) = parse_command(&params).map_err(jsonrpc::Error::invalid_params)?;
        let path = args
            .uri
            .to_file_path()
            .map_err(|_| jsonrpc::Error::invalid_params(format!("not a file URI: {}", args.uri)))?;

        let settings = self.settings_snapshot().await;
        let documents = self.document_store.snapshot();
        debug!("[command] {} on {}", params.command, path.display());

        let job_settings = settings.clone();
        let outcome =
            tokio::task::spawn_blocking(move || run_command(kind, &args, path, &job_settings, documents)).await;
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("[command] {} panicked: {err}", params.command);
                return Err(jsonrpc::Error::internal_error());
            },
        };

        if !outcome.modified.is_empty() {
            let edit = workspace_edit(&outcome.modified);
            match self.client.apply_edit(edit).await {
                Ok(response) if response.applied => {},
                Ok(response) => warn!("[command] edit rejected: {:?}", response.failure_reason),
                Err(err) => warn!("[command] applyEdit failed: {err}"),
            }
        }
        if let Some((file, line)) = &outcome.focus
            && let Ok(uri) = Url::from_file_path(file)
        {
            let at = Position::new(line.saturating_sub(1), 0);
            let show = ShowDocumentParams {
                uri,
                external: None,
                take_focus: Some(true),
                selection: Some(Range::new(at, at)),
            };
            if let Err(err) = self.client.show_document(show).await {
                debug!("[command] showDocument failed: {err}");
            }
        }

        match outcome.result {
            Ok(value) => {
                info!("[command] {} done: {value}", params.command);
                if settings.logging.level.allows_info() {
                    self.client
                        .log_message(MessageType::INFO, prefixed_client_message(format!("{} done", params.command)))
                        .await;
                }
                Ok(Some(value))
            },
            Err(err) => {
                let severity = match err {
                    StubError::Toolchain { .. } | StubError::Io(_) => MessageType::ERROR,
                    _ => MessageType::WARNING,
                };
                info!("[command] {} failed: {err}", params.command);
                self.client.show_message(severity, prefixed_client_message(err.to_string())).await;
                Ok(None)
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/server/commands_tests.rs"]
mod tests;
