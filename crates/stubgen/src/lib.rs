pub mod ast;
pub mod config;
pub mod editor;
pub mod server;
pub mod stub;
pub mod text_pos;
pub mod vfs;

pub use ast::clang::ClangParser;
pub use config::Settings;
pub use editor::{Editor, Workspace};
pub use server::StubServer;
pub use stub::{Generator, Insertion, RangeReport, StubError};
