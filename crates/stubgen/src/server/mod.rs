pub(crate) mod commands;
pub(crate) mod handler;
pub(crate) mod state;

pub use commands::{GENERATE_ACCESSORS, GENERATE_DEFINITION, GENERATE_DEFINITIONS_IN_RANGE};
pub use state::StubServer;
