//! Core note store for the notepad workspace.
//! This crate is the single source of truth for the persistence and query
//! boundary.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::StoreDefaults;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Category, Note, NoteFields, NoteId};
pub use service::edit_session::{derive_title, EditSession, EditSessionError, EditState};
pub use store::{
    ChangeEvent, ChangeHub, ChangeSubscription, NoteStore, ProjectedNote, QueryRequest, QueryRows,
    Selector, SqliteNoteStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
