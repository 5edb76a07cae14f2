//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notepad_core` wiring end to
//!   end: open, insert, query.
//! - Keep output deterministic for quick local sanity checks.

use notepad_core::db::open_db_in_memory;
use notepad_core::{NoteFields, NoteStore, QueryRequest, Selector, SqliteNoteStore, StoreDefaults};

fn main() {
    println!("notepad_core version={}", notepad_core::core_version());

    if let Err(err) = smoke() {
        eprintln!("smoke failed: {err}");
        std::process::exit(1);
    }
}

fn smoke() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default())?;

    let id = store.insert(&Selector::Collection, NoteFields::with_body("smoke note"))?;
    let result = store.query(&Selector::Item(id), &QueryRequest::all())?;
    println!("notepad_core smoke inserted={id} queried={}", result.rows.len());
    Ok(())
}
