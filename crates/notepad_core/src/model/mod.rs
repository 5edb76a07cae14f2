//! Domain model for the note store.
//!
//! # Responsibility
//! - Define the canonical note record and its partial-field companion.
//! - Keep category coding rules in one place.
//!
//! # Invariants
//! - Every note is identified by a store-assigned integer `NoteId`.
//! - `category` is always one of the four defined values at the API boundary.

pub mod note;
