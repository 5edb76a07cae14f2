//! Editing use-cases built on the store boundary.
//!
//! # Responsibility
//! - Hold per-editing-session state (snapshots, category selection) outside
//!   the store.
//! - Orchestrate store calls for save/cancel/delete flows.

pub mod edit_session;
