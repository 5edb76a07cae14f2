//! Projection column allow-list.
//!
//! # Responsibility
//! - Map logical column names to physical SQL expressions.
//! - Reject projection requests naming anything outside the map.
//!
//! # Invariants
//! - The map is fixed at compile time; caller input never reaches SQL text
//!   except through it.
//! - Summary aliases re-expose `id`, `title`, and `category` for list-row
//!   consumers without widening the schema.

use crate::store::{StoreError, StoreResult};

/// Base columns returned when a query requests no explicit projection.
pub const BASE_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "body",
    "created_at",
    "modified_at",
    "category",
];

/// Summary-view alias exposing `id` as a generic identifier.
pub const COLUMN_SUMMARY_ID: &str = "summary_id";
/// Summary-view alias exposing `title` as a generic display name.
pub const COLUMN_SUMMARY_NAME: &str = "summary_name";
/// Summary-view alias exposing `category` as a generic marker value.
pub const COLUMN_SUMMARY_MARKER: &str = "summary_marker";

const PROJECTION_MAP: &[(&str, &str)] = &[
    ("id", "id"),
    ("title", "title"),
    ("body", "body"),
    ("created_at", "created_at"),
    ("modified_at", "modified_at"),
    ("category", "category"),
    (COLUMN_SUMMARY_ID, "id AS summary_id"),
    (COLUMN_SUMMARY_NAME, "title AS summary_name"),
    (COLUMN_SUMMARY_MARKER, "category AS summary_marker"),
];

/// Outcome of resolving a projection request through the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProjection {
    /// Logical output column names, in request order.
    pub logical: Vec<&'static str>,
    /// Comma-joined SELECT list of physical expressions.
    pub select_list: String,
}

/// Resolves requested logical columns to physical expressions.
///
/// `None` resolves to the six base columns. Any requested name absent from
/// the allow-list fails with [`StoreError::UnknownColumn`].
pub fn resolve_projection(requested: Option<&[String]>) -> StoreResult<ResolvedProjection> {
    let names: Vec<&str> = match requested {
        Some(columns) => columns.iter().map(String::as_str).collect(),
        None => BASE_COLUMNS.to_vec(),
    };

    let mut logical = Vec::with_capacity(names.len());
    let mut expressions = Vec::with_capacity(names.len());
    for name in names {
        let (key, expression) = PROJECTION_MAP
            .iter()
            .find(|(key, _)| *key == name)
            .ok_or_else(|| StoreError::UnknownColumn(name.to_string()))?;
        logical.push(*key);
        expressions.push(*expression);
    }

    Ok(ResolvedProjection {
        logical,
        select_list: expressions.join(", "),
    })
}
