//! Note domain model.
//!
//! # Responsibility
//! - Define the `Note` record stored in the `notes` table.
//! - Define `Category` coding to and from its persisted integer form.
//! - Define `NoteFields`, the partial field set accepted by insert/update.
//!
//! # Invariants
//! - `id` is unique and never reused (AUTOINCREMENT rowid).
//! - `created_at` is set once at creation and never changes.
//! - `modified_at >= created_at` for every persisted note.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the store on insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Fixed four-valued classification of a note.
///
/// Persisted as its integer code; the type itself guarantees callers can
/// only hand the store one of the defined values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Unclassified (the insert default).
    None,
    Work,
    Personal,
    Study,
}

impl Category {
    /// All categories in persisted-code order.
    pub const ALL: [Category; 4] = [
        Category::None,
        Category::Work,
        Category::Personal,
        Category::Study,
    ];

    /// Integer code stored in the `category` column.
    pub fn code(self) -> i64 {
        match self {
            Category::None => 0,
            Category::Work => 1,
            Category::Personal => 2,
            Category::Study => 3,
        }
    }

    /// Decodes a persisted integer code.
    ///
    /// Returns `None` for values outside the defined range; readers treat
    /// that as corrupt persisted data rather than masking it.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Category::None),
            1 => Some(Category::Work),
            2 => Some(Category::Personal),
            3 => Some(Category::Study),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::None
    }
}

/// Fully materialized note row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned stable id.
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Creation instant in epoch milliseconds. Immutable after insert.
    pub created_at: i64,
    /// Last-mutation instant in epoch milliseconds.
    pub modified_at: i64,
    pub category: Category,
}

/// Partial field set for insert/update calls.
///
/// Unset fields keep their prior value on update and fall back to the
/// documented defaults on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFields {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Honored by insert only; update ignores it to keep creation time
    /// immutable.
    pub created_at: Option<i64>,
    /// When absent, the store stamps the current time on insert and update.
    pub modified_at: Option<i64>,
    pub category: Option<Category>,
}

impl NoteFields {
    /// Fields carrying only a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Fields carrying only a body.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Saturates at zero for clocks set before the epoch instead of panicking.
pub fn now_epoch_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
