//! Per-session editing state.
//!
//! # Responsibility
//! - Track one editing session: insert-vs-edit mode, the original
//!   body/category snapshot, and the currently selected category.
//! - Apply save/cancel/delete through the store's update/delete operations.
//!
//! # Invariants
//! - The store holds no session state; everything revertible lives here.
//! - Cancelling an insert session removes the blank note it created.
//! - The first save of an insert session derives a title from the body when
//!   the caller supplies none.

use crate::model::note::{Category, Note, NoteFields, NoteId};
use crate::store::note_store::{NoteStore, QueryRequest};
use crate::store::selector::Selector;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Longest derived title, in characters.
const DERIVED_TITLE_MAX_CHARS: usize = 30;

/// Session error for editing use-cases.
#[derive(Debug)]
pub enum EditSessionError {
    /// Target note does not exist (or no longer exists).
    NoteMissing(NoteId),
    /// Store-boundary failure.
    Store(StoreError),
}

impl Display for EditSessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteMissing(id) => write!(f, "note not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditSessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoteMissing(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for EditSessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Whether the session started from a blank note or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Insert,
    Edit,
}

/// Explicit state of one editing session.
///
/// Replaces the reference implementation's activity-global fields with a
/// value the caller owns and threads through store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    note_id: NoteId,
    state: EditState,
    original_body: String,
    original_category: Category,
    current_category: Category,
}

impl EditSession {
    /// Starts a session by inserting a blank note.
    ///
    /// The blank note carries the configured placeholders and category
    /// `None` until the first save.
    pub fn open_insert(store: &impl NoteStore) -> Result<Self, EditSessionError> {
        let fields = NoteFields {
            category: Some(Category::None),
            ..NoteFields::default()
        };
        let note_id = store.insert(&Selector::Collection, fields)?;

        Ok(Self {
            note_id,
            state: EditState::Insert,
            original_body: String::new(),
            original_category: Category::None,
            current_category: Category::None,
        })
    }

    /// Starts a session over an existing note, snapshotting its revertible
    /// fields.
    pub fn open_edit(store: &impl NoteStore, note_id: NoteId) -> Result<Self, EditSessionError> {
        let note = load_note(store, note_id)?;

        Ok(Self {
            note_id,
            state: EditState::Edit,
            original_body: note.body,
            original_category: note.category,
            current_category: note.category,
        })
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn current_category(&self) -> Category {
        self.current_category
    }

    /// Records a category selection; persisted on the next save.
    pub fn select_category(&mut self, category: Category) {
        self.current_category = category;
    }

    /// Persists the body, selected category, and (optionally) a title.
    ///
    /// On the first save of an insert session with no caller title, the
    /// title is derived from the body. Afterwards the session behaves as an
    /// edit session and its snapshots track the saved state.
    pub fn save(
        &mut self,
        store: &impl NoteStore,
        body: &str,
        title: Option<&str>,
    ) -> Result<(), EditSessionError> {
        let mut fields = NoteFields {
            body: Some(body.to_string()),
            category: Some(self.current_category),
            ..NoteFields::default()
        };
        match self.state {
            EditState::Insert => {
                let title = title.map_or_else(|| derive_title(body), str::to_string);
                fields.title = Some(title);
            }
            EditState::Edit => {
                if let Some(title) = title {
                    fields.title = Some(title.to_string());
                }
            }
        }

        store.update(&Selector::Item(self.note_id), fields, None, &[])?;

        self.original_body = body.to_string();
        self.original_category = self.current_category;
        self.state = EditState::Edit;
        Ok(())
    }

    /// Abandons the session.
    ///
    /// Edit sessions restore the snapshotted body and category; insert
    /// sessions delete the blank note they created.
    pub fn cancel(self, store: &impl NoteStore) -> Result<(), EditSessionError> {
        match self.state {
            EditState::Edit => {
                let fields = NoteFields {
                    body: Some(self.original_body),
                    category: Some(self.original_category),
                    ..NoteFields::default()
                };
                store.update(&Selector::Item(self.note_id), fields, None, &[])?;
            }
            EditState::Insert => {
                store.delete(&Selector::Item(self.note_id), None, &[])?;
            }
        }
        Ok(())
    }

    /// Deletes the session's note and ends the session.
    pub fn delete(self, store: &impl NoteStore) -> Result<usize, EditSessionError> {
        Ok(store.delete(&Selector::Item(self.note_id), None, &[])?)
    }
}

/// Derives a list-row title from note body text.
///
/// Takes the first 30 characters; when the body is longer than that, the
/// cut is moved back to the last space so no word is split.
pub fn derive_title(body: &str) -> String {
    let total_chars = body.chars().count();
    let mut title: String = body.chars().take(DERIVED_TITLE_MAX_CHARS).collect();

    if total_chars > DERIVED_TITLE_MAX_CHARS {
        if let Some(last_space) = title.rfind(' ') {
            if last_space > 0 {
                title.truncate(last_space);
            }
        }
    }

    title
}

fn load_note(store: &impl NoteStore, note_id: NoteId) -> Result<Note, EditSessionError> {
    let result = store.query(&Selector::Item(note_id), &QueryRequest::all())?;
    let row = result
        .rows
        .first()
        .ok_or(EditSessionError::NoteMissing(note_id))?;
    Ok(row.to_note()?)
}
