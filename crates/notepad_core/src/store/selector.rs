//! Operation addressing.
//!
//! # Responsibility
//! - Define the two recognized address shapes: the whole collection and one
//!   note by id.
//! - Parse and render the textual address form used by external callers.
//!
//! # Invariants
//! - Any textual shape other than `notes` or `notes/<integer>` is rejected
//!   before the operation is attempted.

use crate::model::note::NoteId;
use crate::store::{StoreError, StoreResult};
use std::fmt::{Display, Formatter};

const COLLECTION_PATH: &str = "notes";

/// Logical target of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// All notes.
    Collection,
    /// The note with this id.
    Item(NoteId),
}

impl Selector {
    /// Parses a textual address.
    ///
    /// Accepted shapes: `notes` (collection) and `notes/<integer>` (item).
    /// Leading/trailing slashes are tolerated.
    pub fn parse(address: &str) -> StoreResult<Self> {
        let mut segments = address.trim_matches('/').split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some(COLLECTION_PATH), None, _) => Ok(Self::Collection),
            (Some(COLLECTION_PATH), Some(id), None) => id
                .parse::<NoteId>()
                .map(Self::Item)
                .map_err(|_| StoreError::InvalidAddress(format!("bad note id in `{address}`"))),
            _ => Err(StoreError::InvalidAddress(format!(
                "unrecognized address `{address}`"
            ))),
        }
    }

    /// Returns the addressed note id for item selectors.
    pub fn note_id(&self) -> Option<NoteId> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(*id),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "{COLLECTION_PATH}"),
            Self::Item(id) => write!(f, "{COLLECTION_PATH}/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Selector;
    use crate::store::StoreError;

    #[test]
    fn parses_collection_and_item_shapes() {
        assert_eq!(Selector::parse("notes").unwrap(), Selector::Collection);
        assert_eq!(Selector::parse("notes/42").unwrap(), Selector::Item(42));
        assert_eq!(Selector::parse("/notes/7/").unwrap(), Selector::Item(7));
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        for address in ["", "folders", "notes/1/extra", "notes/abc", "nope/3"] {
            let err = Selector::parse(address).unwrap_err();
            assert!(
                matches!(err, StoreError::InvalidAddress(_)),
                "address `{address}` should be rejected"
            );
        }
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for selector in [Selector::Collection, Selector::Item(9)] {
            assert_eq!(Selector::parse(&selector.to_string()).unwrap(), selector);
        }
    }
}
