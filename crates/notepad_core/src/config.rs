//! Store configuration and default-value provider.
//!
//! # Responsibility
//! - Supply the placeholder strings applied when an insert omits fields.
//! - Supply the default sort order and category display names.
//!
//! # Invariants
//! - `category_names` always holds one display name per defined category.
//! - Defaults are plain values; how a host loads them (config file, embedded
//!   resources) is outside the store.

use crate::model::note::Category;
use serde::Deserialize;

/// Default-value set consumed by the store.
///
/// Hosts may deserialize a partial document; absent fields keep the built-in
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreDefaults {
    /// Title written when an insert carries no title.
    pub title_placeholder: String,
    /// Body written when an insert carries no body.
    pub body_placeholder: String,
    /// ORDER BY clause applied when a query supplies none.
    pub sort_order: String,
    /// Display names for the four categories, in persisted-code order.
    pub category_names: [String; 4],
}

impl StoreDefaults {
    /// Display name for one category.
    pub fn category_name(&self, category: Category) -> &str {
        &self.category_names[category.code() as usize]
    }
}

impl Default for StoreDefaults {
    fn default() -> Self {
        Self {
            title_placeholder: "Untitled".to_string(),
            body_placeholder: String::new(),
            sort_order: "modified_at DESC".to_string(),
            category_names: [
                "None".to_string(),
                "Work".to_string(),
                "Personal".to_string(),
                "Study".to_string(),
            ],
        }
    }
}
