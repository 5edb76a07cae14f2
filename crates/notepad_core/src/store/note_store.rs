//! Store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the addressed CRUD boundary over the `notes` table.
//! - Populate documented defaults on insert and stamp `modified_at` on
//!   update.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Insert targets the collection address only.
//! - An item selector implicitly ANDs an `id` equality test onto the filter.
//! - Filter expressions are bound positionally; a placeholder/argument count
//!   mismatch surfaces from the query executor, not from pre-validation.

use crate::config::StoreDefaults;
use crate::db::migrations::latest_version;
use crate::model::note::{now_epoch_ms, Category, Note, NoteFields, NoteId};
use crate::store::changes::{ChangeHub, ChangeSubscription};
use crate::store::projection::{resolve_projection, ResolvedProjection};
use crate::store::selector::Selector;
use crate::store::{StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::Arc;

/// Predicate used when a filter is reinterpreted as a search keyword.
const SEARCH_PREDICATE: &str = "title LIKE ? OR body LIKE ?";

/// Query options for the `query` and `search` operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    /// Requested logical output columns; `None` means the six base columns.
    pub projection: Option<Vec<String>>,
    /// SQL predicate with `?` placeholders bound from `filter_args`.
    ///
    /// Overload: when `filter_args` is `None` and `filter` is set, the
    /// filter text is NOT a predicate; it is reinterpreted as a substring
    /// search keyword. Callers that want predicate semantics must pass
    /// `Some(vec![])` even for placeholder-free predicates.
    pub filter: Option<String>,
    /// Positional arguments for `filter` placeholders.
    pub filter_args: Option<Vec<String>>,
    /// ORDER BY clause; `None` falls back to the configured default.
    pub sort_order: Option<String>,
}

impl QueryRequest {
    /// Request selecting everything with default projection and order.
    pub fn all() -> Self {
        Self::default()
    }
}

/// One result row, carrying the resolved logical columns in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedNote {
    values: Vec<(&'static str, Value)>,
}

impl ProjectedNote {
    /// Raw value of one logical column, if it was projected.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Integer value of one projected column.
    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Text value of one projected column.
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            Some(Value::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Decodes a full [`Note`]; requires the six base columns.
    ///
    /// Out-of-range category codes are reported as corrupt data rather than
    /// coerced.
    pub fn to_note(&self) -> StoreResult<Note> {
        let code = self.require_integer("category")?;
        let category = Category::from_code(code).ok_or_else(|| {
            StoreError::InvalidData(format!("category code {code} in notes.category"))
        })?;

        Ok(Note {
            id: self.require_integer("id")?,
            title: self.require_text("title")?.to_string(),
            body: self.require_text("body")?.to_string(),
            created_at: self.require_integer("created_at")?,
            modified_at: self.require_integer("modified_at")?,
            category,
        })
    }

    fn require_integer(&self, column: &str) -> StoreResult<i64> {
        self.integer(column).ok_or_else(|| {
            StoreError::InvalidData(format!("column `{column}` missing or not an integer"))
        })
    }

    fn require_text(&self, column: &str) -> StoreResult<&str> {
        self.text(column).ok_or_else(|| {
            StoreError::InvalidData(format!("column `{column}` missing or not text"))
        })
    }
}

/// Live query result: materialized rows plus a change subscription
/// registered at the queried address.
#[derive(Debug)]
pub struct QueryRows {
    pub rows: Vec<ProjectedNote>,
    pub changes: ChangeSubscription,
}

impl QueryRows {
    /// Decodes every row as a full [`Note`]; requires base-column projection.
    pub fn to_notes(&self) -> StoreResult<Vec<Note>> {
        self.rows.iter().map(ProjectedNote::to_note).collect()
    }
}

/// The note persistence and query boundary.
pub trait NoteStore {
    /// Queries notes at `selector`, applying projection, filter and sort.
    fn query(&self, selector: &Selector, request: &QueryRequest) -> StoreResult<QueryRows>;

    /// Substring search over `title` and `body` at `selector`.
    ///
    /// `request.filter` and `request.filter_args` are ignored by contract;
    /// projection and sort order are honored.
    fn search(
        &self,
        selector: &Selector,
        keyword: &str,
        request: &QueryRequest,
    ) -> StoreResult<QueryRows>;

    /// Creates one note and returns its store-assigned id.
    fn insert(&self, selector: &Selector, fields: NoteFields) -> StoreResult<NoteId>;

    /// Partially updates matching notes; returns the affected row count.
    fn update(
        &self,
        selector: &Selector,
        fields: NoteFields,
        filter: Option<&str>,
        filter_args: &[String],
    ) -> StoreResult<usize>;

    /// Hard-deletes matching notes; returns the affected row count.
    fn delete(
        &self,
        selector: &Selector,
        filter: Option<&str>,
        filter_args: &[String],
    ) -> StoreResult<usize>;
}

/// SQLite-backed note store.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
    defaults: StoreDefaults,
    hub: Arc<ChangeHub>,
}

impl<'conn> SqliteNoteStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, defaults: StoreDefaults) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            defaults,
            hub: Arc::new(ChangeHub::new()),
        })
    }

    /// The change-notification sink callers subscribe to.
    pub fn changes(&self) -> Arc<ChangeHub> {
        Arc::clone(&self.hub)
    }

    /// The active default-value set.
    pub fn defaults(&self) -> &StoreDefaults {
        &self.defaults
    }

    fn fetch(
        &self,
        projection: &ResolvedProjection,
        where_sql: &str,
        binds: Vec<Value>,
        sort_order: &str,
    ) -> StoreResult<Vec<ProjectedNote>> {
        let sql = format!(
            "SELECT {} FROM notes{} ORDER BY {};",
            projection.select_list, where_sql, sort_order
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut projected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(projection.logical.len());
            for (index, name) in projection.logical.iter().enumerate() {
                values.push((*name, row.get::<_, Value>(index)?));
            }
            projected.push(ProjectedNote { values });
        }

        Ok(projected)
    }

    fn sort_order<'a>(&'a self, request: &'a QueryRequest) -> &'a str {
        request
            .sort_order
            .as_deref()
            .unwrap_or(&self.defaults.sort_order)
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn query(&self, selector: &Selector, request: &QueryRequest) -> StoreResult<QueryRows> {
        if request.filter_args.is_none() {
            if let Some(keyword) = request.filter.as_deref() {
                // Filter text without an argument list is a search keyword,
                // not a predicate.
                return self.search(selector, keyword, request);
            }
        }

        let projection = resolve_projection(request.projection.as_deref())?;
        let args: &[String] = request.filter_args.as_deref().unwrap_or(&[]);
        let (where_sql, binds) = build_where(selector, request.filter.as_deref(), args);
        let rows = self.fetch(&projection, &where_sql, binds, self.sort_order(request))?;

        Ok(QueryRows {
            rows,
            changes: self.hub.subscribe(*selector),
        })
    }

    fn search(
        &self,
        selector: &Selector,
        keyword: &str,
        request: &QueryRequest,
    ) -> StoreResult<QueryRows> {
        let projection = resolve_projection(request.projection.as_deref())?;
        let pattern = format!("%{keyword}%");
        let args = [pattern.clone(), pattern];
        let (where_sql, binds) = build_where(selector, Some(SEARCH_PREDICATE), &args);
        let rows = self.fetch(&projection, &where_sql, binds, self.sort_order(request))?;

        Ok(QueryRows {
            rows,
            changes: self.hub.subscribe(*selector),
        })
    }

    fn insert(&self, selector: &Selector, fields: NoteFields) -> StoreResult<NoteId> {
        if *selector != Selector::Collection {
            return Err(StoreError::InvalidAddress(format!(
                "insert requires the collection address, got `{selector}`"
            )));
        }

        // One shared instant so an untouched note satisfies
        // created_at == modified_at.
        let now = now_epoch_ms();
        let created_at = fields.created_at.unwrap_or(now);
        let modified_at = fields.modified_at.unwrap_or(now);
        let title = fields
            .title
            .unwrap_or_else(|| self.defaults.title_placeholder.clone());
        let body = fields
            .body
            .unwrap_or_else(|| self.defaults.body_placeholder.clone());
        let category = fields.category.unwrap_or_default();

        self.conn
            .execute(
                "INSERT INTO notes (title, body, created_at, modified_at, category)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                rusqlite::params![title, body, created_at, modified_at, category.code()],
            )
            .map_err(StoreError::write)?;

        let id = self.conn.last_insert_rowid();
        self.hub.notify(Selector::Collection);
        Ok(id)
    }

    fn update(
        &self,
        selector: &Selector,
        fields: NoteFields,
        filter: Option<&str>,
        filter_args: &[String],
    ) -> StoreResult<usize> {
        let mut assignments: Vec<&str> = Vec::new();
        let mut binds: Vec<Value> = Vec::new();

        if let Some(title) = fields.title {
            assignments.push("title = ?");
            binds.push(Value::Text(title));
        }
        if let Some(body) = fields.body {
            assignments.push("body = ?");
            binds.push(Value::Text(body));
        }
        if let Some(category) = fields.category {
            assignments.push("category = ?");
            binds.push(Value::Integer(category.code()));
        }
        // created_at is immutable; a supplied value is not applied.
        assignments.push("modified_at = ?");
        binds.push(Value::Integer(fields.modified_at.unwrap_or_else(now_epoch_ms)));

        let (where_sql, where_binds) = build_where(selector, filter, filter_args);
        binds.extend(where_binds);

        let sql = format!("UPDATE notes SET {}{};", assignments.join(", "), where_sql);
        let count = self
            .conn
            .execute(&sql, params_from_iter(binds))
            .map_err(StoreError::write)?;

        self.hub.notify(*selector);
        Ok(count)
    }

    fn delete(
        &self,
        selector: &Selector,
        filter: Option<&str>,
        filter_args: &[String],
    ) -> StoreResult<usize> {
        let (where_sql, binds) = build_where(selector, filter, filter_args);
        let sql = format!("DELETE FROM notes{};", where_sql);
        let count = self
            .conn
            .execute(&sql, params_from_iter(binds))
            .map_err(StoreError::write)?;

        self.hub.notify(*selector);
        Ok(count)
    }
}

/// Builds the WHERE clause for `selector` plus an optional filter predicate.
///
/// An item selector contributes a bound `id = ?` test; the caller filter is
/// parenthesized and ANDed after it.
fn build_where(
    selector: &Selector,
    filter: Option<&str>,
    filter_args: &[String],
) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<Value> = Vec::new();

    if let Some(id) = selector.note_id() {
        clauses.push("id = ?".to_string());
        binds.push(Value::Integer(id));
    }
    if let Some(filter) = filter {
        clauses.push(format!("({filter})"));
        binds.extend(filter_args.iter().map(|arg| Value::Text(arg.clone())));
    }

    if clauses.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), binds)
    }
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "notes")? {
        return Err(StoreError::MissingRequiredTable("notes"));
    }

    for column in crate::store::projection::BASE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn user_version(conn: &Connection) -> StoreResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
