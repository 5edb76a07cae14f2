use notepad_core::db::open_db_in_memory;
use notepad_core::{
    Category, EditSession, EditSessionError, EditState, NoteFields, NoteStore, QueryRequest,
    Selector, SqliteNoteStore, StoreDefaults,
};

fn note(store: &SqliteNoteStore<'_>, id: i64) -> notepad_core::Note {
    store
        .query(&Selector::Item(id), &QueryRequest::all())
        .unwrap()
        .rows[0]
        .to_note()
        .unwrap()
}

#[test]
fn insert_session_derives_title_on_first_save() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let mut session = EditSession::open_insert(&store).unwrap();
    assert_eq!(session.state(), EditState::Insert);

    session
        .save(&store, "remember to water the plants this weekend", None)
        .unwrap();
    assert_eq!(session.state(), EditState::Edit);

    let saved = note(&store, session.note_id());
    assert_eq!(saved.body, "remember to water the plants this weekend");
    assert_eq!(saved.title, "remember to water the plants");

    // A later save without a title keeps the derived one.
    session.save(&store, "watered them already", None).unwrap();
    let resaved = note(&store, session.note_id());
    assert_eq!(resaved.title, "remember to water the plants");
    assert_eq!(resaved.body, "watered them already");
}

#[test]
fn insert_session_prefers_caller_title() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let mut session = EditSession::open_insert(&store).unwrap();
    session.save(&store, "body text", Some("chosen title")).unwrap();

    assert_eq!(note(&store, session.note_id()).title, "chosen title");
}

#[test]
fn cancelled_insert_session_removes_the_blank_note() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let session = EditSession::open_insert(&store).unwrap();
    let id = session.note_id();
    session.cancel(&store).unwrap();

    let result = store.query(&Selector::Item(id), &QueryRequest::all()).unwrap();
    assert!(result.rows.is_empty());
}

#[test]
fn cancelled_edit_session_restores_snapshotted_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let fields = NoteFields {
        body: Some("original".to_string()),
        category: Some(Category::Work),
        ..NoteFields::default()
    };
    let id = store.insert(&Selector::Collection, fields).unwrap();

    let session = EditSession::open_edit(&store, id).unwrap();
    assert_eq!(session.current_category(), Category::Work);

    // Out-of-band change the session never saved.
    store
        .update(
            &Selector::Item(id),
            NoteFields {
                body: Some("tampered".to_string()),
                category: Some(Category::Study),
                ..NoteFields::default()
            },
            None,
            &[],
        )
        .unwrap();

    session.cancel(&store).unwrap();

    let restored = note(&store, id);
    assert_eq!(restored.body, "original");
    assert_eq!(restored.category, Category::Work);
}

#[test]
fn category_selection_persists_on_save() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let id = store
        .insert(&Selector::Collection, NoteFields::with_body("classify me"))
        .unwrap();

    let mut session = EditSession::open_edit(&store, id).unwrap();
    session.select_category(Category::Personal);
    session.save(&store, "classified", None).unwrap();

    let saved = note(&store, id);
    assert_eq!(saved.category, Category::Personal);
    assert_eq!(saved.body, "classified");
}

#[test]
fn save_then_cancel_keeps_the_saved_state() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let id = store
        .insert(&Selector::Collection, NoteFields::with_body("first"))
        .unwrap();

    let mut session = EditSession::open_edit(&store, id).unwrap();
    session.save(&store, "second", None).unwrap();
    session.cancel(&store).unwrap();

    // Snapshots follow each save, so cancel reverts to the saved state.
    assert_eq!(note(&store, id).body, "second");
}

#[test]
fn session_delete_removes_the_note() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let id = store
        .insert(&Selector::Collection, NoteFields::with_body("condemned"))
        .unwrap();
    let session = EditSession::open_edit(&store, id).unwrap();

    assert_eq!(session.delete(&store).unwrap(), 1);
    let result = store.query(&Selector::Item(id), &QueryRequest::all()).unwrap();
    assert!(result.rows.is_empty());
}

#[test]
fn opening_a_missing_note_reports_note_missing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn, StoreDefaults::default()).unwrap();

    let err = EditSession::open_edit(&store, 404).unwrap_err();
    assert!(matches!(err, EditSessionError::NoteMissing(404)));
}
