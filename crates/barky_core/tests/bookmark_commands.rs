use barky_core::db::open_db_in_memory;
use barky_core::{
    AddBookmarkCommand, BookmarkRepository, BookmarkValidationError, DeleteBookmarkCommand,
    DomainBookmark, EditBookmarkCommand, GetBookmarkCommand, HookRegistry, ListBookmarksCommand,
    RepoError, SqliteBookmarkRepository,
};
use chrono::NaiveDate;
use rusqlite::params;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 14).unwrap()
}

fn bookmark_1() -> DomainBookmark {
    DomainBookmark::dated(
        "Test Bookmark",
        "http://www.example.com",
        "Test notes",
        today(),
    )
    .with_id(1)
}

fn bookmark_2() -> DomainBookmark {
    DomainBookmark::dated(
        "Test Bookmark 2",
        "http://www.example2.com",
        "Test notes 2",
        today(),
    )
    .with_id(2)
}

#[test]
fn add_inserts_one_record_with_same_url() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();

    let created = AddBookmarkCommand::new(&repo, &hooks)
        .execute(&bookmark_1())
        .unwrap();

    assert_eq!(repo.count_bookmarks().unwrap(), 1);
    assert_eq!(created.id, Some(1));
    let stored = repo.get_bookmark(1).unwrap().unwrap();
    assert_eq!(stored.url, bookmark_1().url);
    assert_eq!(stored, created);
}

#[test]
fn add_ignores_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();

    let created = AddBookmarkCommand::new(&repo, &hooks)
        .execute(&bookmark_1().with_id(42))
        .unwrap();

    assert_eq!(created.id, Some(1));
    assert!(repo.get_bookmark(42).unwrap().is_none());
}

#[test]
fn add_rejects_blank_title_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();

    let mut invalid = bookmark_1();
    invalid.title = "  ".to_string();
    let err = AddBookmarkCommand::new(&repo, &hooks)
        .execute(&invalid)
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(BookmarkValidationError::EmptyTitle)
    ));
    assert_eq!(repo.count_bookmarks().unwrap(), 0);
}

#[test]
fn list_returns_bookmarks_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    let add = AddBookmarkCommand::new(&repo, &hooks);
    add.execute(&bookmark_1()).unwrap();
    add.execute(&bookmark_2()).unwrap();

    let result = ListBookmarksCommand::new(&repo).execute().unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, bookmark_1().id);
    assert_eq!(result[1].id, bookmark_2().id);
    assert_eq!(result[1].title, "Test Bookmark 2");
    assert_eq!(result[0].date_added, today());
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);

    assert!(ListBookmarksCommand::new(&repo).execute().unwrap().is_empty());
}

#[test]
fn list_is_a_snapshot_not_a_live_view() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    let add = AddBookmarkCommand::new(&repo, &hooks);
    add.execute(&bookmark_1()).unwrap();

    let snapshot = ListBookmarksCommand::new(&repo).execute().unwrap();
    add.execute(&bookmark_2()).unwrap();

    assert_eq!(snapshot.len(), 1);
}

#[test]
fn delete_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    AddBookmarkCommand::new(&repo, &hooks)
        .execute(&bookmark_1())
        .unwrap();
    assert_eq!(repo.count_bookmarks().unwrap(), 1);

    DeleteBookmarkCommand::new(&repo)
        .execute(&bookmark_1())
        .unwrap();

    assert_eq!(repo.count_bookmarks().unwrap(), 0);
}

#[test]
fn delete_twice_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    let add = AddBookmarkCommand::new(&repo, &hooks);
    add.execute(&bookmark_1()).unwrap();
    add.execute(&bookmark_2()).unwrap();
    let delete = DeleteBookmarkCommand::new(&repo);

    delete.execute(&bookmark_1()).unwrap();
    let err = delete.execute(&bookmark_1()).unwrap_err();

    assert!(matches!(err, RepoError::NotFound(1)));
    assert_eq!(repo.count_bookmarks().unwrap(), 1);
}

#[test]
fn delete_requires_an_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);

    let unsaved = DomainBookmark::new("unsaved", "http://unsaved.example", "");
    let err = DeleteBookmarkCommand::new(&repo)
        .execute(&unsaved)
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(BookmarkValidationError::MissingId)
    ));
}

#[test]
fn edit_overwrites_title_and_keeps_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    AddBookmarkCommand::new(&repo, &hooks)
        .execute(&bookmark_1())
        .unwrap();

    let mut edited = bookmark_1();
    edited.title = "goofy".to_string();
    EditBookmarkCommand::new(&repo).execute(&edited).unwrap();

    assert_eq!(repo.count_bookmarks().unwrap(), 1);
    let stored = repo.get_bookmark(1).unwrap().unwrap();
    assert_eq!(stored.id, Some(1));
    assert_eq!(stored.title, "goofy");
    assert_eq!(stored.url, bookmark_1().url);
    assert_eq!(stored.notes, bookmark_1().notes);
}

#[test]
fn edit_replaces_every_field_including_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    AddBookmarkCommand::new(&repo, &hooks)
        .execute(&bookmark_1())
        .unwrap();

    let replacement = DomainBookmark::dated(
        "Renamed",
        "https://renamed.example",
        "",
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .with_id(1);
    EditBookmarkCommand::new(&repo).execute(&replacement).unwrap();

    assert_eq!(repo.get_bookmark(1).unwrap().unwrap(), replacement);
}

#[test]
fn edit_missing_record_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);

    let err = EditBookmarkCommand::new(&repo)
        .execute(&bookmark_2())
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(2)));
    assert_eq!(repo.count_bookmarks().unwrap(), 0);
}

#[test]
fn get_then_edit_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);
    let hooks = HookRegistry::new();
    let created = AddBookmarkCommand::new(&repo, &hooks)
        .execute(&bookmark_1())
        .unwrap();
    let get = GetBookmarkCommand::new(&repo);

    let mut loaded = get.execute_required(created.id.unwrap()).unwrap();
    loaded.title = "Goofy".to_string();
    EditBookmarkCommand::new(&repo).execute(&loaded).unwrap();

    assert_eq!(get.execute(1).unwrap().unwrap().title, "Goofy");
    assert!(get.execute(99).unwrap().is_none());
    assert!(matches!(
        get.execute_required(99).unwrap_err(),
        RepoError::NotFound(99)
    ));
}

#[test]
fn corrupted_date_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO bookmarks (title, url, notes, date_added) VALUES (?1, ?2, ?3, ?4);",
        params!["broken", "http://broken.example", "", "yesterday"],
    )
    .unwrap();
    let repo = SqliteBookmarkRepository::new(&conn);

    let err = ListBookmarksCommand::new(&repo).execute().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
