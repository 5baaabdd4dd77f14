//! Bookmark repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/get/list/update/delete over the `bookmarks` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every mutation is a single statement, so each call is atomic.
//! - Lists are ordered by `id ASC` (insertion order).
//! - Read paths reject unparsable persisted state instead of masking it.

use crate::db::DbError;
use crate::model::bookmark::{BookmarkId, BookmarkValidationError, DomainBookmark};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOKMARK_SELECT_SQL: &str = "SELECT
    id,
    title,
    url,
    notes,
    date_added
FROM bookmarks";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for bookmark persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookmarkValidationError),
    Db(DbError),
    NotFound(BookmarkId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "bookmark not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted bookmark data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<BookmarkValidationError> for RepoError {
    fn from(value: BookmarkValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage boundary for bookmark records.
pub trait BookmarkRepository {
    /// Inserts a new record, ignoring `bookmark.id`; returns the stored snapshot.
    fn insert_bookmark(&self, bookmark: &DomainBookmark) -> RepoResult<DomainBookmark>;
    fn get_bookmark(&self, id: BookmarkId) -> RepoResult<Option<DomainBookmark>>;
    fn list_bookmarks(&self) -> RepoResult<Vec<DomainBookmark>>;
    /// Overwrites every non-id column of an existing record.
    fn update_bookmark(&self, bookmark: &DomainBookmark) -> RepoResult<()>;
    fn delete_bookmark(&self, id: BookmarkId) -> RepoResult<()>;
    fn count_bookmarks(&self) -> RepoResult<u64>;
}

/// SQLite-backed bookmark repository.
pub struct SqliteBookmarkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookmarkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookmarkRepository for SqliteBookmarkRepository<'_> {
    fn insert_bookmark(&self, bookmark: &DomainBookmark) -> RepoResult<DomainBookmark> {
        bookmark.validate()?;

        self.conn.execute(
            "INSERT INTO bookmarks (title, url, notes, date_added)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                bookmark.title.as_str(),
                bookmark.url.as_str(),
                bookmark.notes.as_str(),
                date_to_db(bookmark.date_added),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(bookmark.clone().with_id(id))
    }

    fn get_bookmark(&self, id: BookmarkId) -> RepoResult<Option<DomainBookmark>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKMARK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_bookmark_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_bookmarks(&self) -> RepoResult<Vec<DomainBookmark>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKMARK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next()? {
            bookmarks.push(parse_bookmark_row(row)?);
        }

        Ok(bookmarks)
    }

    fn update_bookmark(&self, bookmark: &DomainBookmark) -> RepoResult<()> {
        let id = bookmark.require_id()?;
        bookmark.validate()?;

        let changed = self.conn.execute(
            "UPDATE bookmarks
             SET
                title = ?1,
                url = ?2,
                notes = ?3,
                date_added = ?4
             WHERE id = ?5;",
            params![
                bookmark.title.as_str(),
                bookmark.url.as_str(),
                bookmark.notes.as_str(),
                date_to_db(bookmark.date_added),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_bookmark(&self, id: BookmarkId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_bookmarks(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookmarks;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative bookmark count `{count}`")))
    }
}

fn parse_bookmark_row(row: &Row<'_>) -> RepoResult<DomainBookmark> {
    let date_text: String = row.get("date_added")?;
    let date_added = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in bookmarks.date_added"
        ))
    })?;

    Ok(DomainBookmark {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        url: row.get("url")?,
        notes: row.get("notes")?,
        date_added,
    })
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
