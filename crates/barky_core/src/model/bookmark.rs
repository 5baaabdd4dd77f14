//! Bookmark domain model.
//!
//! # Responsibility
//! - Define `DomainBookmark`, the transient snapshot commands consume/produce.
//! - Provide write-path validation shared by every mutating command.
//!
//! # Invariants
//! - `id == None` means "not yet persisted"; the store assigns ids.
//! - `title` is never empty or whitespace-only once validated.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned bookmark identifier.
pub type BookmarkId = i64;

/// Bookmark fields as seen by callers of the command set.
///
/// This is a snapshot, not a live view: mutating it has no effect on storage
/// until it is passed to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainBookmark {
    /// `None` until the store assigns an id on insert.
    pub id: Option<BookmarkId>,
    pub title: String,
    /// Stored verbatim; not validated as a URL.
    pub url: String,
    /// Free text, may be empty.
    pub notes: String,
    pub date_added: NaiveDate,
}

impl DomainBookmark {
    /// Creates an unpersisted bookmark dated today (local time).
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self::dated(title, url, notes, Local::now().date_naive())
    }

    /// Creates an unpersisted bookmark with a caller-provided date.
    pub fn dated(
        title: impl Into<String>,
        url: impl Into<String>,
        notes: impl Into<String>,
        date_added: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            url: url.into(),
            notes: notes.into(),
            date_added,
        }
    }

    /// Returns a copy carrying the given store id.
    pub fn with_id(mut self, id: BookmarkId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns whether this snapshot refers to a persisted record.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Validates field-level invariants before any storage mutation.
    pub fn validate(&self) -> Result<(), BookmarkValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookmarkValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns the id required by edit/delete paths.
    pub fn require_id(&self) -> Result<BookmarkId, BookmarkValidationError> {
        self.id.ok_or(BookmarkValidationError::MissingId)
    }
}

/// Write-path validation failures for `DomainBookmark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkValidationError {
    EmptyTitle,
    MissingId,
}

impl Display for BookmarkValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "bookmark title must not be empty"),
            Self::MissingId => write!(f, "bookmark has no id; it was never persisted"),
        }
    }
}

impl Error for BookmarkValidationError {}
