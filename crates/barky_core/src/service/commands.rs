//! Add/List/Get/Edit/Delete commands over a `BookmarkRepository`.
//!
//! # Invariants
//! - Commands never bypass repository validation.
//! - Only `AddBookmarkCommand` fires hooks, and only after a successful insert.
//! - Hook outcomes never change a command's result.
//! - Edit is whole-record replacement: callers supply the full desired state.

use crate::hooks::HookRegistry;
use crate::model::bookmark::{BookmarkId, DomainBookmark};
use crate::repo::bookmark_repo::{BookmarkRepository, RepoError, RepoResult};
use log::{error, info};

/// Inserts a bookmark and fires the post-commit hooks.
pub struct AddBookmarkCommand<'a, R: BookmarkRepository> {
    repo: &'a R,
    hooks: &'a HookRegistry,
}

impl<'a, R: BookmarkRepository> AddBookmarkCommand<'a, R> {
    pub fn new(repo: &'a R, hooks: &'a HookRegistry) -> Self {
        Self { repo, hooks }
    }

    /// Persists `bookmark` (its `id` is ignored) and returns the stored snapshot.
    ///
    /// # Side effects
    /// - Runs every registered hook once after the insert; failures are logged.
    pub fn execute(&self, bookmark: &DomainBookmark) -> RepoResult<DomainBookmark> {
        let created = self.repo.insert_bookmark(bookmark).map_err(|err| {
            error!("event=bookmark_add module=service status=error error={err}");
            err
        })?;

        let report = self.hooks.dispatch_created(&created);
        info!(
            "event=bookmark_add module=service status=ok bookmark_id={} hooks_ok={} hooks_failed={}",
            created.id.unwrap_or_default(),
            report.succeeded,
            report.failed
        );
        Ok(created)
    }
}

/// Lists every bookmark in ascending id order.
pub struct ListBookmarksCommand<'a, R: BookmarkRepository> {
    repo: &'a R,
}

impl<'a, R: BookmarkRepository> ListBookmarksCommand<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn execute(&self) -> RepoResult<Vec<DomainBookmark>> {
        let bookmarks = self.repo.list_bookmarks()?;
        info!(
            "event=bookmark_list module=service status=ok count={}",
            bookmarks.len()
        );
        Ok(bookmarks)
    }
}

/// Loads one bookmark by id.
pub struct GetBookmarkCommand<'a, R: BookmarkRepository> {
    repo: &'a R,
}

impl<'a, R: BookmarkRepository> GetBookmarkCommand<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Returns `Ok(None)` when no record has this id.
    pub fn execute(&self, id: BookmarkId) -> RepoResult<Option<DomainBookmark>> {
        self.repo.get_bookmark(id)
    }

    /// Like `execute`, but a missing record is `RepoError::NotFound`.
    pub fn execute_required(&self, id: BookmarkId) -> RepoResult<DomainBookmark> {
        self.execute(id)?.ok_or(RepoError::NotFound(id))
    }
}

/// Removes the bookmark identified by the input's id.
pub struct DeleteBookmarkCommand<'a, R: BookmarkRepository> {
    repo: &'a R,
}

impl<'a, R: BookmarkRepository> DeleteBookmarkCommand<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn execute(&self, bookmark: &DomainBookmark) -> RepoResult<()> {
        let id = bookmark.require_id()?;
        self.repo.delete_bookmark(id).map_err(|err| {
            error!("event=bookmark_delete module=service status=error bookmark_id={id} error={err}");
            err
        })?;
        info!("event=bookmark_delete module=service status=ok bookmark_id={id}");
        Ok(())
    }
}

/// Overwrites every field but `id` of an existing bookmark.
pub struct EditBookmarkCommand<'a, R: BookmarkRepository> {
    repo: &'a R,
}

impl<'a, R: BookmarkRepository> EditBookmarkCommand<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn execute(&self, bookmark: &DomainBookmark) -> RepoResult<()> {
        let id = bookmark.require_id()?;
        self.repo.update_bookmark(bookmark).map_err(|err| {
            error!("event=bookmark_edit module=service status=error bookmark_id={id} error={err}");
            err
        })?;
        info!("event=bookmark_edit module=service status=ok bookmark_id={id}");
        Ok(())
    }
}
