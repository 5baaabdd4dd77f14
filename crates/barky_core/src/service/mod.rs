//! Bookmark command set.
//!
//! # Responsibility
//! - Translate one `DomainBookmark` request into one repository call.
//! - Dispatch post-commit hooks explicitly from the create path.
//!
//! # See also
//! - `crate::hooks` for the hooks fired by `AddBookmarkCommand`.

pub mod commands;
