//! Bookmark command core for barky.
//! Commands, storage and post-creation hooks live here; binaries only wire
//! configuration to them.

pub mod config;
pub mod db;
pub mod hooks;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{BarkyConfig, ConfigError};
pub use hooks::{
    BroadcastHook, BroadcastMessage, ChannelLayer, CsvAuditHook, HookDispatchReport, HookError,
    HookRegistry, HookRegistryError, PostCommitHook, PublishError, Publisher, Subscription,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogSink,
    STDERR_LOG_LEVEL,
};
pub use model::bookmark::{BookmarkId, BookmarkValidationError, DomainBookmark};
pub use repo::bookmark_repo::{BookmarkRepository, RepoError, RepoResult, SqliteBookmarkRepository};
pub use service::commands::{
    AddBookmarkCommand, DeleteBookmarkCommand, EditBookmarkCommand, GetBookmarkCommand,
    ListBookmarksCommand,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
