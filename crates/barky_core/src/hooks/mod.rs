//! Post-commit hooks fired after a bookmark is created.
//!
//! # Responsibility
//! - Define the `PostCommitHook` contract and the explicit hook list that
//!   `AddBookmarkCommand` dispatches after its insert.
//! - Isolate hook failures from the creating command.
//!
//! # Invariants
//! - Every registered hook runs exactly once per creation, in registration
//!   order, even when an earlier hook fails.
//! - Hook failures are logged and counted, never returned to the caller.

use crate::model::bookmark::DomainBookmark;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

pub mod broadcast;
pub mod channel_layer;
pub mod csv_audit;

pub use broadcast::{BroadcastHook, BroadcastMessage, PublishError, Publisher};
pub use channel_layer::{ChannelLayer, Subscription};
pub use csv_audit::CsvAuditHook;

/// Failure raised by one hook invocation.
#[derive(Debug)]
pub enum HookError {
    Io(std::io::Error),
    Csv(csv::Error),
    Publish(PublishError),
}

impl Display for HookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "audit file I/O failed: {err}"),
            Self::Csv(err) => write!(f, "audit row encoding failed: {err}"),
            Self::Publish(err) => write!(f, "broadcast failed: {err}"),
        }
    }
}

impl Error for HookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Publish(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HookError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for HookError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<PublishError> for HookError {
    fn from(value: PublishError) -> Self {
        Self::Publish(value)
    }
}

/// Reaction to a committed bookmark insert.
pub trait PostCommitHook: Send + Sync {
    /// Stable name used in logs and for duplicate detection.
    fn name(&self) -> &str;
    fn on_bookmark_created(&self, bookmark: &DomainBookmark) -> Result<(), HookError>;
}

/// Registration errors for the hook list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookRegistryError {
    DuplicateHookName(String),
}

impl Display for HookRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateHookName(name) => write!(f, "hook already registered: {name}"),
        }
    }
}

impl Error for HookRegistryError {}

/// Outcome counters for one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookDispatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Ordered list of hooks invoked after each bookmark creation.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn PostCommitHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard creation hooks: CSV audit first, then broadcast on `topic`.
    pub fn with_default_hooks(
        audit_csv_path: impl Into<PathBuf>,
        publisher: Arc<dyn Publisher>,
        topic: &str,
    ) -> Result<Self, PublishError> {
        let audit: Box<dyn PostCommitHook> = Box::new(CsvAuditHook::new(audit_csv_path));
        let broadcast: Box<dyn PostCommitHook> = Box::new(BroadcastHook::new(publisher, topic)?);
        Ok(Self {
            hooks: vec![audit, broadcast],
        })
    }

    /// Appends one hook; names must be unique within the registry.
    pub fn register(&mut self, hook: Box<dyn PostCommitHook>) -> Result<(), HookRegistryError> {
        if self.hooks.iter().any(|existing| existing.name() == hook.name()) {
            return Err(HookRegistryError::DuplicateHookName(hook.name().to_string()));
        }
        self.hooks.push(hook);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Registered hook names in dispatch order.
    pub fn hook_names(&self) -> Vec<String> {
        self.hooks.iter().map(|hook| hook.name().to_string()).collect()
    }

    /// Runs every hook for a freshly created bookmark.
    pub fn dispatch_created(&self, bookmark: &DomainBookmark) -> HookDispatchReport {
        let bookmark_id = bookmark.id.unwrap_or_default();
        let mut report = HookDispatchReport::default();

        for hook in &self.hooks {
            match hook.on_bookmark_created(bookmark) {
                Ok(()) => {
                    report.succeeded += 1;
                    debug!(
                        "event=hook_dispatch module=hooks status=ok hook={} bookmark_id={}",
                        hook.name(),
                        bookmark_id
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        "event=hook_dispatch module=hooks status=error hook={} bookmark_id={} error={}",
                        hook.name(),
                        bookmark_id,
                        err
                    );
                }
            }
        }

        report
    }
}
