//! Domain model for bookmark commands.
//!
//! # Responsibility
//! - Define the value object passed into and returned from commands.
//! - Keep the command-facing shape independent of the SQL schema.
//!
//! # Invariants
//! - A persisted bookmark is identified by a store-assigned `BookmarkId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod bookmark;
