//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage boundary the command set talks to.
//! - Isolate SQLite query details from command orchestration.
//!
//! # Invariants
//! - Repository writes enforce `DomainBookmark::validate()` before SQL runs.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod bookmark_repo;
