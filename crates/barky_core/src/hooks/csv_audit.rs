//! CSV audit trail for created bookmarks.
//!
//! # Invariants
//! - One row per creation: `id,title,url,notes,date_added`.
//! - The header row is written once, when the file is missing or empty.
//! - A new row always starts on its own line, even when the existing file
//!   lacks a trailing newline.

use super::{HookError, PostCommitHook};
use crate::model::bookmark::DomainBookmark;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Column order of the audit file.
pub const CSV_AUDIT_HEADER: [&str; 5] = ["id", "title", "url", "notes", "date_added"];

const HOOK_NAME: &str = "csv_audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuditFileState {
    /// Missing or zero-length: header goes first.
    Fresh,
    Terminated,
    /// Last byte is not `\n`; a hand edit or a truncated write.
    Unterminated,
}

/// Appends created bookmarks to a CSV file.
#[derive(Debug, Clone)]
pub struct CsvAuditHook {
    path: PathBuf,
}

impl CsvAuditHook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_state(&self) -> Result<AuditFileState, HookError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(AuditFileState::Fresh),
            Err(err) => return Err(err.into()),
        };
        if file.metadata()?.len() == 0 {
            return Ok(AuditFileState::Fresh);
        }

        let mut last = [0_u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] == b'\n' {
            Ok(AuditFileState::Terminated)
        } else {
            Ok(AuditFileState::Unterminated)
        }
    }
}

impl PostCommitHook for CsvAuditHook {
    fn name(&self) -> &str {
        HOOK_NAME
    }

    fn on_bookmark_created(&self, bookmark: &DomainBookmark) -> Result<(), HookError> {
        let state = self.file_state()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if state == AuditFileState::Unterminated {
            file.write_all(b"\n")?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if state == AuditFileState::Fresh {
            writer.write_record(CSV_AUDIT_HEADER)?;
        }

        let id = bookmark.id.map(|id| id.to_string()).unwrap_or_default();
        let date_added = bookmark.date_added.format("%Y-%m-%d").to_string();
        writer.write_record([
            id.as_str(),
            bookmark.title.as_str(),
            bookmark.url.as_str(),
            bookmark.notes.as_str(),
            date_added.as_str(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvAuditHook, PostCommitHook};
    use crate::hooks::HookError;
    use crate::model::bookmark::DomainBookmark;
    use chrono::NaiveDate;

    fn bookmark(id: i64, title: &str) -> DomainBookmark {
        DomainBookmark::dated(
            title,
            "http://www.example.com",
            "notes, with a comma",
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        )
        .with_id(id)
    }

    #[test]
    fn header_is_written_once_and_fields_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let hook = CsvAuditHook::new(dir.path().join("audit.csv"));

        hook.on_bookmark_created(&bookmark(1, "first")).unwrap();
        hook.on_bookmark_created(&bookmark(2, "second")).unwrap();

        let content = std::fs::read_to_string(hook.path()).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "id,title,url,notes,date_added",
                "1,first,http://www.example.com,\"notes, with a comma\",2024-05-06",
                "2,second,http://www.example.com,\"notes, with a comma\",2024-05-06",
            ]
        );
    }

    #[test]
    fn row_starts_on_new_line_when_file_lacks_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let hook = CsvAuditHook::new(dir.path().join("audit.csv"));
        std::fs::write(hook.path(), "id,title,url,notes,date_added").unwrap();

        hook.on_bookmark_created(&bookmark(1, "first")).unwrap();

        let content = std::fs::read_to_string(hook.path()).unwrap();
        assert_eq!(
            content,
            "id,title,url,notes,date_added\n\
             1,first,http://www.example.com,\"notes, with a comma\",2024-05-06\n"
        );
    }

    #[test]
    fn missing_parent_directory_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let hook = CsvAuditHook::new(dir.path().join("missing").join("audit.csv"));

        let err = hook.on_bookmark_created(&bookmark(1, "first")).unwrap_err();
        assert!(matches!(err, HookError::Io(_)));
    }
}
