//! Append-only transcript stores.
//!
//! The shell writes every echoed block, every reply read from the user, and
//! the command table at startup into a [`TranscriptSink`]. The default sink,
//! [`DailyFileTranscript`], keeps one file per calendar day.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use shellcraft_types::error::{Result, ShellError};

/// A store accepting transcript entries.
pub trait TranscriptSink {
    /// Append one entry. Multi-line text is a single entry.
    fn append(&mut self, text: &str) -> Result<()>;

    /// Persist anything buffered.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Format one transcript entry: `[2024/Mar/5 9:7:3] text\n`.
///
/// Day and time fields are not zero padded.
pub fn format_entry(at: NaiveDateTime, text: &str) -> String {
    format!("[{}] {text}\n", at.format("%Y/%b/%-d %-H:%-M:%-S"))
}

/// One append-only log file per day, `<dir>/<YYYY-MM-DD>.log`.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct DailyFileTranscript {
    dir: PathBuf,
}

impl DailyFileTranscript {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.log", date.format("%Y-%m-%d")))
    }

    /// Append an entry stamped with `at` to that day's file.
    pub fn append_at(&mut self, at: NaiveDateTime, text: &str) -> Result<()> {
        let path = self.path_for(at.date());
        fs::create_dir_all(&self.dir).map_err(|e| write_failed(&self.dir, &e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| write_failed(&path, &e))?;
        file.write_all(format_entry(at, text).as_bytes())
            .map_err(|e| write_failed(&path, &e))?;
        Ok(())
    }
}

fn write_failed(path: &Path, e: &io::Error) -> ShellError {
    ShellError::Transcript(format!("{}: {e}", path.display()))
}

impl TranscriptSink for DailyFileTranscript {
    fn append(&mut self, text: &str) -> Result<()> {
        self.append_at(Local::now().naive_local(), text)
    }
}

/// In-memory transcript. Clones share the same entries, so a test can keep
/// a handle after boxing one into a shell.
#[derive(Debug, Clone, Default)]
pub struct MemoryTranscript {
    entries: Rc<RefCell<Vec<String>>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries written so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl TranscriptSink for MemoryTranscript {
    fn append(&mut self, text: &str) -> Result<()> {
        self.entries.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn entry_format_is_unpadded() {
        let line = format_entry(at(2024, 3, 5, 9, 7, 3), "hello");
        assert_eq!(line, "[2024/Mar/5 9:7:3] hello\n");
    }

    #[test]
    fn entry_format_two_digit_fields() {
        let line = format_entry(at(2023, 12, 31, 23, 59, 58), "bye");
        assert_eq!(line, "[2023/Dec/31 23:59:58] bye\n");
    }

    #[test]
    fn multiline_text_is_one_entry() {
        let line = format_entry(at(2024, 1, 1, 0, 0, 0), "a\nb");
        assert_eq!(line, "[2024/Jan/1 0:0:0] a\nb\n");
    }

    #[test]
    fn path_uses_iso_date() {
        let t = DailyFileTranscript::new("latest");
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(t.path_for(date), PathBuf::from("latest/2024-03-05.log"));
    }

    #[test]
    fn creates_directory_and_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("latest");
        let mut t = DailyFileTranscript::new(&dir);
        assert_eq!(t.dir(), dir.as_path());
        assert!(!dir.exists());

        t.append_at(at(2024, 3, 5, 9, 0, 0), "first").unwrap();
        t.append_at(at(2024, 3, 5, 9, 0, 1), "second").unwrap();

        let text = fs::read_to_string(dir.join("2024-03-05.log")).unwrap();
        assert_eq!(text, "[2024/Mar/5 9:0:0] first\n[2024/Mar/5 9:0:1] second\n");
    }

    #[test]
    fn unwritable_directory_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("occupied");
        fs::write(&blocker, "not a directory").unwrap();
        let mut t = DailyFileTranscript::new(blocker.join("logs"));
        let err = t.append_at(at(2024, 3, 5, 9, 0, 0), "lost").unwrap_err();
        assert!(matches!(err, ShellError::Transcript(_)));
        assert!(err.to_string().contains("occupied"));
    }

    #[test]
    fn new_day_new_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = DailyFileTranscript::new(tmp.path());
        t.append_at(at(2024, 3, 5, 23, 59, 59), "late").unwrap();
        t.append_at(at(2024, 3, 6, 0, 0, 0), "early").unwrap();
        assert!(tmp.path().join("2024-03-05.log").exists());
        assert!(tmp.path().join("2024-03-06.log").exists());
    }

    #[test]
    fn append_uses_current_day() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = DailyFileTranscript::new(tmp.path());
        t.append("now").unwrap();
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn memory_transcript_shares_entries() {
        let t = MemoryTranscript::new();
        let mut boxed: Box<dyn TranscriptSink> = Box::new(t.clone());
        boxed.append("one").unwrap();
        boxed.append("two").unwrap();
        boxed.flush().unwrap();
        assert_eq!(t.entries(), vec!["one", "two"]);
    }
}
