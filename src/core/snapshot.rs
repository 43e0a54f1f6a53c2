//! Durable snapshots of the record list.
//!
//! A harvest run persists its records at two kinds of points:
//!
//! - **checkpoints**, every N accepted records, named
//!   `backup_{name}_until_{total:05}_{channel}_ID{message_id:07}.{ext}`
//! - the **final** snapshot, once per run, named
//!   `FINAL_{name}_with_{total:05}.{ext}`
//!
//! Each snapshot contains every record collected so far, so a later file
//! always supersedes an earlier one.

use std::path::{Path, PathBuf};

use crate::core::models::MessageRecord;
use crate::error::Result;
use crate::format::{OutputFormat, write_to_format};

const MAX_SLUG_LEN: usize = 64;

/// What a snapshot is being written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind<'a> {
    /// Periodic backup taken while scanning `channel`.
    Checkpoint {
        total: u64,
        channel: &'a str,
        message_id: u64,
    },
    /// End-of-run dataset.
    Final { total: u64 },
}

/// Persists an ordered record list.
///
/// Implementations must write all of `records`, in order, and return where
/// they put them.
pub trait SnapshotWriter: Send + Sync {
    fn write(&self, records: &[MessageRecord], kind: SnapshotKind<'_>) -> Result<PathBuf>;
}

/// Writes snapshots as files in one directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotWriter {
    dir: PathBuf,
    name: String,
    format: OutputFormat,
}

impl FileSnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Full path a snapshot of the given kind would be written to.
    pub fn path_for(&self, kind: SnapshotKind<'_>) -> PathBuf {
        let ext = self.format.extension();
        let file = match kind {
            SnapshotKind::Checkpoint {
                total,
                channel,
                message_id,
            } => checkpoint_file_name(&self.name, total, channel, message_id, ext),
            SnapshotKind::Final { total } => final_file_name(&self.name, total, ext),
        };
        self.dir.join(file)
    }
}

impl SnapshotWriter for FileSnapshotWriter {
    fn write(&self, records: &[MessageRecord], kind: SnapshotKind<'_>) -> Result<PathBuf> {
        let path = self.path_for(kind);
        write_to_format(records, &path, self.format)?;
        tracing::info!(path = %path.display(), rows = records.len(), "snapshot written");
        Ok(path)
    }
}

/// `backup_{name}_until_{total:05}_{channel}_ID{message_id:07}.{ext}`
pub fn checkpoint_file_name(
    name: &str,
    total: u64,
    channel: &str,
    message_id: u64,
    ext: &str,
) -> String {
    format!(
        "backup_{}_until_{:05}_{}_ID{:07}.{}",
        name,
        total,
        channel_slug(channel),
        message_id,
        ext
    )
}

/// `FINAL_{name}_with_{total:05}.{ext}`
pub fn final_file_name(name: &str, total: u64, ext: &str) -> String {
    format!("FINAL_{}_with_{:05}.{}", name, total, ext)
}

/// Makes a channel identifier safe to embed in a file name.
///
/// Path separators, characters Windows forbids, whitespace and control
/// characters become `_`; runs of `_` collapse to one. An identifier with
/// nothing usable left becomes `channel`.
pub fn channel_slug(channel: &str) -> String {
    let mut slug = String::with_capacity(channel.len());
    let mut last_underscore = false;

    for c in channel.trim().chars() {
        let mapped = match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        };
        if mapped == '_' {
            if last_underscore {
                continue;
            }
            last_underscore = true;
        } else {
            last_underscore = false;
        }
        slug.push(mapped);
    }

    let trimmed: String = slug
        .trim_matches(|c| c == '_' || c == '.')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();

    if trimmed.is_empty() {
        "channel".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_file_name() {
        assert_eq!(
            checkpoint_file_name("run", 1000, "@news", 482_113, "xlsx"),
            "backup_run_until_01000_@news_ID0482113.xlsx"
        );
    }

    #[test]
    fn test_final_file_name() {
        assert_eq!(final_file_name("run", 3, "parquet"), "FINAL_run_with_00003.parquet");
        assert_eq!(final_file_name("run", 0, "xlsx"), "FINAL_run_with_00000.xlsx");
    }

    #[test]
    fn test_channel_slug() {
        assert_eq!(channel_slug("@news"), "@news");
        assert_eq!(channel_slug("https://t.me/news"), "https_t.me_news");
        assert_eq!(channel_slug("a  b\tc"), "a_b_c");
        assert_eq!(channel_slug("../../etc"), "etc");
        assert_eq!(channel_slug("///"), "channel");
        assert_eq!(channel_slug(&"x".repeat(200)).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_path_for() {
        let writer = FileSnapshotWriter::new("/data", "run", OutputFormat::Parquet);
        assert_eq!(
            writer.path_for(SnapshotKind::Final { total: 12 }),
            PathBuf::from("/data/FINAL_run_with_00012.parquet")
        );
        assert_eq!(
            writer.path_for(SnapshotKind::Checkpoint {
                total: 2000,
                channel: "a/b",
                message_id: 7,
            }),
            PathBuf::from("/data/backup_run_until_02000_a_b_ID0000007.parquet")
        );
    }

    #[cfg(feature = "parquet-output")]
    #[test]
    fn test_file_writer_writes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileSnapshotWriter::new(dir.path(), "t", OutputFormat::Parquet);
        let path = writer.write(&[], SnapshotKind::Final { total: 0 }).unwrap();
        assert!(path.exists());
    }
}
