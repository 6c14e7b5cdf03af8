use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::debug;

/// Append-only record of the commands heard while active.
///
/// Writing is best effort: a log that cannot be written is skipped silently.
#[derive(Debug, Clone)]
pub struct CommandLog {
    path: PathBuf,
}

impl CommandLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, when: OffsetDateTime, command: &str) {
        if let Err(e) = self.try_append(when, command) {
            debug!("Skipping command log entry: {}", e);
        }
    }

    fn try_append(&self, when: OffsetDateTime, command: &str) -> std::io::Result<()> {
        let stamp = when
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .map_err(std::io::Error::other)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}: {}", stamp, command)
    }
}
