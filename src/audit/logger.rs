use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Output recorded for one gate-permitted command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub command: String,
    pub output: String,
    /// `None` for dry-run placeholders, spawn failures and signalled processes
    pub exit_code: Option<i32>,
}

impl CommandResult {
    pub fn new(command: impl Into<String>, output: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            exit_code,
        }
    }
}

/// Append-only transcript of executed batches
pub struct SessionLogger {
    log_path: PathBuf,
}

impl SessionLogger {
    /// Create a SessionLogger writing to `path`
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        // Ensure directory exists
        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_path })
    }

    /// Append one batch under a timestamp header
    ///
    /// The file is opened, written and closed within this call.
    pub fn log_batch(&self, results: &[CommandResult]) -> std::io::Result<()> {
        // Check and rotate log if needed
        self.rotate_if_needed()?;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string();
        let entry = Self::format_batch(&timestamp, results);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    fn format_batch(timestamp: &str, results: &[CommandResult]) -> String {
        let mut entry = format!("\n==== {} ====\n", timestamp);
        for result in results {
            entry.push_str(&format!("$ {}\n{}\n", result.command, result.output));
        }
        entry.push_str("==== END ====\n");
        entry
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // Rotate: log.txt -> log.txt.1
            let mut backup = self.log_path.clone().into_os_string();
            backup.push(".1");
            tracing::warn!(path = %self.log_path.display(), "rotating session log");
            fs::rename(&self.log_path, PathBuf::from(backup))?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_logger() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("test.log");

        let logger = SessionLogger::with_path(&log_path).unwrap();
        assert_eq!(logger.log_path(), log_path);
        assert!(log_path.parent().unwrap().exists());
        assert!(!log_path.exists());
    }

    #[test]
    fn test_format_batch() {
        let results = vec![
            CommandResult::new("mkdir /tmp/foo", "", Some(0)),
            CommandResult::new("echo done", "done\n", Some(0)),
        ];

        let entry = SessionLogger::format_batch("2026-01-01 10:00:00.000000", &results);
        assert_eq!(
            entry,
            "\n==== 2026-01-01 10:00:00.000000 ====\n\
             $ mkdir /tmp/foo\n\n\
             $ echo done\ndone\n\n\
             ==== END ====\n"
        );
    }

    #[test]
    fn test_log_batch() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");
        let logger = SessionLogger::with_path(&log_path).unwrap();

        logger
            .log_batch(&[CommandResult::new("echo hi", "hi\n", Some(0))])
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.starts_with("\n==== "));
        assert!(content.contains("$ echo hi\nhi\n"));
        assert!(content.ends_with("==== END ====\n"));
    }

    #[test]
    fn test_batches_are_appended() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");
        let logger = SessionLogger::with_path(&log_path).unwrap();

        logger
            .log_batch(&[CommandResult::new("echo one", "one\n", Some(0))])
            .unwrap();
        logger
            .log_batch(&[CommandResult::new("echo two", "two\n", Some(0))])
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.matches("==== END ====").count(), 2);
        assert!(content.find("echo one").unwrap() < content.find("echo two").unwrap());
    }

    #[test]
    fn test_empty_batch_still_logged() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");
        let logger = SessionLogger::with_path(&log_path).unwrap();

        logger.log_batch(&[]).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(!content.contains("$ "));
        assert!(content.contains("==== END ===="));
    }

    #[test]
    fn test_log_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");
        let logger = SessionLogger::with_path(&log_path).unwrap();

        // Write a large entry to trigger rotation
        let large_output = "x".repeat(MAX_LOG_SIZE as usize);
        logger
            .log_batch(&[CommandResult::new("cat big", large_output, Some(0))])
            .unwrap();

        // Write another entry - should trigger rotation
        logger
            .log_batch(&[CommandResult::new("echo small", "small\n", Some(0))])
            .unwrap();

        let backup_path = temp_dir.path().join("test.log.1");
        assert!(backup_path.exists());

        let metadata = fs::metadata(&log_path).unwrap();
        assert!(metadata.len() < MAX_LOG_SIZE);
        assert!(fs::read_to_string(&log_path).unwrap().contains("echo small"));
    }
}
