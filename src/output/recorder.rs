// src/output/recorder.rs
use std::path::PathBuf;
use chrono::{DateTime, Local};
use crate::common::utils;
use crate::error::{Error, Result};
use crate::output::file;

/// 一次成功破解的记录，写入后不再修改
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub service: String,
    pub target: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timestamp: DateTime<Local>,
}

impl ResultRecord {
    pub fn render(&self) -> String {
        let title = format!("{} Brute Force Results", self.service.to_uppercase());
        let mut content = String::new();

        content.push_str(&format!("{}\n", title));
        content.push_str(&format!("{}\n\n", "=".repeat(title.len() - 1)));
        content.push_str(&format!("Target: {}\n", self.target));
        content.push_str(&format!("Port: {}\n", self.port));
        content.push_str(&format!("Timestamp: {}\n\n", self.timestamp.format("%Y-%m-%d %H:%M:%S")));
        content.push_str("Successful Credentials:\n");
        content.push_str(&format!("Username: {}\n", self.username));
        content.push_str(&format!("Password: {}\n", self.password));

        content
    }

    /// 文件名主体: `<service>_brute_force_<target>_<YYYYmmdd_HHMMSS>`
    pub fn file_stem(&self) -> String {
        format!(
            "{}_brute_force_{}_{}",
            self.service,
            utils::sanitize_target(&self.target),
            self.timestamp.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Persists a successful brute force result.
pub trait ResultRecorder: Send + Sync {
    fn record(&self, record: &ResultRecord) -> Result<PathBuf>;
}

/// Writes one plain-text artifact per success into a results directory.
#[derive(Debug, Clone)]
pub struct FileRecorder {
    results_dir: PathBuf,
}

impl FileRecorder {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self { results_dir: results_dir.into() }
    }
}

impl ResultRecorder for FileRecorder {
    fn record(&self, record: &ResultRecord) -> Result<PathBuf> {
        file::write_new_file(&self.results_dir, &record.file_stem(), "txt", &record.render())
            .map_err(|e| Error::Persistence(format!("{}: {}", self.results_dir.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> ResultRecord {
        ResultRecord {
            service: "ssh".into(),
            target: "10.0.0.5".into(),
            port: 2222,
            username: "root".into(),
            password: "toor".into(),
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        }
    }

    #[test]
    fn render_contains_all_fields() {
        let text = sample().render();
        assert!(text.starts_with("SSH Brute Force Results\n======================\n\n"));
        assert!(text.contains("Target: 10.0.0.5\n"));
        assert!(text.contains("Port: 2222\n"));
        assert!(text.contains("Timestamp: 2024-03-09 14:05:07\n"));
        assert!(text.contains("Username: root\n"));
        assert!(text.contains("Password: toor\n"));
    }

    #[test]
    fn file_name_uses_sanitized_target_and_timestamp() {
        assert_eq!(sample().file_stem(), "ssh_brute_force_10_0_0_5_20240309_140507");
    }

    #[test]
    fn recording_twice_keeps_both_artifacts() {
        let dir = tempdir().expect("temp dir created");
        let recorder = FileRecorder::new(dir.path().join("results"));

        let first = recorder.record(&sample()).unwrap();
        let second = recorder.record(&sample()).unwrap();

        assert_ne!(first, second);
        assert!(fs::read_to_string(first).unwrap().contains("Password: toor"));
        assert!(fs::read_to_string(second).unwrap().contains("Password: toor"));
    }

    #[test]
    fn unwritable_directory_is_a_persistence_error() {
        let dir = tempdir().expect("temp dir created");
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let err = FileRecorder::new(&blocker).record(&sample()).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
