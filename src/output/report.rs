// src/output/report.rs
use std::path::{Path, PathBuf};
use chrono::Local;
use crate::common::utils;
use crate::error::{Error, Result};
use crate::output::file;
use crate::scanner::ScanResult;

/// 把扫描结果保存为JSON: `scan_<target>_<YYYYmmdd_HHMMSS>.json`
pub fn save_scan(results_dir: &Path, result: &ScanResult) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| Error::Persistence(e.to_string()))?;

    let stem = format!(
        "scan_{}_{}",
        utils::sanitize_target(&result.target),
        Local::now().format("%Y%m%d_%H%M%S")
    );

    file::write_new_file(results_dir, &stem, "json", &json)
        .map_err(|e| Error::Persistence(format!("{}: {}", results_dir.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{OpenPort, ScanProfile};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scan_result_is_saved_as_json() {
        let dir = tempdir().expect("temp dir created");
        let result = ScanResult {
            target: "127.0.0.1".into(),
            address: "127.0.0.1".parse().unwrap(),
            profile: ScanProfile::Basic,
            timestamp: "2024-03-09 14:05:07".into(),
            ports_scanned: 1000,
            open_ports: vec![OpenPort {
                port: 22,
                service: "ssh".into(),
                banner: None,
                version: None,
            }],
        };

        let path = save_scan(dir.path(), &result).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("scan_127_0_0_1_"));
        assert!(name.ends_with(".json"));

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["profile"], "basic");
        assert_eq!(value["open_ports"][0]["port"], 22);
        assert_eq!(value["open_ports"][0]["service"], "ssh");
    }
}
