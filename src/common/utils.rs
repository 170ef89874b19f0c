use std::fs;
use std::io;
use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};
use crate::error::{Error, Result};

/// 从字典文件中读取非空行
///
/// 非法的UTF-8字节直接丢弃，不视为错误；每行去掉首尾空白。
/// 文件不存在返回 `MissingFile`，其他读取失败返回 `Io`。
pub fn read_list_file(file_path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = file_path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::MissingFile { path: path.to_path_buf() },
        _ => Error::Io { path: path.to_path_buf(), source: e },
    })?;

    Ok(decode_lines(&bytes))
}

/// 按行拆分字节内容，跳过空行
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes).replace(char::REPLACEMENT_CHARACTER, "");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 把目标转换成可用于文件名的形式
pub fn sanitize_target(target: &str) -> String {
    target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// 创建进度条
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn blank_lines_are_skipped_and_entries_trimmed() {
        let lines = decode_lines(b"root\n\n  admin  \r\n\t\nguest");
        assert_eq!(lines, vec!["root", "admin", "guest"]);
    }

    #[test]
    fn invalid_utf8_bytes_are_dropped() {
        let lines = decode_lines(b"pa\xffss\nok");
        assert_eq!(lines, vec!["pass", "ok"]);
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let dir = tempdir().expect("temp dir created");
        let err = read_list_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
        assert!(err.is_config());
    }

    #[test]
    fn reads_file_in_order() {
        let dir = tempdir().expect("temp dir created");
        let path = dir.path().join("words.txt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"123456\npassword\n\nletmein\n").unwrap();

        let lines = read_list_file(&path).unwrap();
        assert_eq!(lines, vec!["123456", "password", "letmein"]);
    }

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_target("192.168.1.10"), "192_168_1_10");
        assert_eq!(sanitize_target("fe80::1"), "fe80__1");
        assert_eq!(sanitize_target("ssh-host.lan"), "ssh-host_lan");
    }
}
