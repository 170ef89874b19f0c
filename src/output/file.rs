// src/output/file.rs
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 在 `dir` 下以 `stem.ext` 新建文件，不覆盖已有文件
///
/// 名字已存在时依次尝试 `stem_1.ext`、`stem_2.ext`…，返回实际写入的路径。
pub fn write_new_file(
    dir: &Path,
    stem: &str,
    ext: &str,
    content: &str,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let mut suffix = 0u32;
    loop {
        let name = if suffix == 0 {
            format!("{}.{}", stem, ext)
        } else {
            format!("{}_{}.{}", stem, suffix, ext)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(content.as_bytes())?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn new_file_never_overwrites() {
        let dir = tempdir().expect("temp dir created");

        let first = write_new_file(dir.path(), "result", "txt", "one").unwrap();
        let second = write_new_file(dir.path(), "result", "txt", "two").unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("result_1.txt"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "one");
        assert_eq!(fs::read_to_string(&second).unwrap(), "two");
    }
}
