// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === 配置错误 (会话开始前) ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("List file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("List file has no usable entries: {}", .path.display())]
    EmptyList { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === 结果保存错误 ===
    #[error("Failed to save results: {0}")]
    Persistence(String),

    // === 端口扫描 ===
    #[error("Scan failed: {0}")]
    Scan(String),
}

impl Error {
    /// 是否属于会话开始前的配置类错误
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::MissingFile { .. } | Error::EmptyList { .. } | Error::Io { .. }
        )
    }
}
