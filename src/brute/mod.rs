// src/brute/mod.rs
pub mod source;
pub mod probe;
pub mod ssh;
pub mod engine;

use std::fmt;

pub use source::CredentialSource;
pub use probe::{AuthProbe, ProbeTarget};
pub use ssh::SshProbe;
pub use engine::{BruteForceEngine, BruteForceSession, CancelHandle, EngineConfig, Progress, SessionState};

/// 待测试的一组用户名/密码
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// 解析 `username:password`，只按第一个冒号拆分
    pub fn parse_pair(line: &str) -> Option<Self> {
        let (username, password) = line.split_once(':')?;
        Some(Self::new(username.trim(), password.trim()))
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.username, self.password)
    }
}

/// 单次认证尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    AuthFailure,
    NetworkError(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}
