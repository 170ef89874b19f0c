// src/brute/probe.rs
use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use super::{AttemptOutcome, Credential};

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 一次会话固定的目标主机和端口
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Single authentication attempt against a remote service.
///
/// Implementations make exactly one network-level attempt per call and
/// never retry. They must respect `timeout` and report a rejected login as
/// [`AttemptOutcome::AuthFailure`], keeping it apart from
/// [`AttemptOutcome::NetworkError`] (refused, timed out, unresolvable...).
#[async_trait]
pub trait AuthProbe: Send + Sync {
    fn service(&self) -> &'static str;

    async fn attempt(
        &self,
        target: &ProbeTarget,
        credential: &Credential,
        timeout: Duration,
    ) -> AttemptOutcome;
}
