// src/brute/ssh.rs
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use async_trait::async_trait;
use log::debug;
use ssh2::{ErrorCode, Session};
use tokio::time::timeout;
use super::{AttemptOutcome, AuthProbe, Credential, ProbeTarget};

// libssh2: LIBSSH2_ERROR_AUTHENTICATION_FAILED
const LIBSSH2_ERROR_AUTHENTICATION_FAILED: i32 = -18;

/// SSH password authentication backed by libssh2.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshProbe;

impl SshProbe {
    pub fn new() -> Self {
        SshProbe
    }
}

#[async_trait]
impl AuthProbe for SshProbe {
    fn service(&self) -> &'static str {
        "ssh"
    }

    async fn attempt(
        &self,
        target: &ProbeTarget,
        credential: &Credential,
        timeout_duration: Duration,
    ) -> AttemptOutcome {
        let host = target.host.clone();
        let port = target.port;
        let username = credential.username.clone();
        let password = credential.password.clone();
        let deadline = Instant::now() + timeout_duration;

        let live = Arc::new(LiveStream::default());
        let worker_live = live.clone();

        // ssh2是阻塞库，放到spawn_blocking里执行
        let mut task = tokio::task::spawn_blocking(move || {
            try_ssh_login(&host, port, &username, &password, deadline, &worker_live)
        });

        // 到期后切断socket，并等待阻塞任务真正结束再返回
        let (joined, timed_out) = match timeout(timeout_duration, &mut task).await {
            Ok(joined) => (joined, false),
            Err(_) => {
                live.sever();
                (task.await, true)
            }
        };

        match joined {
            Ok(AttemptOutcome::NetworkError(detail)) if timed_out => AttemptOutcome::NetworkError(format!(
                "timed out after {:.1}s ({})",
                timeout_duration.as_secs_f64(),
                detail
            )),
            Ok(outcome) => outcome,
            Err(e) => AttemptOutcome::NetworkError(format!("SSH task failed: {}", e)),
        }
    }
}

/// 当前尝试正在使用的TCP连接，超时时由异步侧关闭
#[derive(Debug, Default)]
struct LiveStream {
    slot: Mutex<LiveSlot>,
}

#[derive(Debug, Default)]
struct LiveSlot {
    stream: Option<TcpStream>,
    severed: bool,
}

impl LiveStream {
    /// Returns false when the attempt was already severed; the stream is shut down then.
    fn track(&self, stream: &TcpStream) -> bool {
        let Ok(mut slot) = self.slot.lock() else {
            return true;
        };

        if slot.severed {
            let _ = stream.shutdown(Shutdown::Both);
            return false;
        }
        slot.stream = stream.try_clone().ok();
        true
    }

    fn sever(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.severed = true;
            if let Some(stream) = slot.stream.take() {
                let _ = stream.shutdown(Shutdown::Both);
            }
        }
    }
}

fn remaining(deadline: Instant) -> Option<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    (!left.is_zero()).then_some(left)
}

fn timeout_ms(left: Duration) -> u32 {
    left.as_millis().clamp(1, u32::MAX as u128) as u32
}

fn try_ssh_login(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    deadline: Instant,
    live: &LiveStream,
) -> AttemptOutcome {
    let addrs: Vec<SocketAddr> = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(e) => return AttemptOutcome::NetworkError(format!("cannot resolve {}: {}", host, e)),
    };

    let tcp = match connect_any(&addrs, deadline) {
        Ok(tcp) => tcp,
        Err(e) => return AttemptOutcome::NetworkError(format!("TCP connection failed: {}", e)),
    };

    if !live.track(&tcp) {
        return AttemptOutcome::NetworkError("connection closed at deadline".into());
    }

    let mut session = match Session::new() {
        Ok(session) => session,
        Err(e) => return AttemptOutcome::NetworkError(format!("failed to create SSH session: {}", e)),
    };
    session.set_tcp_stream(tcp);

    // 每个阶段只给剩余时间
    let Some(left) = remaining(deadline) else {
        return AttemptOutcome::NetworkError("deadline reached before handshake".into());
    };
    session.set_timeout(timeout_ms(left));

    if let Err(e) = session.handshake() {
        return AttemptOutcome::NetworkError(format!("SSH handshake failed: {}", e));
    }

    let Some(left) = remaining(deadline) else {
        return AttemptOutcome::NetworkError("deadline reached before authentication".into());
    };
    session.set_timeout(timeout_ms(left));

    let result = session.userauth_password(username, password);
    let outcome = classify_auth(result, session.authenticated());

    let _ = session.disconnect(None, "bye", None);
    outcome
}

/// 把libssh2的认证结果映射为尝试结果
fn classify_auth(result: Result<(), ssh2::Error>, authenticated: bool) -> AttemptOutcome {
    match result {
        Ok(()) if authenticated => AttemptOutcome::Success,
        Ok(()) => AttemptOutcome::AuthFailure,
        Err(e) if is_auth_rejection(&e) => AttemptOutcome::AuthFailure,
        Err(e) => AttemptOutcome::NetworkError(format!("authentication error: {}", e)),
    }
}

fn connect_any(addrs: &[SocketAddr], deadline: Instant) -> std::io::Result<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        let Some(left) = remaining(deadline) else {
            break;
        };
        match TcpStream::connect_timeout(addr, left) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::TimedOut, "no address reachable before deadline")
    }))
}

fn is_auth_rejection(e: &ssh2::Error) -> bool {
    matches!(e.code(), ErrorCode::Session(LIBSSH2_ERROR_AUTHENTICATION_FAILED))
        || e.message().contains("Authentication failed")
}
