// src/brute/engine.rs
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::Local;
use log::{debug, info, warn};
use crate::output::{ResultRecord, ResultRecorder};
use super::probe::DEFAULT_TIMEOUT;
use super::{AttemptOutcome, AuthProbe, Credential, CredentialSource, ProbeTarget};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// 单次尝试的超时
    pub timeout: Duration,
    /// 两次尝试之间的间隔
    pub delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Found,
    Exhausted,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Found | SessionState::Exhausted | SessionState::Aborted)
    }
}

/// Outcome of one engine run.
///
/// Created fresh by every [`BruteForceEngine::run`] call and handed back to
/// the caller; nothing in it is shared between runs.
#[derive(Debug, Clone)]
pub struct BruteForceSession {
    pub target: ProbeTarget,
    pub state: SessionState,
    pub total: usize,
    pub attempts: usize,
    pub auth_failures: usize,
    pub network_errors: usize,
    pub found: Option<Credential>,
    /// 成功候选在序列中的位置(从1开始)
    pub found_at: Option<usize>,
    pub artifact: Option<PathBuf>,
    pub persistence_error: Option<String>,
    pub elapsed: Duration,
}

impl BruteForceSession {
    fn new(target: ProbeTarget, total: usize) -> Self {
        Self {
            target,
            state: SessionState::Idle,
            total,
            attempts: 0,
            auth_failures: 0,
            network_errors: 0,
            found: None,
            found_at: None,
            artifact: None,
            persistence_error: None,
            elapsed: Duration::ZERO,
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            !self.state.is_terminal(),
            "session already finished as {:?}",
            self.state
        );
        debug!("Session {}: {:?} -> {:?}", self.target, self.state, next);
        self.state = next;
    }

    pub fn is_found(&self) -> bool {
        self.state == SessionState::Found
    }
}

/// Advisory progress report emitted after every attempt.
#[derive(Debug)]
pub struct Progress<'a> {
    /// 1-based position of the attempt just made
    pub index: usize,
    pub total: usize,
    pub elapsed: Duration,
    pub credential: &'a Credential,
    pub outcome: &'a AttemptOutcome,
    pub network_errors: usize,
}

/// Cooperative cancellation flag, checked between attempts.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives candidates from a [`CredentialSource`] through an [`AuthProbe`],
/// one at a time and in order, until one succeeds or the list runs out.
pub struct BruteForceEngine<P> {
    probe: P,
    config: EngineConfig,
    recorder: Option<Box<dyn ResultRecorder>>,
}

impl<P: AuthProbe> BruteForceEngine<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            config: EngineConfig::default(),
            recorder: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_recorder(mut self, recorder: impl ResultRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    pub async fn run<F>(
        &self,
        target: ProbeTarget,
        source: &CredentialSource,
        cancel: &CancelHandle,
        mut on_progress: F,
    ) -> BruteForceSession
    where
        F: FnMut(&Progress<'_>),
    {
        let mut session = BruteForceSession::new(target, source.len());
        let start = Instant::now();

        session.transition(SessionState::Running);
        info!(
            "Starting {} brute force on {} with {}",
            self.probe.service(),
            session.target,
            source.describe()
        );

        let mut candidates = source.iter().peekable();
        while let Some(credential) = candidates.next() {
            if cancel.is_cancelled() {
                info!("Brute force on {} cancelled after {} attempts", session.target, session.attempts);
                session.transition(SessionState::Aborted);
                break;
            }

            let outcome = self
                .probe
                .attempt(&session.target, &credential, self.config.timeout)
                .await;
            session.attempts += 1;

            match &outcome {
                AttemptOutcome::Success => {}
                AttemptOutcome::AuthFailure => {
                    session.auth_failures += 1;
                    debug!("Rejected {} on {}", credential, session.target);
                }
                AttemptOutcome::NetworkError(detail) => {
                    session.network_errors += 1;
                    warn!(
                        "Network error on {} (attempt {}/{}): {}",
                        session.target, session.attempts, session.total, detail
                    );
                }
            }

            on_progress(&Progress {
                index: session.attempts,
                total: session.total,
                elapsed: start.elapsed(),
                credential: &credential,
                outcome: &outcome,
                network_errors: session.network_errors,
            });

            if outcome.is_success() {
                info!(
                    "Valid credentials for {} found at attempt {}: {}",
                    session.target, session.attempts, credential.username
                );
                session.transition(SessionState::Found);
                session.found_at = Some(session.attempts);
                self.record_success(&mut session, &credential);
                session.found = Some(credential);
                break;
            }

            // 成功后和最后一个候选之后都不再等待
            if candidates.peek().is_some() && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        if !session.state.is_terminal() {
            info!(
                "No valid credentials for {} after {} attempts ({} network errors)",
                session.target, session.attempts, session.network_errors
            );
            session.transition(SessionState::Exhausted);
        }

        session.elapsed = start.elapsed();
        session
    }

    fn record_success(&self, session: &mut BruteForceSession, credential: &Credential) {
        let Some(recorder) = &self.recorder else {
            return;
        };

        let record = ResultRecord {
            service: self.probe.service().to_string(),
            target: session.target.host.clone(),
            port: session.target.port,
            username: credential.username.clone(),
            password: credential.password.clone(),
            timestamp: Local::now(),
        };

        match recorder.record(&record) {
            Ok(path) => {
                info!("Results saved to {}", path.display());
                session.artifact = Some(path);
            }
            Err(e) => {
                // 保存失败不影响Found状态
                warn!("{}", e);
                session.persistence_error = Some(e.to_string());
            }
        }
    }
}
