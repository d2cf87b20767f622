use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::JudgeConfig;
use super::error::{JudgeError, JudgeResult};
use super::types::{JudgeRequest, JudgeVerdict, SemanticJudge};
use crate::stats::RunStatistics;

/// Bounded-concurrency front for a [`SemanticJudge`].
///
/// Applies the concurrency limit, per-call timeout and retry policy, and
/// records every attempt in the run's statistics.
#[derive(Clone)]
pub struct JudgeGate {
    judge: Arc<dyn SemanticJudge>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl JudgeGate {
    pub fn new(judge: Arc<dyn SemanticJudge>, config: &JudgeConfig) -> Self {
        Self {
            judge,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
        }
    }

    /// Permits currently free.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Submits one pair, retrying transient failures with linear backoff.
    ///
    /// Returns [`JudgeError::Cancelled`] if `cancel` fires before the first
    /// attempt is submitted. Once submitted, an attempt runs to completion or
    /// timeout; cancellation only suppresses further retries.
    pub async fn call(
        &self,
        request: &JudgeRequest,
        cancel: &CancellationToken,
        stats: &RunStatistics,
    ) -> JudgeResult<JudgeVerdict> {
        if cancel.is_cancelled() {
            return Err(JudgeError::Cancelled);
        }

        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JudgeError::Cancelled),
            permit = Arc::clone(&self.permits).acquire_owned() => {
                permit.map_err(|_| JudgeError::Cancelled)?
            }
        };

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let started = Instant::now();
            let result = match tokio::time::timeout(self.timeout, self.judge.judge(request)).await
            {
                Ok(result) => result.and_then(JudgeVerdict::validated),
                Err(_) => {
                    stats.record_api_timeout();
                    Err(JudgeError::Timeout {
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    })
                }
            };
            stats.record_api_call(started.elapsed());

            match result {
                Ok(verdict) => {
                    debug!(
                        judge = self.judge.name(),
                        attempt,
                        confidence = verdict.confidence,
                        "Judge verdict received"
                    );
                    return Ok(verdict);
                }
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    if cancel.is_cancelled() {
                        return Err(e);
                    }
                    warn!(
                        judge = self.judge.name(),
                        attempt,
                        error = %e,
                        "Transient judge failure, retrying"
                    );
                    stats.record_api_retry();
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(e),
                        _ = tokio::time::sleep(self.retry_backoff * attempt) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl std::fmt::Debug for JudgeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeGate")
            .field("judge", &self.judge.name())
            .field("available_permits", &self.permits.available_permits())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
