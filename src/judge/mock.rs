use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{JudgeError, JudgeResult};
use super::types::{JudgeRequest, JudgeVerdict, SemanticJudge};

/// What a [`MockJudge`] does for one call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Returns this confidence (not validated; out-of-range values exercise the gate).
    Confidence(f64),
    Fail(JudgeError),
    /// Never completes; only a timeout ends the call.
    Hang,
}

/// Scripted in-memory judge for tests.
///
/// Responses are resolved in order: queued script entries, then per-pair
/// overrides (order-insensitive), then the default.
pub struct MockJudge {
    name: String,
    default: MockResponse,
    pairs: HashMap<(String, String), MockResponse>,
    script: Mutex<VecDeque<MockResponse>>,
    delay: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<JudgeRequest>>,
}

impl MockJudge {
    pub fn new(confidence: f64) -> Self {
        Self::with_default(MockResponse::Confidence(confidence))
    }

    pub fn failing(error: JudgeError) -> Self {
        Self::with_default(MockResponse::Fail(error))
    }

    pub fn hanging() -> Self {
        Self::with_default(MockResponse::Hang)
    }

    fn with_default(default: MockResponse) -> Self {
        Self {
            name: "mock".to_string(),
            default,
            pairs: HashMap::new(),
            script: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sleeps this long before answering every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_pair(mut self, a: &str, b: &str, response: MockResponse) -> Self {
        self.pairs.insert(Self::pair_key(a, b), response);
        self
    }

    /// Queues responses consumed by the next calls, in order.
    pub fn with_script(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.script.lock().extend(responses);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<JudgeRequest> {
        self.requests.lock().clone()
    }

    fn pair_key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    fn resolve(&self, request: &JudgeRequest) -> MockResponse {
        if let Some(next) = self.script.lock().pop_front() {
            return next;
        }
        self.pairs
            .get(&Self::pair_key(&request.name_a, &request.name_b))
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl SemanticJudge for MockJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn judge(&self, request: &JudgeRequest) -> JudgeResult<JudgeVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let response = self.resolve(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match response {
            MockResponse::Confidence(confidence) => {
                Ok(JudgeVerdict::new(confidence, format!("mock verdict {confidence}")))
            }
            MockResponse::Fail(error) => Err(error),
            MockResponse::Hang => {
                std::future::pending::<()>().await;
                Err(JudgeError::Cancelled)
            }
        }
    }
}
