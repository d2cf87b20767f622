//! JSON-over-HTTP judge.
//!
//! POSTs `{name_a, name_b, lexical_hint, normalized_a, normalized_b}` and
//! expects `{confidence, rationale}`.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};

use super::error::{JudgeError, JudgeResult};
use super::types::{JudgeRequest, JudgeVerdict, SemanticJudge, parse_verdict};

const MAX_ERROR_BODY: usize = 256;

pub struct HttpJudge {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    http: HttpClient,
}

impl HttpJudge {
    /// Timeouts are enforced by [`JudgeGate`](super::JudgeGate), so the client has none.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> JudgeResult<Self> {
        let endpoint = endpoint.into();
        let http = HttpClient::builder()
            .build()
            .map_err(|e| JudgeError::NotConfigured {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            name: format!("http:{endpoint}"),
            endpoint,
            api_key,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify_status(status: StatusCode, body: String) -> JudgeError {
    let mut reason = body;
    if reason.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !reason.is_char_boundary(cut) {
            cut -= 1;
        }
        reason.truncate(cut);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        JudgeError::Quota { reason }
    } else if status.is_server_error() {
        JudgeError::Transport {
            reason: format!("{status}: {reason}"),
        }
    } else {
        JudgeError::Rejected {
            status: status.as_u16(),
            reason,
        }
    }
}

#[async_trait]
impl SemanticJudge for HttpJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn judge(&self, request: &JudgeRequest) -> JudgeResult<JudgeVerdict> {
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send().await.map_err(|e| JudgeError::Transport {
            reason: format!("request failed: {e}"),
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| JudgeError::Transport {
            reason: format!("failed to read response: {e}"),
        })?;

        if !status.is_success() {
            return Err(classify_status(status, body));
        }

        parse_verdict(&body)
    }
}
