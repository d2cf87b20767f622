//! Chat-model judge backed by `genai`.

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};

use super::error::{JudgeError, JudgeResult};
use super::types::{JudgeRequest, JudgeVerdict, SemanticJudge, parse_verdict};

const SYSTEM_PROMPT: &str = "You decide whether two organization or person names refer to the \
same real-world entity. Reply with a single JSON object of the form \
{\"confidence\": <number between 0 and 1>, \"rationale\": \"<one sentence>\"} and nothing else.";

pub struct GenaiJudge {
    name: String,
    model: String,
    client: Client,
}

impl GenaiJudge {
    /// Provider credentials are resolved by `genai` from its usual environment variables.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            name: format!("genai:{model}"),
            model,
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn user_prompt(request: &JudgeRequest) -> String {
    let mut prompt = format!("Name A: {}\nName B: {}\n", request.name_a, request.name_b);
    if !request.normalized_a.is_empty() || !request.normalized_b.is_empty() {
        prompt.push_str(&format!(
            "Normalized A: {}\nNormalized B: {}\n",
            request.normalized_a, request.normalized_b
        ));
    }
    prompt.push_str(&format!(
        "Lexical similarity (0-100): {:.1}",
        request.lexical_hint
    ));
    prompt
}

fn classify_error(message: String) -> JudgeError {
    let lower = message.to_lowercase();
    if lower.contains("429") || lower.contains("rate limit") || lower.contains("quota") {
        JudgeError::Quota { reason: message }
    } else {
        JudgeError::Transport { reason: message }
    }
}

#[async_trait]
impl SemanticJudge for GenaiJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn judge(&self, request: &JudgeRequest) -> JudgeResult<JudgeVerdict> {
        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt(request)),
        ]);

        let resp = self
            .client
            .exec_chat(&self.model, chat_req, None)
            .await
            .map_err(|e| classify_error(e.to_string()))?;

        let text = resp
            .first_text()
            .ok_or_else(|| JudgeError::malformed("response contained no text"))?;

        parse_verdict(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_carries_both_names() {
        let prompt = user_prompt(&JudgeRequest::new("acme corp", "acme inc", 72.345));
        assert!(prompt.contains("Name A: acme corp"));
        assert!(prompt.contains("Name B: acme inc"));
        assert!(prompt.contains("72.3"));
        assert!(!prompt.contains("Normalized"));
    }

    #[test]
    fn test_user_prompt_shows_normalized_context() {
        let request = JudgeRequest::new("ACME Corp.", "Acme Incorporated", 72.0)
            .with_normalized("acme corporation", "acme incorporated");
        let prompt = user_prompt(&request);
        assert!(prompt.contains("Name A: ACME Corp."));
        assert!(prompt.contains("Normalized A: acme corporation"));
        assert!(prompt.contains("Normalized B: acme incorporated"));
    }

    #[test]
    fn test_error_classification() {
        assert!(matches!(
            classify_error("HTTP 429 Too Many Requests".into()),
            JudgeError::Quota { .. }
        ));
        assert!(matches!(
            classify_error("connection reset".into()),
            JudgeError::Transport { .. }
        ));
    }

    #[test]
    fn test_name_includes_model() {
        let judge = GenaiJudge::new("gpt-4o-mini");
        assert_eq!(judge.name(), "genai:gpt-4o-mini");
        assert_eq!(judge.model(), "gpt-4o-mini");
    }
}
