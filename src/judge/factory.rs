use std::sync::Arc;

use tracing::info;

use super::config::{JudgeConfig, JudgeProvider};
use super::error::{JudgeError, JudgeResult};
use super::http::HttpJudge;
use super::llm::GenaiJudge;
use super::types::SemanticJudge;

/// Primary and optional verify-tier judges built from configuration.
#[derive(Clone, Default)]
pub struct JudgeSet {
    pub judge: Option<Arc<dyn SemanticJudge>>,
    pub verifier: Option<Arc<dyn SemanticJudge>>,
}

/// Builds the configured judges. `Disabled` providers yield `None`.
pub fn build_judges(config: &JudgeConfig) -> JudgeResult<JudgeSet> {
    let judge = build_one(
        config.provider,
        config.endpoint.as_deref(),
        config.api_key.clone(),
        &config.model,
    )?;
    let verifier = build_one(
        config.verify_provider,
        config.verify_endpoint.as_deref(),
        config.api_key.clone(),
        &config.verify_model,
    )?;

    info!(
        provider = config.provider.as_str(),
        verify_provider = config.verify_provider.as_str(),
        "Semantic judges configured"
    );

    Ok(JudgeSet { judge, verifier })
}

fn build_one(
    provider: JudgeProvider,
    endpoint: Option<&str>,
    api_key: Option<String>,
    model: &str,
) -> JudgeResult<Option<Arc<dyn SemanticJudge>>> {
    let judge: Arc<dyn SemanticJudge> = match provider {
        JudgeProvider::Disabled => return Ok(None),
        JudgeProvider::Http => {
            let endpoint = endpoint.ok_or_else(|| JudgeError::NotConfigured {
                reason: "http judge requires an endpoint".to_string(),
            })?;
            Arc::new(HttpJudge::new(endpoint, api_key)?)
        }
        JudgeProvider::Genai => Arc::new(GenaiJudge::new(model)),
    };
    Ok(Some(judge))
}
