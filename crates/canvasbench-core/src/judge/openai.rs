use super::{parse_judge_response, user_prompt, Judge, JudgeOutcome, SYSTEM_PROMPT};
use crate::config::JudgeConfig;
use crate::model::CaseResult;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::warn;

/// Judge backed by an OpenAI-compatible chat-completions endpoint, requesting
/// a structured `json_object` response.
pub struct OpenAiJudge {
    cfg: JudgeConfig,
    client: reqwest::Client,
}

impl OpenAiJudge {
    pub fn new(cfg: JudgeConfig) -> Self {
        Self {
            cfg,
            client: reqwest::Client::new(),
        }
    }

    async fn complete(&self, instruction: &str, final_state: Option<&Value>) -> anyhow::Result<CaseResult> {
        let url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.cfg.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(instruction, final_state) }
            ],
            "response_format": { "type": "json_object" },
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.cfg.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("judge API error: {}", error_text);
        }

        let json: Value = resp.json().await?;
        let content = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("judge API response missing content"))?;

        parse_judge_response(content)
    }
}

#[async_trait]
impl Judge for OpenAiJudge {
    async fn judge(&self, instruction: &str, final_state: Option<&Value>) -> JudgeOutcome {
        let start = Instant::now();
        let result = match self.complete(instruction, final_state).await {
            Ok(r) => r,
            Err(e) => {
                warn!("judge call failed, scoring 0: {e}");
                CaseResult::failed(format!("Error during evaluation: {e}"))
            }
        };
        JudgeOutcome {
            result,
            runtime_seconds: start.elapsed().as_secs_f64(),
        }
    }
}
