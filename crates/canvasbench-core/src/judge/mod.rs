use crate::model::CaseResult;
use async_trait::async_trait;
use serde_json::Value;

pub mod openai;

pub const SYSTEM_PROMPT: &str = r#"You are an expert evaluator that judges how well user instructions were completed on a canvas interface.

Your task is to analyze the final state of a canvas and determine how successfully a user's instruction was fulfilled.

Evaluation criteria:
- Score 0: Instruction completely failed or ignored
- Score 1: Minimal progress, major elements missing or incorrect
- Score 2: Good progress, instruction mostly completed with minor issues
- Score 3: Perfect completion, instruction fully achieved as intended

You must respond with valid JSON in this exact format:
{
  "score": <0-3>,
  "reason": "<explanation in 100 words or less>"
}

Focus on whether the final canvas state matches what the user requested. Consider node types, content, positioning, relationships, and overall structure."#;

/// Outcome of one judge call. `result` is always populated: any service or
/// parse failure fails closed to score 0 with a reason naming the failure.
#[derive(Debug, Clone)]
pub struct JudgeOutcome {
    pub result: CaseResult,
    pub runtime_seconds: f64,
}

/// Scores how well `final_state` satisfies `instruction`. One attempt per
/// case, no retries.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, instruction: &str, final_state: Option<&Value>) -> JudgeOutcome;
}

pub fn user_prompt(instruction: &str, final_state: Option<&Value>) -> String {
    format!(
        "Instruction: \"{}\"\n\nFinal canvas state:\n{}",
        instruction,
        crate::state::canonical_opt(final_state)
    )
}

/// Validates the judge's structured response: an object carrying an integer
/// `score` in 0..=3 and a string `reason`. Anything else is invalid and the
/// caller fails closed.
pub fn parse_judge_response(text: &str) -> anyhow::Result<CaseResult> {
    let v: Value = serde_json::from_str(text)?;
    let score = v
        .get("score")
        .and_then(|s| s.as_i64())
        .ok_or_else(|| anyhow::anyhow!("judge response missing integer 'score'"))?;
    if !(0..=CaseResult::MAX_SCORE as i64).contains(&score) {
        anyhow::bail!("judge score {} out of range 0..=3", score);
    }
    let reason = v
        .get("reason")
        .and_then(|r| r.as_str())
        .ok_or_else(|| anyhow::anyhow!("judge response missing string 'reason'"))?;
    Ok(CaseResult {
        score: score as u8,
        reason: reason.to_string(),
    })
}
