use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unique (instruction, initial canvas state) pair under test.
/// Created once via get-or-create, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    pub hash: String,
    pub instruction: String,
    pub initial_state: Value,
}

/// Provenance inputs for one benchmark invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub source_commit_sha: String,
    pub source_commit_message: String,
    pub benchmark_commit_sha: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: i64,
    pub timestamp: String,
    #[serde(flatten)]
    pub meta: RunMeta,
}

/// Rubric score (0 = instruction ignored/failed, 3 = perfectly achieved) plus
/// the judge's justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub score: u8,
    pub reason: String,
}

impl CaseResult {
    pub const MAX_SCORE: u8 = 3;

    /// Fail-closed result used whenever a valid judge response is absent.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            reason: reason.into(),
        }
    }
}

/// The recorded outcome of executing and judging one case within one run.
/// `final_state = None` means the external tool produced no usable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMeasurement {
    pub case_id: i64,
    pub run_id: i64,
    pub final_state: Option<Value>,
    pub result: CaseResult,
    pub execution_runtime_seconds: f64,
    pub judge_runtime_seconds: f64,
    pub date_measured: String,
}
