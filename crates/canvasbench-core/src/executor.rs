use crate::config::ExecutorConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, error};

/// Outcome of one external-tool invocation. `final_state = None` means the
/// tool produced no usable output (launch failure, non-zero exit, empty or
/// malformed output file); that is a degraded result, not an error.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub final_state: Option<Value>,
    pub runtime_seconds: f64,
}

/// Turns an instruction plus an initial canvas state into a resulting state by
/// delegating to the external tool. Implementations must not let a failure
/// escape this boundary.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, instruction: &str, initial_state: &Value) -> ExecutionOutcome;
}

/// Subprocess adapter for the headless canvas CLI. Protocol:
/// `<runner> <script> --state <in.json> --prompt <instruction> --output <out.json> --model-name <model>`
/// with exit code 0 as the success signal and the output file authoritative.
pub struct CanvasCli {
    cfg: ExecutorConfig,
}

impl CanvasCli {
    pub fn new(cfg: ExecutorConfig) -> Self {
        Self { cfg }
    }

    async fn run_once(&self, instruction: &str, initial_state: &Value) -> anyhow::Result<ExecutionOutcome> {
        // Temp artifacts live for the scope of this call; dropped (and
        // unlinked) on every exit path.
        let state_file = NamedTempFile::with_suffix(".json")?;
        let output_file = NamedTempFile::with_suffix(".json")?;
        std::fs::write(state_file.path(), crate::state::canonical(initial_state))?;

        let mut cmd = tokio::process::Command::new(&self.cfg.runner);
        cmd.arg(&self.cfg.script_path)
            .arg("--state")
            .arg(state_file.path())
            .arg("--prompt")
            .arg(instruction)
            .arg("--output")
            .arg(output_file.path())
            .arg("--model-name")
            .arg(&self.cfg.model);

        let start = Instant::now();
        let output = match cmd.output().await {
            Ok(o) => o,
            Err(e) => {
                // Process never started; runtime stays zero.
                error!(runner = %self.cfg.runner, script = %self.cfg.script_path.display(),
                       "failed to launch canvas tool: {e}");
                return Ok(ExecutionOutcome {
                    final_state: None,
                    runtime_seconds: 0.0,
                });
            }
        };
        let runtime_seconds = start.elapsed().as_secs_f64();

        if !output.status.success() {
            error!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "canvas tool exited non-zero"
            );
            return Ok(ExecutionOutcome {
                final_state: None,
                runtime_seconds,
            });
        }

        let raw = std::fs::read_to_string(output_file.path()).unwrap_or_default();
        let final_state = if raw.trim().is_empty() {
            debug!("canvas tool produced no output state");
            None
        } else {
            match serde_json::from_str::<Value>(&raw) {
                Ok(v) => Some(v),
                Err(e) => {
                    error!("canvas tool output is not valid JSON: {e}");
                    None
                }
            }
        };

        Ok(ExecutionOutcome {
            final_state,
            runtime_seconds,
        })
    }
}

#[async_trait]
impl Executor for CanvasCli {
    async fn execute(&self, instruction: &str, initial_state: &Value) -> ExecutionOutcome {
        match self.run_once(instruction, initial_state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Temp-file setup failed before the process could start.
                error!("canvas execution setup failed: {e}");
                ExecutionOutcome {
                    final_state: None,
                    runtime_seconds: 0.0,
                }
            }
        }
    }
}
