use crate::errors::ConfigError;
use std::path::PathBuf;

/// Configuration for the external canvas tool invocation.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Interpreter for the headless entry point (the tool ships as a node
    /// script; tests substitute /bin/sh).
    pub runner: String,
    /// Path to the headless entry-point script.
    pub script_path: PathBuf,
    /// Model name forwarded to the tool via --model-name.
    pub model: String,
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.script_path.as_os_str().is_empty() {
            return Err(ConfigError(
                "missing canvas script path (set --script or CANVASBENCH_SCRIPT)".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the LLM judge service.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl JudgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError(
                "missing judge API key (set OPENAI_API_KEY)".into(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(ConfigError("missing judge base URL".into()));
        }
        Ok(())
    }
}
