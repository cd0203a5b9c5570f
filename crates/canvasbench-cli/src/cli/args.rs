use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "canvasbench",
    version,
    about = "Benchmark harness for canvas-editing agents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register instructions as benchmark cases (one per line, blank lines skipped)
    Add(AddArgs),
    /// Execute every stored case against the canvas tool and judge the results
    Run(RunArgs),
    Version,
}

#[derive(Parser, Clone)]
pub struct AddArgs {
    /// Text file with one instruction per line
    pub file: PathBuf,

    #[arg(long, default_value = ".bench/measurements.db")]
    pub db: PathBuf,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = ".bench/measurements.db")]
    pub db: PathBuf,

    /// Path to the headless canvas entry-point script (required)
    #[arg(long, env = "CANVASBENCH_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Interpreter used to launch the script
    #[arg(long, default_value = "node")]
    pub runner: String,

    /// Commit SHA of the canvas tool under test
    #[arg(long, env = "CANVASBENCH_COMMIT_SHA", default_value = "unknown")]
    pub commit_sha: String,

    /// Commit message of the canvas tool under test
    #[arg(long, env = "CANVASBENCH_COMMIT_MESSAGE", default_value = "")]
    pub commit_message: String,

    /// Commit SHA of this harness
    #[arg(long, env = "CANVASBENCH_BENCHMARK_SHA", default_value = "unknown")]
    pub benchmark_commit_sha: String,

    /// Model name driving the canvas tool (forwarded via --model-name)
    #[arg(long, env = "CANVASBENCH_MODEL", default_value = "gpt-5")]
    pub model: String,

    /// Worker pool width; small by design to keep the external tool stable
    #[arg(long, default_value_t = canvasbench_core::engine::runner::DEFAULT_PARALLEL)]
    pub parallel: usize,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(clap::Args, Clone)]
pub struct JudgeArgs {
    /// Judge model identifier
    #[arg(long, env = "CANVASBENCH_JUDGE_MODEL", default_value = "gpt-5")]
    pub judge_model: String,

    /// OpenAI-compatible base URL for the judge service
    #[arg(
        long,
        env = "CANVASBENCH_JUDGE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub judge_base_url: String,

    #[arg(long, hide = true, env = "OPENAI_API_KEY")]
    pub judge_api_key: Option<String>,
}
