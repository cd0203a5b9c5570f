#![cfg(unix)]

use canvasbench_core::config::ExecutorConfig;
use canvasbench_core::executor::{CanvasCli, Executor};
use canvasbench_core::state::empty_state;
use std::path::PathBuf;
use tempfile::tempdir;

fn sh_executor(script_body: &str, dir: &std::path::Path) -> anyhow::Result<CanvasCli> {
    let script = dir.join("tool.sh");
    std::fs::write(&script, script_body)?;
    Ok(CanvasCli::new(ExecutorConfig {
        runner: "/bin/sh".into(),
        script_path: script,
        model: "test-model".into(),
    }))
}

#[tokio::test(flavor = "multi_thread")]
async fn copies_state_through_the_file_protocol() -> anyhow::Result<()> {
    let dir = tempdir()?;
    // argv: --state <in> --prompt <p> --output <out> --model-name <m>
    let exec = sh_executor("cat \"$2\" > \"$6\"\n", dir.path())?;

    let state = serde_json::json!({"nodes": [{"type": "function"}], "edges": []});
    let outcome = exec.execute("echo the state back", &state).await;

    assert!(outcome.runtime_seconds > 0.0);
    let final_state = outcome.final_state.expect("output state parsed");
    assert_eq!(final_state["nodes"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_output_on_success_is_no_result() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let exec = sh_executor("exit 0\n", dir.path())?;

    let outcome = exec.execute("do nothing", &empty_state()).await;
    assert!(outcome.final_state.is_none());
    assert!(outcome.runtime_seconds >= 0.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn nonzero_exit_degrades_to_null_state() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let exec = sh_executor("echo '{\"partial\":true}' > \"$6\"\nexit 3\n", dir.path())?;

    let outcome = exec.execute("crash please", &empty_state()).await;
    // Partial output from a failed process is ignored.
    assert!(outcome.final_state.is_none());
    assert!(outcome.runtime_seconds >= 0.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_output_degrades_to_null_state() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let exec = sh_executor("echo 'not json' > \"$6\"\n", dir.path())?;

    let outcome = exec.execute("garble the output", &empty_state()).await;
    assert!(outcome.final_state.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn launch_failure_reports_zero_runtime() {
    let exec = CanvasCli::new(ExecutorConfig {
        runner: "/nonexistent/interpreter".into(),
        script_path: PathBuf::from("/nonexistent/tool.mjs"),
        model: "test-model".into(),
    });

    let outcome = exec.execute("never starts", &empty_state()).await;
    assert!(outcome.final_state.is_none());
    assert_eq!(outcome.runtime_seconds, 0.0);
}
