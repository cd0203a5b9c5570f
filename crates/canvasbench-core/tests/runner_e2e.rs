use async_trait::async_trait;
use canvasbench_core::engine::runner::Runner;
use canvasbench_core::executor::{ExecutionOutcome, Executor};
use canvasbench_core::judge::{Judge, JudgeOutcome};
use canvasbench_core::model::{CaseResult, RunMeta};
use canvasbench_core::state::empty_state;
use canvasbench_core::storage::Store;
use serde_json::Value;
use std::sync::Arc;

struct StubExecutor {
    /// Instructions whose execution should degrade to a null final state.
    fail_on: Vec<String>,
}

#[async_trait]
impl Executor for StubExecutor {
    async fn execute(&self, instruction: &str, _initial_state: &Value) -> ExecutionOutcome {
        if self.fail_on.iter().any(|f| f == instruction) {
            return ExecutionOutcome {
                final_state: None,
                runtime_seconds: 0.0,
            };
        }
        ExecutionOutcome {
            final_state: Some(serde_json::json!({"nodes": [{"type": "function"}], "edges": []})),
            runtime_seconds: 0.01,
        }
    }
}

/// Scores 3 when the tool produced a state, 0 for a null state (the rubric's
/// view of an ignored instruction).
struct StubJudge;

#[async_trait]
impl Judge for StubJudge {
    async fn judge(&self, _instruction: &str, final_state: Option<&Value>) -> JudgeOutcome {
        let result = match final_state {
            Some(_) => CaseResult {
                score: 3,
                reason: "function node created".into(),
            },
            None => CaseResult::failed("no final state to evaluate"),
        };
        JudgeOutcome {
            result,
            runtime_seconds: 0.001,
        }
    }
}

fn meta() -> RunMeta {
    RunMeta {
        source_commit_sha: "aaa".into(),
        source_commit_message: "msg".into(),
        benchmark_commit_sha: "bbb".into(),
        model: "stub".into(),
    }
}

fn runner(store: Store, fail_on: Vec<String>) -> Runner {
    Runner {
        store,
        executor: Arc::new(StubExecutor { fail_on }),
        judge: Arc::new(StubJudge),
        parallel: 3,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn measures_one_case_end_to_end() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.get_or_create_case("Create a function node", &empty_state())?;

    let artifacts = runner(store.clone(), vec![]).run_all(&meta()).await?;
    let run_id = artifacts.run_id.expect("run created");
    assert_eq!(artifacts.rows.len(), 1);
    assert_eq!(artifacts.rows[0].score, Some(3));

    let conn = store.conn.lock().unwrap();
    let (final_state_json, score): (String, i64) = conn.query_row(
        "SELECT final_state, score FROM measurements WHERE run_id = ?1",
        rusqlite::params![run_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    assert_eq!(score, 3);
    let final_state: Value = serde_json::from_str(&final_state_json)?;
    assert_eq!(final_state["nodes"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_execution_still_gets_judged_and_persisted() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.get_or_create_case("Delete every node", &empty_state())?;

    let artifacts = runner(store.clone(), vec!["Delete every node".into()])
        .run_all(&meta())
        .await?;
    assert_eq!(artifacts.rows[0].score, Some(0));

    let conn = store.conn.lock().unwrap();
    let (final_state, reason, runtime): (String, String, f64) = conn.query_row(
        "SELECT final_state, reason, execution_runtime_seconds FROM measurements",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    assert_eq!(final_state, "null");
    assert!(!reason.is_empty());
    assert!(runtime >= 0.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn one_failing_case_does_not_sink_the_run() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.get_or_create_case("case one", &empty_state())?;
    store.get_or_create_case("case two", &empty_state())?;
    store.get_or_create_case("case three", &empty_state())?;

    let artifacts = runner(store.clone(), vec!["case two".into()])
        .run_all(&meta())
        .await?;
    assert_eq!(artifacts.rows.len(), 3);

    let by_instruction: std::collections::HashMap<&str, Option<u8>> = artifacts
        .rows
        .iter()
        .map(|r| (r.instruction.as_str(), r.score))
        .collect();
    assert_eq!(by_instruction["case one"], Some(3));
    assert_eq!(by_instruction["case two"], Some(0));
    assert_eq!(by_instruction["case three"], Some(3));

    let conn = store.conn.lock().unwrap();
    let persisted: i64 = conn.query_row("SELECT count(*) FROM measurements", [], |r| r.get(0))?;
    assert_eq!(persisted, 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_store_terminates_early() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let artifacts = runner(store.clone(), vec![]).run_all(&meta()).await?;
    assert!(artifacts.run_id.is_none());
    assert!(artifacts.rows.is_empty());

    let stats = store.stats_best_effort()?;
    assert_eq!(stats.runs, Some(0));
    Ok(())
}
