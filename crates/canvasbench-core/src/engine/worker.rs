use crate::executor::Executor;
use crate::judge::Judge;
use crate::model::{Case, CaseMeasurement};
use crate::storage::Store;
use tracing::info;

// Per-score ANSI colors for the outcome line: red, orange, yellow, green.
const SCORE_COLORS: [&str; 4] = ["\x1b[91m", "\x1b[93m", "\x1b[33m", "\x1b[92m"];
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// One unit of benchmark work: execute the case, judge the resulting state,
/// persist the measurement against the run, report the outcome.
///
/// Execution and judge failures degrade inside their adapters (null state,
/// score 0) and still produce a measurement. Only a persistence failure
/// aborts this unit with an error; data loss is never silent.
pub async fn run_case(
    executor: &dyn Executor,
    judge: &dyn Judge,
    store: &Store,
    case: &Case,
    run_id: i64,
) -> anyhow::Result<CaseMeasurement> {
    let execution = executor.execute(&case.instruction, &case.initial_state).await;
    let judged = judge
        .judge(&case.instruction, execution.final_state.as_ref())
        .await;

    let measurement = CaseMeasurement {
        case_id: case.id,
        run_id,
        final_state: execution.final_state,
        result: judged.result,
        execution_runtime_seconds: execution.runtime_seconds,
        judge_runtime_seconds: judged.runtime_seconds,
        date_measured: chrono::Utc::now().to_rfc3339(),
    };

    store.insert_measurement(&measurement)?;

    let color = SCORE_COLORS
        .get(measurement.result.score as usize)
        .copied()
        .unwrap_or("");
    info!(
        "instruction '{BOLD}{}{RESET}' scored {BOLD}{color}{}{RESET} because '{}'",
        case.instruction, measurement.result.score, measurement.result.reason
    );

    Ok(measurement)
}
