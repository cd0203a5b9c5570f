use crate::executor::Executor;
use crate::judge::Judge;
use crate::model::RunMeta;
use crate::storage::Store;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Fixed fan-out width. Small by design: each worker spawns its own
/// heavyweight external tool instance, so the bound trades throughput for
/// tool stability rather than tracking hardware.
pub const DEFAULT_PARALLEL: usize = 3;

/// Per-case outcome as seen by the orchestrator. `score = None` means the
/// unit of work failed before a measurement was persisted.
#[derive(Debug, Clone)]
pub struct CaseRow {
    pub case_id: i64,
    pub instruction: String,
    pub score: Option<u8>,
    pub message: String,
}

#[derive(Debug)]
pub struct RunArtifacts {
    pub run_id: Option<i64>,
    pub rows: Vec<CaseRow>,
}

pub struct Runner {
    pub store: Store,
    pub executor: Arc<dyn Executor>,
    pub judge: Arc<dyn Judge>,
    pub parallel: usize,
}

impl Runner {
    /// Executes every stored case against the external tool, judged and
    /// persisted under a freshly created run.
    ///
    /// The run row is created before any task is dispatched; tasks are
    /// submitted in case-id order and bounded by a semaphore. Every join
    /// handle is resolved individually, so one task's error (or panic) is
    /// recorded as a failed row without cancelling its siblings.
    pub async fn run_all(&self, meta: &RunMeta) -> anyhow::Result<RunArtifacts> {
        let cases = self.store.load_all_cases()?;
        if cases.is_empty() {
            info!("no cases in store, nothing to run");
            return Ok(RunArtifacts {
                run_id: None,
                rows: Vec::new(),
            });
        }

        let run = self.store.create_run(meta)?;
        info!(run_id = run.id, cases = cases.len(), model = %meta.model, "run created");

        let sem = Arc::new(Semaphore::new(self.parallel.max(1)));
        let mut handles = Vec::new();

        for case in cases {
            let permit = sem.clone().acquire_owned().await?;
            let store = self.store.clone();
            let executor = self.executor.clone();
            let judge = self.judge.clone();
            let run_id = run.id;
            let ident = (case.id, case.instruction.clone());
            let h = tokio::spawn(async move {
                let _permit = permit;
                crate::engine::worker::run_case(executor.as_ref(), judge.as_ref(), &store, &case, run_id)
                    .await
            });
            handles.push((ident, h));
        }

        let mut rows = Vec::new();
        for ((case_id, instruction), h) in handles {
            let row = match h.await {
                Ok(Ok(m)) => CaseRow {
                    case_id,
                    instruction,
                    score: Some(m.result.score),
                    message: m.result.reason,
                },
                Ok(Err(e)) => {
                    warn!(case_id, "case failed to persist: {e}");
                    CaseRow {
                        case_id,
                        instruction,
                        score: None,
                        message: format!("task error: {e}"),
                    }
                }
                Err(e) => {
                    warn!(case_id, "worker task panicked: {e}");
                    CaseRow {
                        case_id,
                        instruction,
                        score: None,
                        message: format!("join error: {e}"),
                    }
                }
            };
            rows.push(row);
        }

        Ok(RunArtifacts {
            run_id: Some(run.id),
            rows,
        })
    }
}
