use crate::model::{Case, CaseMeasurement, Run, RunMeta};
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

pub struct StoreStats {
    pub cases: Option<u64>,
    pub runs: Option<u64>,
    pub measurements: Option<u64>,
    pub last_run_id: Option<i64>,
    pub last_run_at: Option<String>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    /// Looks up the case by content hash, inserting it on a miss. Safe under
    /// concurrent callers: INSERT OR IGNORE rides the UNIQUE(hash) constraint,
    /// and a racing loser re-reads the winner's row. On a hash hit whose
    /// stored content differs, this surfaces a collision error instead of
    /// conflating two distinct cases.
    ///
    /// Returns the case plus whether this call created it.
    pub fn get_or_create_case(
        &self,
        instruction: &str,
        initial_state: &Value,
    ) -> anyhow::Result<(Case, bool)> {
        let hash = crate::hashing::case_hash(instruction, initial_state);
        let state_json = crate::state::canonical(initial_state);

        let conn = self.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO cases(hash, instruction, initial_state) VALUES (?1, ?2, ?3)",
                params![hash, instruction, state_json],
            )
            .context("insert case")?;

        let case = Self::query_case_by_hash(&conn, &hash)?
            .ok_or_else(|| anyhow::anyhow!("case vanished after insert (hash={})", hash))?;

        if case.instruction != instruction || crate::state::canonical(&case.initial_state) != state_json
        {
            anyhow::bail!(
                "hash collision: hash {} already maps to a different case (id={})",
                hash,
                case.id
            );
        }

        Ok((case, inserted > 0))
    }

    pub fn load_case(&self, id: i64) -> anyhow::Result<Case> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, hash, instruction, initial_state FROM cases WHERE id = ?1")?;
        let case = stmt
            .query_row(params![id], Self::map_case_row)
            .optional()?
            .ok_or_else(|| anyhow::anyhow!("case not found: id={}", id))?;
        Ok(case)
    }

    /// Every case, ordered by id so fan-out assignment is reproducible.
    pub fn load_all_cases(&self) -> anyhow::Result<Vec<Case>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, hash, instruction, initial_state FROM cases ORDER BY id ASC")?;
        let rows = stmt.query_map([], Self::map_case_row)?;
        let mut cases = Vec::new();
        for r in rows {
            cases.push(r?);
        }
        Ok(cases)
    }

    /// Records run provenance and returns the assigned id. Must complete
    /// before any measurement referencing the run is written.
    pub fn create_run(&self, meta: &RunMeta) -> anyhow::Result<Run> {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO runs(timestamp, source_commit_sha, source_commit_message, benchmark_commit_sha, model)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                timestamp,
                meta.source_commit_sha,
                meta.source_commit_message,
                meta.benchmark_commit_sha,
                meta.model
            ],
        )
        .context("insert run")?;
        Ok(Run {
            id: conn.last_insert_rowid(),
            timestamp,
            meta: meta.clone(),
        })
    }

    /// Persists one measurement. Foreign keys are enforced, so writing against
    /// a run or case id that does not exist is rejected by the engine.
    pub fn insert_measurement(&self, m: &CaseMeasurement) -> anyhow::Result<()> {
        let final_state = crate::state::canonical_opt(m.final_state.as_ref());
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO measurements(run_id, case_id, final_state, score, reason,
                                      execution_runtime_seconds, judge_runtime_seconds, date_measured)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                m.run_id,
                m.case_id,
                final_state,
                m.result.score as i64,
                m.result.reason,
                m.execution_runtime_seconds,
                m.judge_runtime_seconds,
                m.date_measured
            ],
        )
        .context("insert measurement")?;
        Ok(())
    }

    pub fn stats_best_effort(&self) -> anyhow::Result<StoreStats> {
        let conn = self.conn.lock().unwrap();

        let count = |sql: &str| -> Option<u64> {
            conn.query_row(sql, [], |r| r.get::<_, i64>(0).map(|x| x as u64))
                .ok()
        };

        let last: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, timestamp FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .ok();
        let (last_run_id, last_run_at) = match last {
            Some((id, at)) => (Some(id), Some(at)),
            None => (None, None),
        };

        Ok(StoreStats {
            cases: count("SELECT COUNT(*) FROM cases"),
            runs: count("SELECT COUNT(*) FROM runs"),
            measurements: count("SELECT COUNT(*) FROM measurements"),
            last_run_id,
            last_run_at,
        })
    }

    fn query_case_by_hash(conn: &Connection, hash: &str) -> anyhow::Result<Option<Case>> {
        let mut stmt =
            conn.prepare("SELECT id, hash, instruction, initial_state FROM cases WHERE hash = ?1")?;
        Ok(stmt.query_row(params![hash], Self::map_case_row).optional()?)
    }

    fn map_case_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Case> {
        let state_json: String = row.get(3)?;
        let initial_state: Value = serde_json::from_str(&state_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Case {
            id: row.get(0)?,
            hash: row.get(1)?,
            instruction: row.get(2)?,
            initial_state,
        })
    }
}
