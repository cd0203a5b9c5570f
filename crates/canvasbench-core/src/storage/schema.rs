pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS cases (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  hash TEXT NOT NULL UNIQUE,
  instruction TEXT NOT NULL,
  initial_state TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS runs (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  timestamp TEXT NOT NULL,
  source_commit_sha TEXT NOT NULL,
  source_commit_message TEXT NOT NULL,
  benchmark_commit_sha TEXT NOT NULL,
  model TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS measurements (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  run_id INTEGER NOT NULL REFERENCES runs(id),
  case_id INTEGER NOT NULL REFERENCES cases(id),
  final_state TEXT NOT NULL,
  score INTEGER NOT NULL,
  reason TEXT NOT NULL,
  execution_runtime_seconds REAL NOT NULL,
  judge_runtime_seconds REAL NOT NULL,
  date_measured TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_measurements_run ON measurements(run_id);
"#;
