use super::args::*;
use canvasbench_core::config::{ExecutorConfig, JudgeConfig};
use canvasbench_core::engine::runner::Runner;
use canvasbench_core::executor::CanvasCli;
use canvasbench_core::judge::openai::OpenAiJudge;
use canvasbench_core::model::RunMeta;
use canvasbench_core::state::empty_state;
use canvasbench_core::storage::Store;
use std::path::Path;
use std::sync::Arc;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Add(args) => cmd_add(args),
        Command::Run(args) => cmd_run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_add(args: AddArgs) -> anyhow::Result<i32> {
    ensure_parent_dir(&args.db)?;
    let store = Store::open(&args.db)?;
    store.init_schema()?;

    let raw = std::fs::read_to_string(&args.file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", args.file.display(), e))?;

    let blank = empty_state();
    let mut created = 0usize;
    let mut existing = 0usize;
    for line in raw.lines() {
        let instruction = line.trim();
        if instruction.is_empty() {
            continue;
        }
        let (_case, was_created) = store.get_or_create_case(instruction, &blank)?;
        if was_created {
            created += 1;
        } else {
            existing += 1;
        }
    }

    eprintln!("added {} new case(s), {} already present", created, existing);
    Ok(exit_codes::OK)
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<i32> {
    // Resolve and validate all configuration before touching the store,
    // spawning anything, or making network calls.
    let script = match args.script {
        Some(s) => s,
        None => {
            eprintln!("config error: missing canvas script path (set --script or CANVASBENCH_SCRIPT)");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let executor_cfg = ExecutorConfig {
        runner: args.runner,
        script_path: script,
        model: args.model.clone(),
    };
    let judge_cfg = JudgeConfig {
        base_url: args.judge.judge_base_url,
        api_key: args.judge.judge_api_key.unwrap_or_default(),
        model: args.judge.judge_model,
    };
    if let Err(e) = executor_cfg.validate().and_then(|_| judge_cfg.validate()) {
        eprintln!("{e}");
        return Ok(exit_codes::CONFIG_ERROR);
    }

    ensure_parent_dir(&args.db)?;
    let store = Store::open(&args.db)?;
    store.init_schema()?;

    let runner = Runner {
        store,
        executor: Arc::new(CanvasCli::new(executor_cfg)),
        judge: Arc::new(OpenAiJudge::new(judge_cfg)),
        parallel: args.parallel,
    };

    let meta = RunMeta {
        source_commit_sha: args.commit_sha,
        source_commit_message: args.commit_message,
        benchmark_commit_sha: args.benchmark_commit_sha,
        model: args.model,
    };

    let artifacts = runner.run_all(&meta).await?;
    canvasbench_core::report::console::print_summary(&artifacts.rows);

    Ok(exit_codes::OK)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
