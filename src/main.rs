//! `lfg` command-line entry point.
//!
//! Configuration comes from the JSON file named by `LFG_CONFIG`, else from
//! `LFG_*` environment variables (a `.env` file is honored) when `LFG_TANKS`
//! is set, else from an interactive prompt.

use std::io;

use anyhow::Context;
use lfg_matchmaker::config::SessionConfig;
use lfg_matchmaker::core::AppResult;
use lfg_matchmaker::runtime::{
    banner, build_runtime, prompt_config, render_summary, run_session, TokioSpawner,
};
use lfg_matchmaker::util::init_tracing;

fn load_config() -> AppResult<SessionConfig> {
    let _ = dotenvy::dotenv();
    if let Ok(path) = std::env::var("LFG_CONFIG") {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {path}"))?;
        return Ok(SessionConfig::from_json_str(&raw)?);
    }
    if std::env::var_os("LFG_TANKS").is_some() {
        return Ok(SessionConfig::from_env()?);
    }
    let stdin = io::stdin();
    Ok(prompt_config(stdin.lock(), io::stdout())?)
}

fn main() -> AppResult<()> {
    init_tracing();
    print!("{}", banner());

    let cfg = load_config()?;
    let runtime = build_runtime(num_cpus::get()).context("building tokio runtime")?;
    let spawner = TokioSpawner::new(runtime.handle().clone());
    let report = runtime.block_on(run_session(cfg, spawner))?;

    print!("{}", render_summary(&report));
    Ok(())
}
