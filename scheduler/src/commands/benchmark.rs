use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;

use super::schedule::run_schedule;
use crate::Benchmark;

pub fn benchmark(benchmark: Benchmark) -> Result<()> {
    if !benchmark.psp_problem_file_folder.is_dir() {
        anyhow::bail!("psp_problem_file_folder is not a directory")
    }

    let mut paths: Vec<PathBuf> = benchmark
        .psp_problem_file_folder
        .read_dir()?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    paths.retain(|path| path.is_file());
    paths.sort();

    let time_limit = Duration::from_secs(benchmark.time_limit);

    // Every problem gets its own instance and solution, nothing is shared
    let scheduling_results: Vec<String> = paths
        .par_iter()
        .map(|path| match run_schedule(path, time_limit) {
            Ok(outcome) => outcome.to_string(),
            Err(err) => {
                warn!("Skipping {}: {err:#}", path.display());
                format!("{};error", path.display())
            }
        })
        .collect();

    std::fs::write(&benchmark.output, scheduling_results.join("\n"))?;

    info!(
        "Wrote {} results to {:?}",
        scheduling_results.len(),
        benchmark.output
    );

    Ok(())
}
