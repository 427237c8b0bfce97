use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, error, info, trace};
use psp_lib_parser::parse_psp_lib;
use rcpsp::schedulers::{SequentialSolver, Solver};
use rcpsp::{Instance, Solution};

use crate::Schedule;

/// One result line: `file;makespan;milliseconds;code`.
///
/// Code 0 is a feasible solution within the time limit, 1 an infeasible
/// solution and 2 a feasible one found after the limit (plus one second).
#[derive(Debug)]
pub(crate) struct ScheduleOutcome {
    pub path: PathBuf,
    pub objective_value: usize,
    pub elapsed: Duration,
    pub code: u8,
}

impl fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{}",
            self.path.display(),
            self.objective_value,
            self.elapsed.as_millis(),
            self.code
        )
    }
}

pub(crate) fn run_schedule(path: &Path, time_limit: Duration) -> Result<ScheduleOutcome> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    trace!("input file contents: {contents}");

    let psp = parse_psp_lib(&contents)?;
    let instance = Instance::try_from(&psp)?;
    debug!("{instance}");

    let mut solution = Solution::new(&instance);

    let started = Instant::now();
    SequentialSolver.solve(&mut solution, time_limit)?;
    let elapsed = started.elapsed();

    let feasible = solution.validate();
    info!("{solution}");

    let code = if !feasible {
        error!(
            "There is an error in the solution of {}: {}",
            path.display(),
            solution.error_log()
        );
        1
    } else if elapsed > time_limit + Duration::from_secs(1) {
        error!("Time limit exceeded for {}", path.display());
        2
    } else {
        0
    };

    Ok(ScheduleOutcome {
        path: path.to_path_buf(),
        objective_value: solution.objective_value(),
        elapsed,
        code,
    })
}

pub fn schedule(schedule: Schedule) -> Result<()> {
    let outcome = run_schedule(&schedule.path, Duration::from_secs(schedule.time_limit))?;

    println!("{outcome}");

    Ok(())
}
