use std::time::{Duration, Instant};

use log::{info, warn};

use super::Solver;
use crate::error::RangeError;
use crate::solution::Solution;

/// Places every activity right after the previous one, in index order.
///
/// Feasible whenever the activities are numbered along their precedences and
/// no single activity exceeds a capacity on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialSolver;

impl Solver for SequentialSolver {
    fn solve(
        &mut self,
        solution: &mut Solution<'_>,
        time_limit: Duration,
    ) -> Result<(), RangeError> {
        let started = Instant::now();
        let instance = solution.instance();

        let mut current_project_time = 0;
        for activity in 0..instance.nb_activities() {
            solution.add_activity(activity, current_project_time)?;
            current_project_time += instance.duration(activity)?;
        }

        let elapsed = started.elapsed();
        if elapsed > time_limit {
            warn!("sequential placement took {elapsed:?}, limit was {time_limit:?}");
        }
        info!(
            "sequential placement of {} activities in {elapsed:?}, makespan {}",
            instance.nb_activities(),
            solution.objective_value()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use psp_lib_parser::parse_psp_lib;

    use super::SequentialSolver;
    use crate::instance::tests::three_activities;
    use crate::instance::Instance;
    use crate::schedulers::Solver;
    use crate::solution::Solution;

    #[test]
    fn places_activities_back_to_back() {
        let instance = three_activities();
        let mut solution = Solution::new(&instance);

        SequentialSolver
            .solve(&mut solution, Duration::from_secs(1))
            .unwrap();

        assert_eq!(solution.start_times(), &[Some(0), Some(2), Some(5)]);
        assert_eq!(solution.objective_value(), instance.horizon());
        assert!(solution.validate());
    }

    #[test]
    fn small_psp_lib_instance() {
        let psp = parse_psp_lib(include_str!("../../../instances/small.sm")).unwrap();
        let instance = Instance::try_from(&psp).unwrap();
        let mut solution = Solution::new(&instance);

        SequentialSolver
            .solve(&mut solution, Duration::from_secs(1))
            .unwrap();

        assert_eq!(
            solution.start_times(),
            &[Some(0), Some(0), Some(3), Some(5), Some(9), Some(10)]
        );
        assert_eq!(solution.objective_value(), 10);
        assert!(solution.validate(), "{}", solution.error_log());
        assert!(solution.objective_value() >= instance.critical_path_length().unwrap());
    }
}
