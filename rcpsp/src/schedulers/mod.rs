use std::time::Duration;

use crate::error::RangeError;
use crate::solution::Solution;

pub mod sequential;

pub use sequential::SequentialSolver;

pub trait Solver {
    /// Drive `solution` towards a complete schedule within `time_limit`.
    ///
    /// On return `solution` holds the assignment to report, whether it is the
    /// best one found or only the last one.
    fn solve(
        &mut self,
        solution: &mut Solution<'_>,
        time_limit: Duration,
    ) -> Result<(), RangeError>;
}
