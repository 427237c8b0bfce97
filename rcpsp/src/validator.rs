use std::fmt;

use log::debug;

use crate::instance::Instance;
use crate::resource_profile::ResourceProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Unscheduled {
        activity: usize,
    },
    OutsideHorizon {
        activity: usize,
        start: usize,
    },
    CapacityExceeded {
        resource: usize,
        time: usize,
        usage: usize,
        capacity: usize,
    },
    PrecedenceViolated {
        predecessor: usize,
        successor: usize,
        finish: usize,
        start: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unscheduled { activity } => {
                write!(f, "Error: activity {activity} is not scheduled")
            }
            Violation::OutsideHorizon { activity, start } => write!(
                f,
                "Error: activity {activity} starting at time {start} ends after the horizon"
            ),
            Violation::CapacityExceeded {
                resource,
                time,
                usage,
                capacity,
            } => write!(
                f,
                "Error: resource {resource} at time {time} exceeds capacity ({usage} > {capacity})"
            ),
            Violation::PrecedenceViolated {
                predecessor,
                successor,
                finish,
                start,
            } => write!(
                f,
                "Error: activity {predecessor} finishes at time {finish} but its successor {successor} starts at time {start}"
            ),
        }
    }
}

/// Outcome of a from-scratch feasibility check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeasibilityReport {
    violations: Vec<Violation>,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for FeasibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.violations {
            writeln!(f, "{violation}")?;
        }

        if self.is_feasible() {
            write!(f, "Solution is feasible.")
        } else {
            write!(f, "Solution is not feasible.")
        }
    }
}

/// Rebuilds `profile` from `start_times` and checks every constraint.
///
/// All violations are collected, none of the checks stops early.
pub fn validate(
    instance: &Instance,
    start_times: &[Option<usize>],
    profile: &mut ResourceProfile,
) -> FeasibilityReport {
    let mut violations = vec![];

    profile.reset();
    for (activity, start) in start_times.iter().enumerate() {
        match *start {
            None => violations.push(Violation::Unscheduled { activity }),
            Some(start) => {
                if profile.add_footprint(instance, activity, start).is_err() {
                    violations.push(Violation::OutsideHorizon { activity, start });
                }
            }
        }
    }

    for ((resource, row), &capacity) in profile.rows().enumerate().zip(instance.capacities()) {
        for (time, &usage) in row.iter().enumerate() {
            if usage > capacity {
                violations.push(Violation::CapacityExceeded {
                    resource,
                    time,
                    usage,
                    capacity,
                });
            }
        }
    }

    let durations = instance.durations();
    for (predecessor, start) in start_times.iter().enumerate() {
        let Some(predecessor_start) = *start else {
            continue;
        };
        let finish = predecessor_start.saturating_add(durations[predecessor]);

        for successor in instance.closure_row(predecessor).ones() {
            if let Some(successor_start) = start_times.get(successor).copied().flatten() {
                if finish > successor_start {
                    violations.push(Violation::PrecedenceViolated {
                        predecessor,
                        successor,
                        finish,
                        start: successor_start,
                    });
                }
            }
        }
    }

    debug!(
        "validation found {} violation(s) over {} activities",
        violations.len(),
        start_times.len()
    );

    FeasibilityReport { violations }
}
