use std::fmt;

use log::{debug, trace};

use crate::error::RangeError;
use crate::instance::Instance;
use crate::resource_profile::ResourceProfile;
use crate::validator::{self, FeasibilityReport};

/// A (possibly partial) schedule of an [`Instance`].
///
/// The resource profile always matches the current start times: every
/// mutation updates both. Cloning copies the schedule and the profile while
/// the instance stays shared.
#[derive(Debug, Clone)]
pub struct Solution<'a> {
    instance: &'a Instance,
    start_times: Vec<Option<usize>>,
    objective_value: usize,
    consumption: ResourceProfile,
    error_log: String,
}

impl<'a> Solution<'a> {
    /// Empty solution, nothing scheduled.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            start_times: vec![None; instance.nb_activities()],
            objective_value: 0,
            consumption: ResourceProfile::for_instance(instance),
            error_log: String::new(),
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn start_times(&self) -> &[Option<usize>] {
        &self.start_times
    }

    pub fn start_time(&self, activity: usize) -> Result<Option<usize>, RangeError> {
        self.instance.check_activity(activity)?;
        Ok(self.start_times[activity])
    }

    pub fn finish_time(&self, activity: usize) -> Result<Option<usize>, RangeError> {
        let duration = self.instance.duration(activity)?;
        Ok(self.start_times[activity].map(|start| start + duration))
    }

    /// Makespan of the scheduled activities, kept up to date by every mutation.
    pub fn objective_value(&self) -> usize {
        self.objective_value
    }

    pub fn consumption(&self) -> &ResourceProfile {
        &self.consumption
    }

    /// Diagnostics of the last [`Solution::validate`] call.
    pub fn error_log(&self) -> &str {
        &self.error_log
    }

    pub fn horizon(&self) -> usize {
        self.consumption.horizon()
    }

    pub fn is_complete(&self) -> bool {
        self.start_times.iter().all(Option::is_some)
    }

    /// Schedules `activity` at `start`, moving it if it is already scheduled.
    ///
    /// No feasibility check is done, see [`Solution::is_possible_to_add`].
    /// Fails without touching the solution if `activity` is unknown or if it
    /// would end after the horizon.
    pub fn add_activity(&mut self, activity: usize, start: usize) -> Result<(), RangeError> {
        self.consumption.footprint_end(self.instance, activity, start)?;

        self.remove_activity(activity)?;

        let duration = self.instance.duration(activity)?;
        self.start_times[activity] = Some(start);
        self.objective_value = self.objective_value.max(start + duration);
        self.consumption.add_footprint(self.instance, activity, start)?;

        trace!(
            "added activity {activity} at {start}, objective {}",
            self.objective_value
        );

        Ok(())
    }

    /// Unschedules `activity`, a no-op if it is not scheduled.
    pub fn remove_activity(&mut self, activity: usize) -> Result<(), RangeError> {
        self.instance.check_activity(activity)?;

        if let Some(start) = self.start_times[activity].take() {
            self.consumption.remove_footprint(self.instance, activity, start)?;
            self.evaluate();

            trace!(
                "removed activity {activity} from {start}, objective {}",
                self.objective_value
            );
        }

        Ok(())
    }

    /// Whether placing `activity` at `start` keeps every resource within its
    /// capacity and every precedence with the scheduled activities satisfied.
    ///
    /// If `activity` is already scheduled its current placement is ignored,
    /// as [`Solution::add_activity`] would move it. Nothing is mutated.
    pub fn is_possible_to_add(&self, activity: usize, start: usize) -> Result<bool, RangeError> {
        let duration = self.instance.duration(activity)?;
        let end = match start.checked_add(duration) {
            Some(end) if end <= self.horizon() => end,
            _ => return Ok(false),
        };

        let current = self.start_times[activity];
        let overlaps_current = |time: usize| {
            current.map_or(false, |current| current <= time && time < current + duration)
        };

        for ((row, requirement), &capacity) in self
            .consumption
            .rows()
            .zip(self.instance.requirements(activity))
            .zip(self.instance.capacities())
        {
            if requirement == 0 {
                continue;
            }

            for time in start..end {
                let mut usage = row[time];
                if overlaps_current(time) {
                    usage -= requirement;
                }

                if usage + requirement > capacity {
                    return Ok(false);
                }
            }
        }

        let durations = self.instance.durations();
        for (other, other_start) in self.start_times.iter().enumerate() {
            let Some(other_start) = *other_start else {
                continue;
            };

            // `other` must finish before `activity` starts
            if self.instance.closure_row(other).contains(activity)
                && other_start + durations[other] > start
            {
                return Ok(false);
            }

            // `other` must start after `activity` finishes
            if self.instance.closure_row(activity).contains(other) && other_start < end {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Recomputes the makespan of the scheduled activities, 0 if none is.
    pub fn evaluate(&mut self) -> usize {
        let durations = self.instance.durations();

        self.objective_value = self
            .start_times
            .iter()
            .zip(durations)
            .filter_map(|(start, duration)| start.map(|start| start + duration))
            .max()
            .unwrap_or(0);

        self.objective_value
    }

    /// Checks the whole solution from scratch and records the diagnostics in
    /// [`Solution::error_log`].
    ///
    /// The resource profile is rebuilt from the start times as a side effect.
    pub fn validate(&mut self) -> bool {
        self.check().is_feasible()
    }

    /// Same as [`Solution::validate`], returning every violation found.
    pub fn check(&mut self) -> FeasibilityReport {
        self.evaluate();

        let report = validator::validate(self.instance, &self.start_times, &mut self.consumption);
        self.error_log = report.to_string();

        debug!(
            "validated solution with objective {}: {} violation(s)",
            self.objective_value,
            report.violations().len()
        );

        report
    }
}

impl fmt::Display for Solution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- RCPSP Solution --")?;
        writeln!(f, "Objective value: {}", self.objective_value)?;
        writeln!(f, "Activity schedule:")?;
        for (activity, start) in self.start_times.iter().enumerate() {
            match start {
                Some(start) => writeln!(f, "Activity {activity}: {start}")?,
                None => writeln!(f, "Activity {activity}: -")?,
            }
        }
        write!(f, "---------------------")
    }
}
