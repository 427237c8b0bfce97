use std::collections::VecDeque;
use std::fmt;

use fixedbitset::FixedBitSet;
use log::{debug, warn};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use psp_lib_parser::structs::PspLibProblem;

use crate::error::{IndexKind, InstanceError, RangeError};

type Graph = DiGraph<usize, ()>;

/// Immutable RCPSP data: activities, renewable resources and precedences.
///
/// Node `j` of the precedence graph is activity `j`. Both the raw input
/// relation and its transitive closure are kept, the closure is built once
/// here and never recomputed.
#[derive(Debug, Clone)]
pub struct Instance {
    durations: Vec<usize>,
    capacities: Vec<usize>,
    // consumptions[resource][activity]
    consumptions: Vec<Vec<usize>>,
    graph: Graph,
    direct_precedences: Vec<FixedBitSet>,
    precedences: Vec<FixedBitSet>,
}

impl Instance {
    /// `consumptions` is resource-major, `successors[j]` lists the direct
    /// successors of activity `j`.
    pub fn new(
        durations: Vec<usize>,
        capacities: Vec<usize>,
        consumptions: Vec<Vec<usize>>,
        successors: Vec<Vec<usize>>,
    ) -> Result<Self, InstanceError> {
        let nb_activities = durations.len();
        let nb_resources = capacities.len();

        if consumptions.len() != nb_resources {
            return Err(InstanceError::DimensionMismatch {
                what: "consumption rows (one per resource)",
                expected: nb_resources,
                found: consumptions.len(),
            });
        }
        if let Some(row) = consumptions.iter().find(|row| row.len() != nb_activities) {
            return Err(InstanceError::DimensionMismatch {
                what: "consumption columns (one per activity)",
                expected: nb_activities,
                found: row.len(),
            });
        }
        if successors.len() != nb_activities {
            return Err(InstanceError::DimensionMismatch {
                what: "successor lists (one per activity)",
                expected: nb_activities,
                found: successors.len(),
            });
        }

        let mut graph = Graph::with_capacity(nb_activities, 0);
        for activity in 0..nb_activities {
            graph.add_node(activity);
        }

        let mut direct_precedences = vec![FixedBitSet::with_capacity(nb_activities); nb_activities];
        for (activity, activity_successors) in successors.iter().enumerate() {
            for &successor in activity_successors {
                RangeError::check(IndexKind::Activity, successor, nb_activities)
                    .map_err(|source| InstanceError::InvalidSuccessor { activity, source })?;

                if successor == activity {
                    return Err(InstanceError::SelfPrecedence(activity));
                }
                if successor < activity {
                    warn!(
                        "precedence {activity} -> {successor} does not follow the activity numbering, it will not be expanded transitively"
                    );
                }

                if !direct_precedences[activity].put(successor) {
                    graph.add_edge(NodeIndex::new(activity), NodeIndex::new(successor), ());
                }
            }
        }

        let precedences = transitive_closure(&direct_precedences);

        debug!(
            "instance with {nb_activities} activities, {nb_resources} resources and {} precedences ({} after closure)",
            graph.edge_count(),
            precedences.iter().map(|row| row.count_ones(..)).sum::<usize>()
        );

        Ok(Self {
            durations,
            capacities,
            consumptions,
            graph,
            direct_precedences,
            precedences,
        })
    }

    pub fn nb_activities(&self) -> usize {
        self.durations.len()
    }

    pub fn nb_resources(&self) -> usize {
        self.capacities.len()
    }

    pub fn duration(&self, activity: usize) -> Result<usize, RangeError> {
        self.check_activity(activity)?;
        Ok(self.durations[activity])
    }

    pub fn capacity(&self, resource: usize) -> Result<usize, RangeError> {
        self.check_resource(resource)?;
        Ok(self.capacities[resource])
    }

    /// Units of `resource` used by `activity` at every step it runs.
    pub fn consumption(&self, resource: usize, activity: usize) -> Result<usize, RangeError> {
        self.check_resource(resource)?;
        self.check_activity(activity)?;
        Ok(self.consumptions[resource][activity])
    }

    /// True if `a` must finish before `b` starts, transitively.
    pub fn precedence(&self, a: usize, b: usize) -> Result<bool, RangeError> {
        self.check_activity(a)?;
        self.check_activity(b)?;
        Ok(self.precedences[a].contains(b))
    }

    /// True only for the edges given as input.
    pub fn direct_precedence(&self, a: usize, b: usize) -> Result<bool, RangeError> {
        self.check_activity(a)?;
        self.check_activity(b)?;
        Ok(self.direct_precedences[a].contains(b))
    }

    /// Direct successors of `activity`, ascending.
    pub fn successors(&self, activity: usize) -> Result<Vec<usize>, RangeError> {
        self.check_activity(activity)?;
        Ok(self.direct_precedences[activity].ones().collect())
    }

    /// Direct predecessors of `activity`, ascending.
    pub fn predecessors(&self, activity: usize) -> Result<Vec<usize>, RangeError> {
        self.check_activity(activity)?;
        let mut predecessors: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(activity), Direction::Incoming)
            .map(|node| self.graph[node])
            .collect();
        predecessors.sort_unstable();
        Ok(predecessors)
    }

    /// Sum of all durations, an upper bound on the makespan.
    pub fn horizon(&self) -> usize {
        self.durations.iter().sum()
    }

    /// Longest duration-weighted chain of precedences, a makespan lower bound
    /// ignoring resources. `None` when the precedences contain a cycle.
    pub fn critical_path_length(&self) -> Option<usize> {
        let order = algo::toposort(&self.graph, None).ok()?;

        let mut finish = vec![0; self.nb_activities()];
        for node in order {
            let activity = self.graph[node];
            let start = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|predecessor| finish[self.graph[predecessor]])
                .max()
                .unwrap_or(0);
            finish[activity] = start + self.durations[activity];
        }

        Some(finish.into_iter().max().unwrap_or(0))
    }

    pub(crate) fn durations(&self) -> &[usize] {
        &self.durations
    }

    pub(crate) fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    /// Consumption of every resource by `activity`, unchecked.
    pub(crate) fn requirements(&self, activity: usize) -> impl Iterator<Item = usize> + '_ {
        self.consumptions.iter().map(move |row| row[activity])
    }

    pub(crate) fn closure_row(&self, activity: usize) -> &FixedBitSet {
        &self.precedences[activity]
    }

    pub(crate) fn check_activity(&self, activity: usize) -> Result<(), RangeError> {
        RangeError::check(IndexKind::Activity, activity, self.nb_activities())
    }

    fn check_resource(&self, resource: usize) -> Result<(), RangeError> {
        RangeError::check(IndexKind::Resource, resource, self.nb_resources())
    }
}

/// For every activity, expand its direct successors into all activities that
/// follow it. Only successors with a higher index than the expanded activity
/// are followed, which relies on the numbering being topological.
fn transitive_closure(direct: &[FixedBitSet]) -> Vec<FixedBitSet> {
    let nb_activities = direct.len();
    let mut closure = direct.to_vec();

    for activity in 0..nb_activities {
        let mut queued = FixedBitSet::with_capacity(nb_activities);
        let mut worklist: VecDeque<usize> = VecDeque::new();

        for successor in direct[activity].ones().filter(|&s| s > activity) {
            queued.insert(successor);
            worklist.push_back(successor);
        }

        while let Some(current) = worklist.pop_front() {
            closure[activity].insert(current);

            for next in direct[current].ones().filter(|&s| s > current) {
                if !queued.put(next) {
                    worklist.push_back(next);
                }
            }
        }
    }

    closure
}

impl TryFrom<&PspLibProblem> for Instance {
    type Error = InstanceError;

    fn try_from(psp: &PspLibProblem) -> Result<Self, Self::Error> {
        let nb_activities = psp.request_durations.len();
        let nb_resources = psp.resources.renewable;

        if psp.resource_availabilities.len() < nb_resources {
            return Err(InstanceError::DimensionMismatch {
                what: "resource availabilities",
                expected: nb_resources,
                found: psp.resource_availabilities.len(),
            });
        }

        // Job numbers start at 1 in PSPLIB files
        let index_of = |job_number: usize| -> Result<usize, InstanceError> {
            psp.request_durations
                .iter()
                .position(|request| request.job_number == job_number)
                .ok_or(InstanceError::UnknownJob(job_number))
        };

        let mut durations = vec![0; nb_activities];
        let mut consumptions = vec![vec![0; nb_activities]; nb_resources];
        for (activity, request) in psp.request_durations.iter().enumerate() {
            if request.requests.len() < nb_resources {
                return Err(InstanceError::DimensionMismatch {
                    what: "resource requests",
                    expected: nb_resources,
                    found: request.requests.len(),
                });
            }

            durations[activity] = request.duration;
            for (resource, row) in consumptions.iter_mut().enumerate() {
                row[activity] = request.requests[resource];
            }
        }

        let mut successors = vec![vec![]; nb_activities];
        for relation in &psp.precedence_relations {
            let activity = index_of(relation.job_number)?;
            for &successor in &relation.successors {
                successors[activity].push(index_of(successor)?);
            }
        }

        let capacities = psp.resource_availabilities[..nb_resources].to_vec();

        Instance::new(durations, capacities, consumptions, successors)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of activities: {}", self.nb_activities())?;
        writeln!(f, "Number of resources: {}", self.nb_resources())?;
        write!(f, "Resources(capacity):")?;
        for (resource, capacity) in self.capacities.iter().enumerate() {
            write!(f, " {resource}({capacity})")?;
        }
        writeln!(f)?;
        writeln!(f, "Activities#resources(consumption):")?;
        for activity in 0..self.nb_activities() {
            write!(f, "Activity {activity}:")?;
            for (resource, consumption) in self.requirements(activity).enumerate() {
                if consumption > 0 {
                    write!(f, " #{resource}({consumption})")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
