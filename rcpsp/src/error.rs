use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Activity,
    Resource,
    Time,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Activity => write!(f, "activity"),
            IndexKind::Resource => write!(f, "resource"),
            IndexKind::Time => write!(f, "time"),
        }
    }
}

/// An index outside of its domain `0..bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{index} is not a valid {kind} index (expected 0..{bound})")]
pub struct RangeError {
    pub kind: IndexKind,
    pub index: usize,
    pub bound: usize,
}

impl RangeError {
    /// Fails unless `index < bound`.
    pub(crate) fn check(kind: IndexKind, index: usize, bound: usize) -> Result<(), RangeError> {
        if index < bound {
            Ok(())
        } else {
            Err(RangeError { kind, index, bound })
        }
    }
}

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("expected {expected} {what}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid successor of activity {activity}: {source}")]
    InvalidSuccessor {
        activity: usize,
        #[source]
        source: RangeError,
    },
    #[error("activity {0} cannot precede itself")]
    SelfPrecedence(usize),
    #[error("job number {0} does not appear in the requests/durations section")]
    UnknownJob(usize),
}
