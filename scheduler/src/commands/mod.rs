mod benchmark;
mod graph;
mod schedule;

pub use benchmark::benchmark;
pub use graph::graph;
pub use schedule::schedule;
