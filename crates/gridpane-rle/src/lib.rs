// ABOUTME: Run-length encoded storage for long homogeneous sequences.
// ABOUTME: Random access, splicing, resizing and filling over compressed runs.

mod store;

pub use store::{Run, RunStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RleError {
    #[error("Run {index} has zero length")]
    EmptyRun { index: usize },
}
