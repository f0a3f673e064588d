mod compare;
mod compute;

pub use compare::{compare_statistics, StatsError};
pub use compute::compute_statistics;

pub(crate) use compute::NO_DATA_MESSAGE;
