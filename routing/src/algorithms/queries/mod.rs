pub mod earliest_arrival;
pub mod range;
