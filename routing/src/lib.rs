pub mod algorithms;
pub mod dataset;
pub mod journey;
pub mod raptor;
pub mod transfers;
