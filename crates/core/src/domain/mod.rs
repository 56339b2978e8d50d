pub mod contract;
pub mod factors;
pub mod strategy;
