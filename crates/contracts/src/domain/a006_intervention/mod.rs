pub mod aggregate;
pub mod workflow;
