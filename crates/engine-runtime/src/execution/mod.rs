pub mod executor;
pub mod stages;
