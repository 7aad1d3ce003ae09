pub mod coordinator;
pub mod lifecycle;
pub mod stats;
pub mod sweeper;
