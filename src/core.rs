pub mod accumulator;
pub mod coordinator;
pub mod keys;
pub mod metadata;
pub mod reading;
pub mod snapshot;
