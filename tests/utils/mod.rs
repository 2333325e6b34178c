#![allow(dead_code)]

pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{CountingCompetitorRepository, CountingGameRepository};
#[allow(unused_imports)]
pub use setup::{day, TestSetup, TestSetupBuilder};
