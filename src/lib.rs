pub mod checks;
pub mod conditions;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod evaluation;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
