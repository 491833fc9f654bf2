//! AI components

pub mod controller;
pub mod difficulty;
pub mod history;
pub mod memory;
pub mod state;
pub mod tuning;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod difficulty_tests;

// Re-export all components
pub use controller::*;
pub use difficulty::*;
pub use history::*;
pub use memory::*;
pub use state::*;
pub use tuning::*;
