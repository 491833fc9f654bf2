//! AI systems (per-frame pipeline в FixedUpdate)

pub mod pipeline;

// Re-export all systems
pub use pipeline::*;
