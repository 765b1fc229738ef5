//! Side-effect adapters
//!
//! Collaborators the timer core talks to through a port, such as the
//! audible chime played when a phase completes.

pub mod chime;

// Re-export main types
pub use chime::{Chime, DecayingTone, ToneChime};
