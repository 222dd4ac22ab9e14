//! Schema module
//!
//! Contains the serde models exchanged with the UI layer and stored as JSON.

pub mod job;
pub mod outline;

pub use job::{JobParams, ASPECT_RATIOS};
pub use outline::{Outline, Scene};
