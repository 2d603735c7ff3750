//! Audio file loading and sample conversion

pub mod loader;

pub use loader::{load_samples, SAMPLE_RATE};
