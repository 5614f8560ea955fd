//! Test Helper Utilities
//!
//! Shared utilities for testing mvg-engine

#![allow(dead_code)]

pub mod audio_generator;
pub mod log_capture;

// Re-export commonly used items
pub use audio_generator::{generate_burst_wav, generate_silent_wav, BurstConfig};
pub use log_capture::{capture_logs, LogCapture};
