// src/lib.rs

//! Worksheet translation snapshot tracker.
//!
//! Builds per-language snapshots of worksheet translation progress and
//! generated files, persists them, and reports what changed between runs.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod storage;
