//! Common test utilities for the coach CLI.
//!
//! This module provides infrastructure for end-to-end CLI testing with:
//! - `cli`: CLI runner with output verification and fluent assertions
//! - `fixtures`: Test image, settings and backup file generation
//! - `env`: Serialized environment variable overrides
//! - `assertions`: Output and JSON shape checks
#![allow(dead_code)]

pub mod cli;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
