//! coach library - profile and service catalog admin for personal trainers.
//!
//! This library exposes the core of the `coach` CLI for use in tests and
//! other front ends.
//!
//! # Modules
//!
//! - `model`: the configuration record, its fields and structural diff
//! - `store`: configuration store over pluggable key/value storage
//! - `draft`: view-local draft editing with explicit commit
//! - `ingest`: image downscaling and embedding
//! - `onboarding`: first-run flow
//! - `editor`: service editor and confirmation boundaries
//! - `session`: screen gating and the interactive session
//! - `settings`: user settings files
//! - `output`: output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod backup;
pub mod cli;
pub mod draft;
pub mod editor;
pub mod error;
pub mod gallery;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod onboarding;
pub mod output;
pub mod session;
pub mod settings;
pub mod store;
pub mod theme;
