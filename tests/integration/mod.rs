//! Integration tests for configuration amalgamation

mod concurrency;
mod config_update;
mod extraction;
mod merge_determinism;
mod partial_failure;
mod plugin_registry;
