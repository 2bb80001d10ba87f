//! Test utilities and fixtures for packrt
//!
//! This crate provides shared test helpers that can be used by the
//! integration tests (tests/ directory) and benches of the workspace.

pub mod fixtures;
pub mod mocks;
pub mod run;
