//! Shared test utilities for astromap integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with a temp data root
//! - Fake collaborators for the resolver and the orchestrator

pub mod fakes;
pub mod harness;

pub use fakes::*;
pub use harness::TestHarness;
