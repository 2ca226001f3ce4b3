//! Test helpers for seedbed-factory integration tests.
//!
//! This module provides the model types shared by the integration tests.

#[allow(dead_code)]
#[path = "helpers/models.rs"]
pub mod models;
