//! Test module for shelf-core
//!
//! This module contains cross-component tests for:
//! - Startup population (fetch, filter, order merge, hidden skip)
//! - Event handling (install/uninstall, hide/show, reorder, select)
//! - Event queueing across the in-flight startup fetch
//! - Preference persistence driven through the orchestrator

mod fixtures;
