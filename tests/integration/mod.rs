//! Integration test suite for pertplan.
//!
//! These tests drive the engine the way a caller would: from an upstream
//! model response or an intake conversation to a finished estimate.
//!
//! # Test Categories
//!
//! - `estimate_e2e`: Response parsing through to the project estimate
//! - `tolerance`: Anomalies that must be absorbed rather than raised
//! - `intake_flow`: Conversation to decomposition prompt
//!
//! # CI Compatibility
//!
//! No test touches the network or persistent storage.

mod fixtures;

mod estimate_e2e;
mod intake_flow;
