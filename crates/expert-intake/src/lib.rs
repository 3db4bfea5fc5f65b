//! Core workflows behind the expert enrollment wizard: dependent location
//! resolution, attachment encoding, the multi-step wizard state machine, and
//! the two-phase submission pipeline.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
