//! IdeaBoost - turns rough website ideas into structured, actionable plans.
//!
//! An idea is validated at the HTTP boundary, enhanced by a single AI
//! completion, and optionally emailed to the submitter.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
