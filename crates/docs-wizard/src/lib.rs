//! Guided intake for Philippine government document applications: document
//! selection, personal details and uploads, downloadable requirement
//! checklists, and a mock status tracker.

pub mod catalog;
pub mod checklist;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod wizard;
