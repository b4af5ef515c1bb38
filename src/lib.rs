//! WellView - adaptive resolution engine for groundwater-well time series
//!
//! This library decides how much well data a chart should ask for: which
//! sampling rate fits a time window under a point budget, how raw readings
//! are compressed to that rate, and how the window moves when the user
//! navigates, zooms or pans.
//!
//! ## Module Structure
//!
//! - [`state`] - Core data types and constants
//! - [`sampling`] - Sampling rate catalog and rate selection
//! - [`downsample`] - Epoch-anchored time-bucket aggregation
//! - [`navigation`] - Resolution modes and window navigation
//! - [`viewport`] - Wheel zoom and drag pan translation
//! - [`fetch`] - Reading store trait and stale-response suppression
//! - [`session`] - Per-chart session composing the above
//! - [`events`] - View event channel
//! - [`stats`] - Summary statistics over readings
//! - [`export`] - Export size estimation and JSON export
//! - [`settings`] - Engine settings persistence

pub mod downsample;
pub mod events;
pub mod export;
pub mod fetch;
pub mod navigation;
pub mod sampling;
pub mod session;
pub mod settings;
pub mod state;
pub mod stats;
pub mod viewport;
