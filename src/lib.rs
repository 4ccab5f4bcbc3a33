//! Crop leaf diagnosis API.
//!
//! Accepts a leaf photo plus a crop label, asks a multimodal model for a
//! structured diagnosis and returns a response with a guaranteed shape.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod startup;
pub mod telemetry;

pub use startup::{build_router, AppState, RouterOptions};
