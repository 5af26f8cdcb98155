//! Crop advisor
//!
//! Trains a crop classifier on temperature and humidity at startup and serves
//! recommendations over HTTP, either from caller-supplied values or from the
//! newest reading of a ThingSpeak telemetry channel.

pub mod api;
pub mod config;
pub mod error;
pub mod integrations;
pub mod metrics;
pub mod ml;
pub mod models;
pub mod service;

pub use error::{AppError, Result};
