//! Sensor telemetry feed (ThingSpeak channel API)

pub mod client;
pub mod feed;

pub use client::TelemetryClient;
pub use feed::{FeedDocument, FeedEntry, FieldMapping};
