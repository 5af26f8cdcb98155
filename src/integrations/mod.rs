pub mod telemetry;

pub use telemetry::{FeedDocument, FeedEntry, FieldMapping, TelemetryClient};
