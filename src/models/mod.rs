pub mod prediction;
pub mod sensor;

pub use prediction::*;
pub use sensor::*;
