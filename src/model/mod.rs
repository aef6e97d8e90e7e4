//! Bleaching classifier
//!
//! The serving path only ever touches [`forest`] and [`artifact`]; the
//! [`training`] and [`evaluation`] modules exist for the offline trainer
//! binary.

pub mod artifact;
pub mod evaluation;
pub mod forest;
pub mod training;

pub use artifact::{load_model, save_model};
pub use forest::{BleachingModel, FEATURE_COLUMNS, FEATURE_COUNT};
