//! Offline dataset handling
//!
//! CSV loading and training preparation for the bleaching dataset.
//! Nothing here runs on the serving path.

pub mod csv;
pub mod prepare;

pub use csv::{RawRow, read_bleaching_csv};
pub use prepare::{Dataset, prepare, stratified_split};
