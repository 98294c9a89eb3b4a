//! Intelligence gathering.
//!
//! Scans are snapshots of the opponent's home system taken at submission
//! time. They feed the AI and the player's display; turn resolution never
//! reads them.

pub mod scan;

pub use scan::{perform_scan, ScanResult};
