//! gridprobe: power-system data probes.
//!
//! Two independent analyses share the configuration, logging and reporting
//! layers:
//!
//! - [`balancing`] fetches one day of Baltic aFRR activation and imbalance
//!   volumes, aligns them and summarises how they relate.
//! - [`cgmes`] scans a CGMES equipment model for capacities, winding
//!   voltages, line limits, the slack generator and common defects.

pub mod balancing;
pub mod cgmes;
pub mod config;
pub mod core;
pub mod reporting;
pub mod ui;

pub use config::{CliConfig, Config};
pub use crate::core::{GridProbeError, Result};
