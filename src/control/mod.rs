//! Water-level policy: classification, threshold commits, and the
//! automatic floodgate schedule.

pub mod gates;

pub use gates::{GateAngles, Thresholds, ThresholdField, WaterState, auto_control, classify};
