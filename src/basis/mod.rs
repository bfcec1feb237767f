//! Basis device-inventory integration module
//!
//! - `client`: Inventory API client (device listing)

pub mod client;

pub use client::{BasisClient, DeviceRecord, PANEL_TYPE_ID};
