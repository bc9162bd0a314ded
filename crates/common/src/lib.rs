//! Common utilities for usbdev
//!
//! This crate provides functionality shared between the usbdev binary and its
//! tests: the error type, logging setup, device snapshots and the
//! `DeviceSource` seam that hides USB enumeration from the watcher.

pub mod error;
pub mod logging;
pub mod test_utils;
pub mod usb_types;

pub use error::{Error, Result};
pub use logging::setup_logging;
pub use usb_types::{DeviceSource, Snapshot};
