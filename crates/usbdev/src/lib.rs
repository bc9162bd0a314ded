//! usbdev
//!
//! Recognizes newly plugged USB devices. The watcher diffs snapshots of the
//! attached devices taken one interval apart; new vendor/product ids are then
//! resolved to names through the local `usb.ids` database.

pub mod config;
pub mod report;
pub mod usb;
pub mod watcher;

pub use config::{OutputFormat, UsbdevConfig};
pub use watcher::{WatchOptions, WatchOutcome, watch};
