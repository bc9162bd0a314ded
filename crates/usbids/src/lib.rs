//! USB ID library for usbdev
//!
//! This crate defines the vendor/product identifier types reported by USB
//! devices and resolves them to human-readable names using a local copy of
//! the `usb.ids` database. It performs no USB access of its own.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use usbids::{UsbId, resolve_from};
//!
//! let db = "046d  Logitech, Inc.\n\tc52b  Unifying Receiver\n";
//! let id: UsbId = "046d:c52b".parse().unwrap();
//!
//! let resolved = resolve_from(Cursor::new(db), [id]).unwrap();
//! assert_eq!(resolved[0].display_vendor(), "Logitech, Inc.");
//! assert_eq!(resolved[0].display_product(), "Unifying Receiver");
//! ```

pub mod database;
pub mod error;
pub mod types;

pub use database::{DEFAULT_DATABASE_PATH, UsbIdDatabase, default_candidates, resolve_from};
pub use error::{DatabaseError, IdError, Result};
pub use types::{ResolvedDevice, UsbId, parse_hex_id};
