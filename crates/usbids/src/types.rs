//! USB identifier type definitions
//!
//! This module defines the vendor/product identifier pair reported by every
//! USB device and the name-resolved form produced by a database lookup.

use crate::error::IdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vendor/product identifier pair
///
/// Ordered by vendor first, then product, so sorted collections of ids group
/// devices of the same vendor together (the order of the `usb.ids` file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsbId {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
}

impl UsbId {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl fmt::Display for UsbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

impl FromStr for UsbId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (vid, pid) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| IdError::InvalidPair(s.to_string()))?;

        if pid.contains(':') {
            return Err(IdError::InvalidPair(s.to_string()));
        }

        Ok(Self::new(parse_hex_id(vid)?, parse_hex_id(pid)?))
    }
}

/// Parse a single 1-4 digit hex identifier, with or without a `0x` prefix
pub fn parse_hex_id(s: &str) -> Result<u16, IdError> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if hex.is_empty() {
        return Err(IdError::Empty);
    }
    if hex.len() > 4 {
        return Err(IdError::TooLong(s.to_string()));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IdError::InvalidHex(s.to_string()));
    }

    u16::from_str_radix(hex, 16).map_err(|_| IdError::InvalidHex(s.to_string()))
}

/// A device id together with the names found for it in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDevice {
    pub id: UsbId,
    /// Vendor name, if the vendor is listed
    pub vendor: Option<String>,
    /// Product name, if the product is listed under its vendor
    pub product: Option<String>,
}

impl ResolvedDevice {
    /// An entry with no names attached
    pub fn unresolved(id: UsbId) -> Self {
        Self {
            id,
            vendor: None,
            product: None,
        }
    }

    pub fn display_vendor(&self) -> &str {
        self.vendor.as_deref().unwrap_or("Unknown vendor")
    }

    pub fn display_product(&self) -> &str {
        self.product.as_deref().unwrap_or("Unknown product")
    }

    /// Both names are known; nothing more to look up
    pub fn is_complete(&self) -> bool {
        self.vendor.is_some() && self.product.is_some()
    }
}
