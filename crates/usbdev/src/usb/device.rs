//! USB device abstraction
//!
//! Reduces a `rusb::Device` to the bus position and id pair the watcher and
//! the device listing need. Only the device descriptor is read; devices are
//! never opened.

use rusb::{Device, UsbContext};
use serde::Serialize;
use usbids::UsbId;

/// A device seen during enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListedDevice {
    /// Bus number
    pub bus_number: u8,
    /// Device address on the bus
    pub device_address: u8,
    /// Vendor/product pair from the device descriptor
    pub id: UsbId,
}

impl ListedDevice {
    /// Read the device descriptor of `device`
    pub fn from_rusb<T: UsbContext>(device: &Device<T>) -> Result<Self, rusb::Error> {
        let descriptor = device.device_descriptor()?;

        Ok(Self {
            bus_number: device.bus_number(),
            device_address: device.address(),
            id: UsbId::new(descriptor.vendor_id(), descriptor.product_id()),
        })
    }

    /// Sort key: bus, then address
    pub fn position(&self) -> (u8, u8) {
        (self.bus_number, self.device_address)
    }
}
