//! libusb-backed device source
//!
//! Enumerates the devices currently attached through a `rusb::Context`.

use crate::usb::device::ListedDevice;
use common::{DeviceSource, Error, Snapshot};
use rusb::{Context, UsbContext};
use tracing::{debug, warn};

/// Device source that asks libusb for the current device list
pub struct RusbSource {
    /// USB context for device operations
    context: Context,
}

impl RusbSource {
    /// Create a new libusb context
    pub fn new() -> Result<Self, rusb::Error> {
        let context = Context::new()?;
        Ok(Self { context })
    }

    /// List every attached device, sorted by bus and address
    ///
    /// Devices whose descriptor cannot be read are skipped.
    pub fn list_devices(&self) -> common::Result<Vec<ListedDevice>> {
        let devices = self
            .context
            .devices()
            .map_err(|e| Error::Usb(format!("Failed to list USB devices: {}", e)))?;

        let mut listed: Vec<ListedDevice> = devices
            .iter()
            .filter_map(|device| match ListedDevice::from_rusb(&device) {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!(
                        "Failed to read device descriptor: bus={}, addr={}: {}",
                        device.bus_number(),
                        device.address(),
                        e
                    );
                    None
                }
            })
            .collect();

        listed.sort_by_key(ListedDevice::position);
        debug!("Enumerated {} devices", listed.len());
        Ok(listed)
    }
}

impl DeviceSource for RusbSource {
    fn snapshot(&self) -> common::Result<Snapshot> {
        Ok(self.list_devices()?.into_iter().map(|d| d.id).collect())
    }
}
