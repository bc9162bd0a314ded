//! Name resolution and report output

use crate::config::OutputFormat;
use crate::usb::ListedDevice;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, warn};
use usbids::{ResolvedDevice, UsbId, UsbIdDatabase};

/// Resolve names for `ids`, falling back to bare ids
///
/// A missing or unreadable database is not fatal: the ids are still worth
/// printing, so every id comes back unresolved and a warning is logged.
pub fn resolve_devices(candidates: &[PathBuf], ids: Vec<UsbId>) -> Vec<ResolvedDevice> {
    if ids.is_empty() {
        return Vec::new();
    }

    match lookup_names(candidates, &ids) {
        Ok(devices) => devices,
        Err(e) => {
            warn!("Could not resolve device names: {}", e);
            let mut ids = ids;
            ids.sort();
            ids.dedup();
            ids.into_iter().map(ResolvedDevice::unresolved).collect()
        }
    }
}

fn lookup_names(candidates: &[PathBuf], ids: &[UsbId]) -> common::Result<Vec<ResolvedDevice>> {
    let db = UsbIdDatabase::locate(candidates)?;
    debug!("Resolving {} ids from {}", ids.len(), db.path().display());
    Ok(db.resolve(ids.iter().copied())?)
}

#[derive(Serialize)]
struct DeviceEntry<'a> {
    id: String,
    vendor_id: u16,
    product_id: u16,
    vendor: Option<&'a str>,
    product: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bus: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<u8>,
}

impl<'a> DeviceEntry<'a> {
    fn new(device: &'a ResolvedDevice) -> Self {
        Self {
            id: device.id.to_string(),
            vendor_id: device.id.vendor_id,
            product_id: device.id.product_id,
            vendor: device.vendor.as_deref(),
            product: device.product.as_deref(),
            bus: None,
            address: None,
        }
    }
}

#[derive(Serialize)]
struct FoundReport<'a> {
    found: Vec<DeviceEntry<'a>>,
}

#[derive(Serialize)]
struct ListReport<'a> {
    devices: Vec<DeviceEntry<'a>>,
}

/// Print the devices found by a watch
pub fn write_found<W: Write + ?Sized>(
    out: &mut W,
    format: OutputFormat,
    devices: &[ResolvedDevice],
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            if devices.is_empty() {
                writeln!(out, "No device found")?;
            } else {
                writeln!(out, "Found:")?;
                for device in devices {
                    writeln!(
                        out,
                        "{} '{} {}'",
                        device.id,
                        device.display_vendor(),
                        device.display_product()
                    )?;
                }
            }
        }
        OutputFormat::Json => {
            let report = FoundReport {
                found: devices.iter().map(DeviceEntry::new).collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Print every attached device with its names
///
/// `names` holds the resolution of the listed ids; a device whose id is
/// missing from it prints as unknown.
pub fn write_device_list<W: Write + ?Sized>(
    out: &mut W,
    format: OutputFormat,
    devices: &[ListedDevice],
    names: &[ResolvedDevice],
) -> io::Result<()> {
    let lookup = |id: UsbId| {
        names
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .unwrap_or_else(|| ResolvedDevice::unresolved(id))
    };
    let resolved: Vec<ResolvedDevice> = devices.iter().map(|d| lookup(d.id)).collect();

    match format {
        OutputFormat::Text => {
            if devices.is_empty() {
                writeln!(out, "No USB devices found.")?;
            }
            for (device, names) in devices.iter().zip(&resolved) {
                writeln!(
                    out,
                    "Bus {:03} Device {:03}: ID {} {} {}",
                    device.bus_number,
                    device.device_address,
                    device.id,
                    names.display_vendor(),
                    names.display_product()
                )?;
            }
        }
        OutputFormat::Json => {
            let report = ListReport {
                devices: devices
                    .iter()
                    .zip(&resolved)
                    .map(|(device, names)| DeviceEntry {
                        bus: Some(device.bus_number),
                        address: Some(device.device_address),
                        ..DeviceEntry::new(names)
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
