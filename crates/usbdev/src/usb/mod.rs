//! USB subsystem
//!
//! Enumerates attached devices through libusb. Devices are only listed and
//! their device descriptors read; nothing is opened or claimed.

pub mod device;
pub mod source;

pub use device::ListedDevice;
pub use source::RusbSource;
