//! USB snapshot types shared by the watcher and its device sources

use std::collections::BTreeMap;
use usbids::UsbId;

/// Ids of every device present at one instant
///
/// Kept as a multiset so that plugging in a second device with the same
/// vendor/product pair as one already present still shows up as a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    counts: BTreeMap<UsbId, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: UsbId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// Number of devices with this id
    pub fn count(&self, id: &UsbId) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Total number of devices
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Ids that appeared (or gained another instance) since `before`
    ///
    /// Removed devices are not reported. The result is sorted and contains
    /// each id once.
    pub fn added_since(&self, before: &Snapshot) -> Vec<UsbId> {
        self.counts
            .iter()
            .filter(|(id, count)| **count > before.count(id))
            .map(|(id, _)| *id)
            .collect()
    }
}

impl FromIterator<UsbId> for Snapshot {
    fn from_iter<T: IntoIterator<Item = UsbId>>(iter: T) -> Self {
        let mut snapshot = Snapshot::new();
        for id in iter {
            snapshot.insert(id);
        }
        snapshot
    }
}

/// Something that can list the ids of the devices currently attached
///
/// Implementations may block (libusb enumeration does); callers on an async
/// runtime should run `snapshot` on a blocking thread.
pub trait DeviceSource: Send + Sync {
    fn snapshot(&self) -> crate::Result<Snapshot>;
}
