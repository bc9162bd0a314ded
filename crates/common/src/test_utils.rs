//! Test utilities for usbdev
//!
//! Provides a scripted device source and database fixtures for testing across crates.
//!
//! # Example
//!
//! ```
//! use common::DeviceSource;
//! use common::test_utils::{ScriptedSource, snapshot_of};
//!
//! let source = ScriptedSource::new(vec![
//!     snapshot_of(&[(0x1d6b, 0x0002)]),
//!     snapshot_of(&[(0x1d6b, 0x0002), (0x046d, 0xc52b)]),
//! ]);
//! assert_eq!(source.snapshot().unwrap().len(), 1);
//! assert_eq!(source.snapshot().unwrap().len(), 2);
//! ```

use crate::usb_types::{DeviceSource, Snapshot};
use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use usbids::UsbId;

/// Default test timeout (5 seconds)
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Small usb.ids excerpt covering the ids used by [`snapshot_of`] callers
pub const SAMPLE_USB_IDS: &str = "\
# Test excerpt of usb.ids
046d  Logitech, Inc.
	c077  Mouse
	c52b  Unifying Receiver
0781  SanDisk Corp.
	5567  Cruzer Blade
1d6b  Linux Foundation
	0002  2.0 root hub
	0003  3.0 root hub

C 00  (Defined at Interface level)
";

/// Build a snapshot from `(vendor_id, product_id)` pairs
pub fn snapshot_of(ids: &[(u16, u16)]) -> Snapshot {
    ids.iter()
        .map(|&(vid, pid)| UsbId::new(vid, pid))
        .collect()
}

/// Write [`SAMPLE_USB_IDS`] to `dir/usb.ids` and return its path
pub fn write_sample_database(dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join("usb.ids");
    std::fs::write(&path, SAMPLE_USB_IDS)?;
    Ok(path)
}

/// Device source that replays a fixed sequence of snapshots
///
/// Each call to `snapshot` returns the next one in the script. Once the
/// script runs out, the last snapshot is repeated.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Snapshot>>,
    last: Mutex<Snapshot>,
    calls: AtomicUsize,
    fail_at: Option<usize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Snapshot>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(Snapshot::new()),
            calls: AtomicUsize::new(0),
            fail_at: None,
        }
    }

    /// Same as [`ScriptedSource::new`] but the `n`th call (0-based) fails
    pub fn failing_at(script: Vec<Snapshot>, n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::new(script)
        }
    }

    /// Number of snapshots taken so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DeviceSource for ScriptedSource {
    fn snapshot(&self) -> crate::Result<Snapshot> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(call) {
            return Err(crate::Error::Usb("scripted enumeration failure".to_string()));
        }

        let mut last = self.last.lock().expect("last snapshot lock poisoned");
        if let Some(next) = self.script.lock().expect("script lock poisoned").pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }
}

/// Run a future with a timeout
///
/// # Example
/// ```ignore
/// use common::test_utils::{with_timeout, DEFAULT_TEST_TIMEOUT};
///
/// #[tokio::test]
/// async fn test_with_timeout() {
///     let result = with_timeout(DEFAULT_TEST_TIMEOUT, async { 42 }).await.unwrap();
///     assert_eq!(result, 42);
/// }
/// ```
pub async fn with_timeout<T, F>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| TimeoutError { duration })
}

/// Error returned when a test times out
#[derive(Debug)]
pub struct TimeoutError {
    /// The timeout duration that was exceeded
    pub duration: Duration,
}

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Test timed out after {:?}", self.duration)
    }
}

impl std::error::Error for TimeoutError {}
