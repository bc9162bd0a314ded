//! Plug-in detection loop
//!
//! Takes a baseline snapshot, then repeatedly waits one interval and takes
//! another snapshot, diffing it against the previous one. The loop ends when
//! something new shows up, when the poll ceiling is reached, or when the
//! shutdown future resolves (Ctrl+C).
//!
//! Progress is written to `progress` as it happens: a prompt, one dot per
//! poll, and `Done` when the loop ends on its own.

use common::{DeviceSource, Error, Result, Snapshot};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use usbids::UsbId;

/// Prompt written before the first poll
pub const PROMPT: &str = "Plugin USB device now ...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Wait between consecutive snapshots
    pub interval: Duration,
    /// Maximum number of polls; always at least one poll is made
    pub max_polls: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: 60,
        }
    }
}

/// Result of a watch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    /// Newly appeared ids, sorted; empty on timeout or interruption
    pub added: Vec<UsbId>,
    /// Polls completed
    pub polls: u32,
    /// Shutdown was requested before the loop finished
    pub interrupted: bool,
}

/// Watch `source` until a new device appears
pub async fn watch<S, W, F>(
    source: Arc<S>,
    options: WatchOptions,
    progress: &mut W,
    shutdown: F,
) -> Result<WatchOutcome>
where
    S: DeviceSource + 'static,
    W: Write + ?Sized,
    F: Future<Output = ()>,
{
    let mut shutdown = std::pin::pin!(shutdown);
    let mut polls = 0u32;

    write!(progress, "{}", PROMPT)?;
    progress.flush()?;

    let Some(baseline) = until_shutdown(take_snapshot(&source), shutdown.as_mut()).await else {
        return Ok(interrupted(polls));
    };
    let mut before = baseline?;
    debug!("Baseline snapshot: {} devices", before.len());

    loop {
        if until_shutdown(tokio::time::sleep(options.interval), shutdown.as_mut())
            .await
            .is_none()
        {
            return Ok(interrupted(polls));
        }

        polls += 1;
        write!(progress, ".")?;
        progress.flush()?;

        let Some(after) = until_shutdown(take_snapshot(&source), shutdown.as_mut()).await else {
            return Ok(interrupted(polls));
        };
        let after = after?;

        let added = after.added_since(&before);
        if !added.is_empty() || polls >= options.max_polls {
            write!(progress, "Done")?;
            progress.flush()?;

            if added.is_empty() {
                info!("No new device after {} polls", polls);
            } else {
                info!("Detected {} new device id(s) after {} polls", added.len(), polls);
            }

            return Ok(WatchOutcome {
                added,
                polls,
                interrupted: false,
            });
        }

        before = after;
    }
}

fn interrupted(polls: u32) -> WatchOutcome {
    info!("Watch interrupted after {} polls", polls);
    WatchOutcome {
        added: Vec::new(),
        polls,
        interrupted: true,
    }
}

/// Run `fut` unless `shutdown` resolves first
async fn until_shutdown<T, F>(fut: impl Future<Output = T>, shutdown: Pin<&mut F>) -> Option<T>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        value = fut => Some(value),
        () = shutdown => None,
    }
}

/// Take a snapshot on the blocking pool; libusb enumeration blocks
async fn take_snapshot<S>(source: &Arc<S>) -> Result<Snapshot>
where
    S: DeviceSource + 'static,
{
    let source = Arc::clone(source);
    tokio::task::spawn_blocking(move || source.snapshot())
        .await
        .map_err(|e| Error::Other(format!("Snapshot task failed: {}", e)))?
}
