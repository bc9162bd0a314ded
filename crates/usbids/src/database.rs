//! `usb.ids` database scanner
//!
//! The database is a flat text file maintained by the linux-usb.org project:
//!
//! ```text
//! # comment
//! 046d  Logitech, Inc.
//! 	c52b  Unifying Receiver
//! 		00  interface name (ignored)
//! C 00  (Defined at Interface level)
//! ```
//!
//! Vendor lines start with four hex digits. Product lines are indented by one
//! tab and belong to the vendor above them. The vendor list ends at the first
//! unindented line that is not a vendor (the device class, language and HID
//! sections that follow it are not needed for name resolution).
//!
//! Lookups are a single sequential scan: every requested id is resolved in
//! the same pass, and the pass ends as soon as all of them have both names.

use crate::error::{DatabaseError, Result};
use crate::types::{ResolvedDevice, UsbId};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Install location of the usbdev package
pub const DEFAULT_DATABASE_PATH: &str = "/var/lib/usbdev/usb.ids";

/// Locations searched when no database path is configured
pub fn default_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DEFAULT_DATABASE_PATH),
        PathBuf::from("/usr/share/hwdata/usb.ids"),
        PathBuf::from("/usr/share/misc/usb.ids"),
        PathBuf::from("/usr/share/usb.ids"),
    ]
}

/// Handle to a `usb.ids` file on disk
///
/// The file is not read until [`UsbIdDatabase::resolve`] is called, and it is
/// read again on every call; nothing is cached between lookups.
#[derive(Debug, Clone)]
pub struct UsbIdDatabase {
    path: PathBuf,
}

impl UsbIdDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Pick the first candidate path that exists
    pub fn locate<I, P>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut searched = 0;
        for candidate in candidates {
            searched += 1;
            let candidate = candidate.as_ref();
            if candidate.is_file() {
                debug!("Using USB ID database: {}", candidate.display());
                return Ok(Self::new(candidate));
            }
            trace!("No USB ID database at {}", candidate.display());
        }
        Err(DatabaseError::NoCandidates { searched })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve names for `ids` with one scan of the database file
    pub fn resolve<I>(&self, ids: I) -> Result<Vec<ResolvedDevice>>
    where
        I: IntoIterator<Item = UsbId>,
    {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DatabaseError::NotFound {
                path: self.path.clone(),
            },
            _ => DatabaseError::Io(e),
        })?;

        resolve_from(BufReader::new(file), ids)
    }
}

/// Resolve names for `ids` by scanning `reader` once
///
/// Returns one entry per distinct requested id, sorted by id. Ids that are
/// not listed come back with `None` names.
pub fn resolve_from<R, I>(mut reader: R, ids: I) -> Result<Vec<ResolvedDevice>>
where
    R: BufRead,
    I: IntoIterator<Item = UsbId>,
{
    let mut pending: BTreeMap<UsbId, ResolvedDevice> = ids
        .into_iter()
        .map(|id| (id, ResolvedDevice::unresolved(id)))
        .collect();

    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let mut incomplete = pending.len();
    let mut current_vendor: Option<u16> = None;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);

        match classify(line) {
            Line::Skip => {}
            Line::Vendor(vid, name) => {
                current_vendor = Some(vid);
                for (_, dev) in pending.range_mut(vendor_range(vid)) {
                    if dev.vendor.is_none() && !name.is_empty() {
                        dev.vendor = Some(name.to_string());
                        if dev.is_complete() {
                            incomplete -= 1;
                        }
                    }
                }
            }
            Line::Product(pid, name) => {
                let Some(vid) = current_vendor else {
                    continue;
                };
                if let Some(dev) = pending.get_mut(&UsbId::new(vid, pid))
                    && dev.product.is_none()
                    && !name.is_empty()
                {
                    dev.product = Some(name.to_string());
                    if dev.is_complete() {
                        incomplete -= 1;
                    }
                }
            }
            Line::EndOfVendors => {
                debug!("Vendor list ended at line {}", line_no);
                break;
            }
        }

        if incomplete == 0 {
            debug!("All ids resolved after {} lines", line_no);
            break;
        }
    }

    Ok(pending.into_values().collect())
}

/// Classified database line
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// Comment, blank line, interface line or malformed product line
    Skip,
    Vendor(u16, &'a str),
    Product(u16, &'a str),
    /// First unindented line that is not a vendor entry
    EndOfVendors,
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() || line.starts_with('#') || line.starts_with("\t\t") {
        return Line::Skip;
    }

    if let Some(rest) = line.strip_prefix('\t') {
        return match split_entry(rest) {
            Some((pid, name)) => Line::Product(pid, name),
            None => Line::Skip,
        };
    }

    match split_entry(line) {
        Some((vid, name)) => Line::Vendor(vid, name),
        None => Line::EndOfVendors,
    }
}

/// Split `"xxxx  name"` into its id and trimmed name
fn split_entry(s: &str) -> Option<(u16, &str)> {
    let hex = s.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let rest = &s[4..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let id = u16::from_str_radix(hex, 16).ok()?;
    Some((id, rest.trim()))
}

fn vendor_range(vid: u16) -> std::ops::RangeInclusive<UsbId> {
    UsbId::new(vid, 0)..=UsbId::new(vid, u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("# comment"), Line::Skip);
        assert_eq!(classify(""), Line::Skip);
        assert_eq!(classify("   "), Line::Skip);
        assert_eq!(classify("\t\t00  Interface"), Line::Skip);
        assert_eq!(
            classify("046d  Logitech, Inc."),
            Line::Vendor(0x046d, "Logitech, Inc.")
        );
        assert_eq!(
            classify("\tC52B  Unifying Receiver"),
            Line::Product(0xc52b, "Unifying Receiver")
        );
        assert_eq!(classify("C 00  (Defined at Interface level)"), Line::EndOfVendors);
        assert_eq!(classify("BIAS 0  Not Applicable"), Line::EndOfVendors);
        assert_eq!(classify("\tzz  broken"), Line::Skip);
    }

    #[test]
    fn test_split_entry_requires_separator() {
        assert_eq!(split_entry("1234  Name"), Some((0x1234, "Name")));
        assert_eq!(split_entry("1234\tName"), Some((0x1234, "Name")));
        assert_eq!(split_entry("1234"), Some((0x1234, "")));
        assert_eq!(split_entry("12345 Name"), None);
        assert_eq!(split_entry("123"), None);
    }

    #[test]
    fn test_empty_request_reads_nothing() {
        let resolved = resolve_from(Cursor::new("046d  Logitech\n"), Vec::new()).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_product_before_any_vendor_is_ignored() {
        let data = "\t0001  Orphan\n0001  Vendor\n";
        let resolved = resolve_from(Cursor::new(data), [UsbId::new(1, 1)]).unwrap();
        assert_eq!(resolved[0].vendor.as_deref(), Some("Vendor"));
        assert_eq!(resolved[0].product, None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = "046d  Logitech, Inc.\r\n\tc52b  Unifying Receiver\r\n";
        let resolved = resolve_from(Cursor::new(data), [UsbId::new(0x046d, 0xc52b)]).unwrap();
        assert_eq!(resolved[0].display_vendor(), "Logitech, Inc.");
        assert_eq!(resolved[0].display_product(), "Unifying Receiver");
    }
}
