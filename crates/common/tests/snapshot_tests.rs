//! Snapshot Integration Tests
//!
//! Tests for snapshot diffing fed by a scripted device source, and for
//! resolving the diff against the sample database fixture.
//!
//! Run with: `cargo test -p common --test snapshot_tests`

use common::test_utils::{ScriptedSource, snapshot_of, write_sample_database};
use common::{DeviceSource, Error, Snapshot};
use usbids::{UsbId, UsbIdDatabase};

// ============================================================================
// Diffing Tests
// ============================================================================

#[test]
fn test_diff_between_consecutive_snapshots() {
    let source = ScriptedSource::new(vec![
        snapshot_of(&[(0x1d6b, 0x0002), (0x1d6b, 0x0003)]),
        snapshot_of(&[(0x1d6b, 0x0002), (0x1d6b, 0x0003), (0x0781, 0x5567)]),
    ]);

    let before = source.snapshot().unwrap();
    let after = source.snapshot().unwrap();

    assert_eq!(after.added_since(&before), vec![UsbId::new(0x0781, 0x5567)]);
}

#[test]
fn test_no_change_yields_empty_diff() {
    let source = ScriptedSource::new(vec![snapshot_of(&[(0x1d6b, 0x0002)])]);

    let before = source.snapshot().unwrap();
    let after = source.snapshot().unwrap();

    assert!(after.added_since(&before).is_empty());
}

#[test]
fn test_swap_reports_only_the_arrival() {
    let before = snapshot_of(&[(0x1d6b, 0x0002), (0x046d, 0xc077)]);
    let after = snapshot_of(&[(0x1d6b, 0x0002), (0x046d, 0xc52b)]);

    assert_eq!(after.added_since(&before), vec![UsbId::new(0x046d, 0xc52b)]);
}

#[test]
fn test_several_arrivals_are_sorted() {
    let before = Snapshot::new();
    let after = snapshot_of(&[(0x1d6b, 0x0003), (0x046d, 0xc52b), (0x0781, 0x5567)]);

    assert_eq!(
        after.added_since(&before),
        vec![
            UsbId::new(0x046d, 0xc52b),
            UsbId::new(0x0781, 0x5567),
            UsbId::new(0x1d6b, 0x0003),
        ]
    );
}

#[test]
fn test_source_error_is_usb_error() {
    let source = ScriptedSource::failing_at(Vec::new(), 0);
    let err = source.snapshot().unwrap_err();

    assert!(matches!(err, Error::Usb(_)));
    assert!(err.to_string().starts_with("USB error"));
}

// ============================================================================
// Resolution Tests
// ============================================================================

#[test]
fn test_diff_resolves_against_sample_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample_database(dir.path()).unwrap();

    let before = snapshot_of(&[(0x1d6b, 0x0002)]);
    let after = snapshot_of(&[(0x1d6b, 0x0002), (0x046d, 0xc52b)]);

    let resolved = UsbIdDatabase::new(path)
        .resolve(after.added_since(&before))
        .unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].display_vendor(), "Logitech, Inc.");
    assert_eq!(resolved[0].display_product(), "Unifying Receiver");
}

#[test]
fn test_database_error_converts_to_common_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = UsbIdDatabase::new(dir.path().join("absent.ids"))
        .resolve([UsbId::new(1, 1)])
        .unwrap_err();

    let err: Error = err.into();
    assert!(matches!(err, Error::Database(_)));
}
