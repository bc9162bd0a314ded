//! Benchmarks for usb.ids name resolution
//!
//! Measures a full sequential scan over a synthetic database sized like the
//! real one (~3k vendors):
//! - Hit near the start (early exit)
//! - Hit near the end
//! - Miss (whole vendor list scanned)
//! - Batch of ids resolved in one pass

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::io::Cursor;
use usbids::{UsbId, resolve_from};

const VENDORS: u16 = 3000;
const PRODUCTS_PER_VENDOR: u16 = 8;

fn synthetic_database() -> String {
    let mut db = String::from("# synthetic usb.ids\n\n");
    for vid in 1..=VENDORS {
        db.push_str(&format!("{:04x}  Vendor {}\n", vid, vid));
        for pid in 1..=PRODUCTS_PER_VENDOR {
            db.push_str(&format!("\t{:04x}  Product {} of {}\n", pid, pid, vid));
            db.push_str("\t\t00  Interface\n");
        }
    }
    db.push_str("\nC 00  (Defined at Interface level)\n");
    db
}

fn benchmark_single_lookup(c: &mut Criterion) {
    let db = synthetic_database();
    let mut group = c.benchmark_group("single_lookup");
    group.throughput(Throughput::Bytes(db.len() as u64));

    let cases = [
        ("early_hit", UsbId::new(0x0002, 0x0001)),
        ("late_hit", UsbId::new(VENDORS, PRODUCTS_PER_VENDOR)),
        ("miss", UsbId::new(0xffff, 0xffff)),
    ];

    for (name, id) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &id, |b, id| {
            b.iter(|| resolve_from(Cursor::new(db.as_bytes()), [black_box(*id)]).unwrap())
        });
    }

    group.finish();
}

fn benchmark_batch_lookup(c: &mut Criterion) {
    let db = synthetic_database();
    let mut group = c.benchmark_group("batch_lookup");

    for count in [1u16, 4, 16] {
        let ids: Vec<UsbId> = (0..count)
            .map(|i| UsbId::new(VENDORS - i * 100, 1 + i % PRODUCTS_PER_VENDOR))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &ids, |b, ids| {
            b.iter(|| resolve_from(Cursor::new(db.as_bytes()), black_box(ids.clone())).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_lookup, benchmark_batch_lookup);
criterion_main!(benches);
