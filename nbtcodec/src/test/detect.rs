use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use flate2::write::GzEncoder;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::builder::{nested_compounds, sample_document, Builder};
use crate::{classify, detect, TagType, Verdict};

const BUDGET: Duration = Duration::from_millis(20);

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

#[test]
fn complete_document_is_nbt() {
    assert_eq!(classify(&sample_document(), BUDGET), Verdict::Nbt);
    assert!(detect(&sample_document(), BUDGET));
}

#[test]
fn gzipped_document_is_nbt() {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&sample_document()).unwrap();
    let zipped = encoder.finish().unwrap();

    assert_eq!(classify(&zipped, BUDGET), Verdict::Nbt);
}

#[test]
fn large_nested_document_is_plausibly_nbt() {
    // Either it finishes within the budget, or it runs out of time without
    // seeing anything wrong. Both count.
    let payload = nested_compounds(10_000);
    let verdict = classify(&payload, BUDGET);

    assert!(
        matches!(verdict, Verdict::Nbt | Verdict::LikelyNbt),
        "{:?}",
        verdict
    );
    assert!(detect(&payload, BUDGET));
}

#[test]
fn timeout_is_likely_nbt() {
    let payload = nested_compounds(10_000);
    assert_eq!(classify(&payload, Duration::ZERO), Verdict::LikelyNbt);
}

#[test]
fn gzipped_long_array_stays_within_budget() {
    // Compresses to a few tens of kilobytes, but inflates to 32 MiB of array
    // data under a length prefix promising far more.
    let mut raw = Builder::new()
        .start_compound("")
        .tag(TagType::ByteArray)
        .name("zeros")
        .int_payload(i32::MAX)
        .build();
    raw.resize(raw.len() + (32 << 20), 0);

    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw).unwrap();
    let zipped = encoder.finish().unwrap();
    drop(raw);

    let start = Instant::now();
    let verdict = classify(&zipped, BUDGET);
    let took = start.elapsed();

    assert!(verdict.is_nbt(), "{:?}", verdict);
    assert!(took < BUDGET * 10, "took {:?}", took);
}

#[test]
fn random_bytes_are_not_nbt() {
    for seed in 0..32 {
        let mut bytes = random_bytes(seed, 10_000);
        // A leading compound id followed by a long enough name length is
        // indistinguishable from a cut off document.
        if bytes[0] == TagType::Compound as u8 {
            bytes[0] = 0xff;
        }

        let start = Instant::now();
        assert!(!detect(&bytes, BUDGET), "seed {}", seed);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}

#[test]
fn random_garbage_after_a_header_is_not_nbt() {
    // Random type ids inside the root are out of range most of the time, so a
    // structural error turns up long before the data runs out.
    let mut rng = StdRng::seed_from_u64(7);
    let mut hits = 0;
    for _ in 0..100 {
        let mut bytes = Builder::new().start_compound("").build();
        bytes.extend((0..10_000).map(|_| rng.gen::<u8>()));
        if !detect(&bytes, BUDGET) {
            hits += 1;
        }
    }
    assert!(hits > 80, "only {} of 100 rejected", hits);
}

#[test]
fn empty_input_is_not_nbt() {
    assert_eq!(classify(&[], BUDGET), Verdict::NotNbt);
}

#[test]
fn text_is_not_nbt() {
    assert!(!detect(b"{\"json\": true}", BUDGET));
    assert!(!detect(b"#!/bin/sh\necho hi\n", BUDGET));
}

#[test]
fn truncated_document_is_a_consistent_prefix() {
    let payload = sample_document();
    let prefix = &payload[..payload.len() / 2];

    assert_eq!(
        classify(prefix, BUDGET),
        Verdict::TruncatedPrefix {
            consumed: prefix.len() as u64
        }
    );
    assert!(detect(prefix, BUDGET));
}

#[test]
fn any_consistent_prefix_is_truncated_whatever_its_size() {
    assert_eq!(classify(&[10], BUDGET), Verdict::TruncatedPrefix { consumed: 1 });
    assert_eq!(classify(&[10, 0], BUDGET), Verdict::TruncatedPrefix { consumed: 2 });

    // A type id other than compound is wrong however short the input is.
    assert_eq!(classify(&[1], BUDGET), Verdict::NotNbt);
}

#[test]
fn structural_error_after_valid_prefix_is_not_nbt() {
    let payload = Builder::new()
        .start_compound("")
        .byte("fine", 1)
        .start_list("bad", TagType::Int, -1)
        .end_compound()
        .build();

    assert_eq!(classify(&payload, BUDGET), Verdict::NotNbt);
}

#[test]
fn bad_gzip_is_not_nbt() {
    // Magic number, then nonsense where the rest of the gzip header should be.
    let bytes = [0x1f, 0x8b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    assert!(!detect(&bytes, BUDGET));
}

#[test]
fn verdicts_that_count_as_nbt() {
    assert!(Verdict::Nbt.is_nbt());
    assert!(Verdict::LikelyNbt.is_nbt());
    assert!(Verdict::TruncatedPrefix { consumed: 3 }.is_nbt());
    assert!(!Verdict::NotNbt.is_nbt());
}

/// Counts records above `trace`. Installed for the whole test binary, which
/// is fine since nothing else in the crate sets a logger.
struct LoudRecords(AtomicUsize);

impl log::Log for LoudRecords {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if record.level() < log::Level::Trace {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn flush(&self) {}
}

static LOUD: LoudRecords = LoudRecords(AtomicUsize::new(0));

#[test]
fn classification_only_logs_at_trace() {
    let _ = log::set_logger(&LOUD);
    log::set_max_level(log::LevelFilter::Trace);

    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&sample_document()).unwrap();
    let zipped = encoder.finish().unwrap();

    classify(&zipped, BUDGET);
    classify(&sample_document(), BUDGET);
    classify(&random_bytes(7, 100), BUDGET);

    assert_eq!(LOUD.0.load(Ordering::SeqCst), 0);
}
