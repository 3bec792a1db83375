#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtcodec::Verdict;
use std::time::Duration;

fuzz_target!(|data: &[u8]| {
    // A complete document must also decode outside the detector.
    if nbtcodec::classify(data, Duration::from_millis(20)) == Verdict::Nbt {
        nbtcodec::decode(data, None).unwrap();
    }
});
