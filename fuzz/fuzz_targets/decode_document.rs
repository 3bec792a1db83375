#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtcodec::de::{from_reader, DecodeOpts};
use nbtcodec::ser::to_bytes;
use std::io::Cursor;
use std::time::Duration;

fuzz_target!(|data: &[u8]| {
    let opts = DecodeOpts::new().deadline(Duration::from_millis(100));
    let mut cursor = Cursor::new(data);
    if let Ok(root) = from_reader(&mut cursor, opts) {
        let consumed = cursor.position() as usize;
        let bs = to_bytes(&root).unwrap();

        // A repeated key drops a whole entry, so the output only comes out
        // shorter than the document when the input repeated a key.
        if bs.len() == consumed {
            assert_eq!(bs, &data[..consumed]);
        } else {
            assert!(bs.len() < consumed);
        }
    }
});
