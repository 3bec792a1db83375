#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtcodec::{decode, encode, Compression, RootCompound};

fuzz_target!(|root: RootCompound| {
    // Arbitrary strings can be too long to write, which is a clean error.
    if let Ok(bs) = encode(&root, Compression::None) {
        let (decoded, compression) = decode(&bs, None).unwrap();
        assert_eq!(compression, Compression::None);
        assert_eq!(decoded.name, root.name);
        assert_eq!(encode(&decoded, Compression::None).unwrap(), bs);
    }
});
