#![no_main]

use go125_sema::{StructTagDecoder, TagDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    let Ok(params) = StructTagDecoder.decode(&raw) else {
        return;
    };

    // every decoded pair consumed at least `k:""`
    assert!(params.len() * 4 <= raw.len());
    for param in &params {
        assert!(!param.name.is_empty());
        assert!(!param.name.contains([' ', ':', '"']));
        assert!(!param.value.contains(','));
    }
});
