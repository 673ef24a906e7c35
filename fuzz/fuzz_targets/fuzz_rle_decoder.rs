#![no_main]

use libfuzzer_sys::fuzz_target;
use nestwrite::encoding::rle::{decode_levels_v1, decode_levels_v2, RleDecoder};

fuzz_target!(|data: &[u8]| {
    // First byte picks the bit width and level count, the rest is the stream.
    // Decoding must either succeed or fail gracefully, never panic.
    let Some((&control, stream)) = data.split_first() else {
        return;
    };
    let bit_width = control % 17;
    let count = usize::from(control) * 4;

    let _ = RleDecoder::new(bit_width, stream).decode(count);

    let max_level = (1u16 << (control % 8)) - 1;
    let _ = decode_levels_v2(stream, max_level, count);
    if let Ok((levels, consumed)) = decode_levels_v1(stream, max_level, count) {
        assert_eq!(levels.len(), count);
        assert!(consumed <= stream.len());
    }
});
