//! Fuzz target for detection response parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the response parser,
//! checking for panics, crashes, or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run detection_response_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use plastiscan::api::response::from_json_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    // Try to parse the data. We don't care about errors—
    // we only care about panics, crashes, or hangs.
    let _ = from_json_slice(data);
});
