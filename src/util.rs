//! Utility functions with platform-specific implementations.

use std::borrow::Cow;

use crate::seed::Seed;

/// Get current time as seconds since Unix epoch.
///
/// On native platforms, uses `SystemTime::now()`.
/// On WASM, uses `js_sys::Date::now()`.
#[cfg(not(target_arch = "wasm32"))]
pub fn time_now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn time_now_secs() -> u64 {
    // js_sys::Date::now() returns milliseconds as f64
    (js_sys::Date::now() / 1000.0) as u64
}

/// A seed from the clock, for hosts that want a fresh roll.
///
/// The caller should show the seed so the result can be reproduced.
#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed() -> Seed {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345);
    Seed((nanos ^ (nanos >> 32)) as u32)
}

#[cfg(target_arch = "wasm32")]
pub fn time_seed() -> Seed {
    let millis = js_sys::Date::now() as u64;
    Seed((millis ^ (millis >> 32)) as u32)
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. Honors a UTF-8 or UTF-16 byte order mark
/// 2. Otherwise tries UTF-8
/// 3. Falls back to Windows-1252 (common for text saved by old editors)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, _)) = encoding_rs::Encoding::for_bom(bytes) {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    tracing::debug!("input is not UTF-8, decoding as Windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}
