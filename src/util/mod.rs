//! Utility module
//!
//! This module provides common helpers used throughout the library.

use std::time::Duration;

/// Formats bytes as uppercase hex pairs separated by single spaces
///
/// `[0xFF, 0x1E, 0x05]` becomes `"FF 1E 05"`.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut string = String::with_capacity(bytes.len() * 3);

    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            string.push(' ');
        }
        string.push_str(&hex::encode_upper([*byte]));
    }

    string
}

/// Whole seconds elapsed in a duration, clamped to `u32`
pub fn whole_secs(duration: Duration) -> u32 {
    u32::try_from(duration.as_secs()).unwrap_or(u32::MAX)
}
