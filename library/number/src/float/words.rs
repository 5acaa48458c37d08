//! Marshalling of a double through two 32-bit words.
//!
//! Targets whose heap words are only 4-byte aligned cannot read or write an
//! `f64` in place, so the value is stored as two words instead. The words are
//! in native memory order: `split(d)[0]` holds the bytes at the lower address.

/// Splits `d` into two words in native memory order
#[inline]
pub fn split(d: f64) -> [u32; 2] {
    let [a0, a1, a2, a3, b0, b1, b2, b3] = d.to_ne_bytes();
    [
        u32::from_ne_bytes([a0, a1, a2, a3]),
        u32::from_ne_bytes([b0, b1, b2, b3]),
    ]
}

/// Reassembles a double from two words produced by [`split`]
#[inline]
pub fn join(words: [u32; 2]) -> f64 {
    let [a0, a1, a2, a3] = words[0].to_ne_bytes();
    let [b0, b1, b2, b3] = words[1].to_ne_bytes();
    f64::from_ne_bytes([a0, a1, a2, a3, b0, b1, b2, b3])
}
