//! FNV-1a hashing used as the engine's only source of randomness
//!
//! Every "random" choice in the engine is a pure function of a key string.
//! There is no seed, no thread-local state and no clock access.

use std::fmt::Display;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over raw bytes
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash any displayable input into [0, 1].
///
/// Non-string inputs are hashed through their `Display` form, so `42` and
/// `"42"` produce the same value.
pub fn fnv1a_hash<T: Display + ?Sized>(input: &T) -> f64 {
    let key = input.to_string();
    f64::from(fnv1a_32(key.as_bytes())) / f64::from(u32::MAX)
}
