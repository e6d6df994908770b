//! Fixed 32-bit non-cryptographic hash over byte strings and integer tuples.
//!
//! Wraps [`xxhash_rust`]'s XXHash32 (seed 0) and reinterprets the unsigned
//! 32-bit digest as signed two's-complement, matching the upstream game's
//! `HashHelper`. Downstream equality (RNG seeding, reference vectors in
//! tests) depends on that reinterpretation.

use xxhash_rust::xxh32::xxh32;

/// XXHash32 of `data` with seed 0, reinterpreted as `i32`.
pub fn hash_bytes(data: &[u8]) -> i32 {
    xxh32(data, 0) as i32
}

/// Equivalent to `hash_bytes(s.as_bytes())`.
pub fn hash_string(s: &str) -> i32 {
    hash_bytes(s.as_bytes())
}

/// Hashes five integers packed as a 20-byte little-endian buffer.
///
/// Each value is reduced to its unsigned 32-bit representation before
/// packing, so negative inputs round-trip through the same bit pattern a
/// little-endian `uint32` write would produce in the source language.
pub fn hash_ints(a: i32, b: i32, c: i32, d: i32, e: i32) -> i32 {
    let mut buf = [0u8; 20];
    for (i, v) in [a, b, c, d, e].into_iter().enumerate() {
        buf[i * 4..i * 4 + 4].copy_from_slice(&(v as u32).to_le_bytes());
    }
    hash_bytes(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_string_reference_vectors() {
        assert_eq!(hash_string("test"), 1042293711);
        assert_eq!(hash_string("hello"), -83855367);
        assert_eq!(hash_string("world"), 413819571);
        assert_eq!(hash_string("summer_rain_chance"), -309161378);
        assert_eq!(hash_string("location_weather"), -1513201250);
    }

    #[test]
    fn hash_ints_reference_vectors() {
        assert_eq!(hash_ints(1, 2, 3, 4, 5), 100340316);
        assert_eq!(hash_ints(777, 0, 0, 0, 0), 827005275);
        assert_eq!(hash_ints(0, 1, 2, 3, 4), -64079150);
        assert_eq!(hash_ints(100, 200, 300, 400, 500), -405830906);
    }

    #[test]
    fn deterministic() {
        assert_eq!(hash_string("repeatable"), hash_string("repeatable"));
        assert_eq!(hash_ints(1, 2, 3, 4, 5), hash_ints(1, 2, 3, 4, 5));
    }
}
