//! One-step draws from the game's .NET-compatible linear congruential map.
//!
//! Every caller supplies a freshly-derived integer seed ([`random_seed`])
//! and reads exactly one value from it; there is no sequential generator
//! state to carry between draws.

use crate::hash::hash_ints;

const MODULUS: i64 = 2_147_483_647;
const MULTIPLIER: u64 = 1_121_899_819;
const INCREMENT: u64 = 1_559_595_546;

/// `y = (1121899819 * |seed| + 1559595546) mod (2^31 - 1)`.
///
/// `seed` is widened to `i64` before taking its absolute value so `i32::MIN`
/// can't overflow, then the multiply runs in `u64` to stay clear of the
/// `i64::MAX` ceiling.
pub fn first_rand(seed: i32) -> u32 {
    let abs_seed = (seed as i64).unsigned_abs();
    let y = (MULTIPLIER * abs_seed + INCREMENT) % (MODULUS as u64);
    y as u32
}

/// `first_rand(seed) / (2^31 - 1)`, a value in `[0, 1)`.
pub fn next_double(seed: i32) -> f64 {
    first_rand(seed) as f64 / MODULUS as f64
}

/// `floor(first_rand(seed) * max_value / (2^31 - 1))`. Zero when `max_value <= 0`.
pub fn next_int(seed: i32, max_value: i32) -> i32 {
    if max_value <= 0 {
        return 0;
    }
    let fr = first_rand(seed) as i64;
    ((fr * max_value as i64) / MODULUS) as i32
}

/// Sign-preserving remainder modulo `2147483647`, matching the source
/// language's truncated-division semantics (a negative input stays
/// non-positive, unlike a Euclidean remainder).
fn reduce(x: i32) -> i64 {
    (x as i64) % MODULUS
}

/// Mixes five already-derived integers into one seed for [`first_rand`].
///
/// Legacy mode sums the (individually reduced) inputs; the default mode
/// hashes them with [`hash_ints`]. Preserve this exact ordering -- reduce
/// each input first, *then* combine -- the upstream implementation is
/// inconsistent about which comes first and this repo follows it bit-for-bit
/// rather than guessing the intent.
pub fn random_seed(a: i32, b: i32, c: i32, d: i32, e: i32, legacy: bool) -> i32 {
    let (ra, rb, rc, rd, re) = (reduce(a), reduce(b), reduce(c), reduce(d), reduce(e));
    if legacy {
        ((ra + rb + rc + rd + re) % MODULUS) as i32
    } else {
        hash_ints(ra as i32, rb as i32, rc as i32, rd as i32, re as i32)
    }
}
