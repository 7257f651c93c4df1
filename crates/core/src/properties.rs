//! Number-theoretic properties of a key.
//!
//! These are computed by the front API before the cache is asked to store a
//! record; the cache itself never derives them.

use crate::number::{NumberFlags, NumberKey, NumberRecord};
use crate::trajectory::Trajectory;

/// Whether `n` is even.
pub fn is_even(n: u64) -> bool {
    n % 2 == 0
}

/// Whether `n` is prime.
///
/// Deterministic Miller-Rabin: the first twelve prime bases are sufficient
/// for every 64-bit integer.
pub fn is_prime(n: u64) -> bool {
    const BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for p in BASES {
        if n % p == 0 {
            return n == p;
        }
    }

    let d = (n - 1) >> (n - 1).trailing_zeros();
    let s = (n - 1).trailing_zeros();
    'witness: for a in BASES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Whether `n` equals the sum of its proper divisors.
///
/// Uses the Euclid-Euler form `2^(p-1) * (2^p - 1)` with `2^p - 1` prime.
/// No odd perfect number exists anywhere near the 64-bit range, so odd
/// inputs are rejected outright.
pub fn is_perfect(n: u64) -> bool {
    if n < 2 || !is_even(n) {
        return false;
    }
    let k = n.trailing_zeros();
    let odd_part = n >> k;
    // odd_part must be the Mersenne number 2^(k+1) - 1.
    k < 63 && odd_part == (1u64 << (k + 1)) - 1 && is_prime(odd_part)
}

/// The Syracuse sequence of `key`: halve even terms, map odd terms to
/// `3n + 1`, stop at 1.
pub fn syracuse_sequence(key: NumberKey) -> crate::Result<Trajectory> {
    let mut n = key.get();
    let mut terms = vec![n];
    while n != 1 {
        n = if is_even(n) {
            n / 2
        } else {
            n.checked_mul(3)
                .and_then(|t| t.checked_add(1))
                .ok_or(crate::Error::Overflow(key.get()))?
        };
        terms.push(n);
    }
    Ok(Trajectory::new(terms))
}

/// Compute the boolean flags of `key`.
pub fn flags(key: NumberKey) -> NumberFlags {
    let n = key.get();
    NumberFlags {
        is_even: is_even(n),
        is_prime: is_prime(n),
        is_perfect: is_perfect(n),
    }
}

/// Compute the full record for `key`.
pub fn compute(key: NumberKey) -> crate::Result<NumberRecord> {
    let trajectory = syracuse_sequence(key)?;
    NumberRecord::new(key, flags(key), trajectory)
}
