//! Extended Euclid and modular inverses over arbitrary-precision integers.

use crate::variables::QuizError;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Returns `(g, x, y)` with `g = gcd(a, b)` and `a*x + b*y = g`.
///
/// Defined for non-negative inputs; `extended_gcd(0, b)` is `(b, 0, 1)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if a.is_zero() {
        return (b.clone(), BigInt::zero(), BigInt::one());
    }

    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);
        let next_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Returns `x` in `[0, m)` with `a*x ≡ 1 (mod m)`.
///
/// Fails with [`QuizError::NoInverse`] when `gcd(a, m) != 1` or `m` is zero.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, QuizError> {
    let no_inverse = || QuizError::NoInverse {
        value: a.clone(),
        modulus: m.clone(),
    };
    if m.is_zero() {
        return Err(no_inverse());
    }

    let modulus = BigInt::from(m.clone());
    let (g, x, _) = extended_gcd(&BigInt::from(a.clone()), &modulus);
    if !g.is_one() {
        return Err(no_inverse());
    }

    // mod_floor keeps the result non-negative for a positive modulus.
    x.mod_floor(&modulus).to_biguint().ok_or_else(no_inverse)
}
