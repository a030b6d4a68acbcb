//! Randomized checks of the RSA identities the engine relies on.

use num_bigint::BigUint;
use num_integer::Integer;
use rand::seq::IndexedRandom;
use rand::Rng;
use rsa_quiz::{derive, mod_inverse, QuizError, Variable, VariableStore};

const PRIMES: &[u64] = &[
    11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101,
    103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 7919, 104_729,
];

const EXPONENTS: &[u64] = &[3, 5, 7, 17, 257, 65_537];

fn big(v: u64) -> BigUint {
    BigUint::from(v)
}

fn store(values: &[(Variable, &BigUint)]) -> VariableStore {
    let mut store = VariableStore::new();
    for (var, value) in values {
        store.set(*var, (*value).clone());
    }
    store
}

/// Two distinct primes and an exponent coprime to their totient.
fn random_key(rng: &mut impl Rng) -> (BigUint, BigUint, BigUint) {
    loop {
        let p = *PRIMES.choose(rng).unwrap();
        let q = *PRIMES.choose(rng).unwrap();
        let e = *EXPONENTS.choose(rng).unwrap();
        if p == q {
            continue;
        }
        let totient = (p - 1) * (q - 1);
        if e < totient && e.gcd(&totient) == 1 {
            return (big(p), big(q), big(e));
        }
    }
}

#[test]
fn fuzz_factor_round_trip() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let (p, q, _) = random_key(&mut rng);

        let mut s = store(&[(Variable::P, &p), (Variable::Q, &q)]);
        derive(&mut s).unwrap();
        let n = s.get(Variable::N).unwrap().clone();
        assert_eq!(n, &p * &q);

        let mut from_p = store(&[(Variable::N, &n), (Variable::P, &p)]);
        derive(&mut from_p).unwrap();
        assert_eq!(from_p.get(Variable::Q), Some(&q));

        let mut from_q = store(&[(Variable::N, &n), (Variable::Q, &q)]);
        derive(&mut from_q).unwrap();
        assert_eq!(from_q.get(Variable::P), Some(&p));
    }
}

#[test]
fn fuzz_inverse_property() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let (p, q, e) = random_key(&mut rng);
        let totient = (&p - 1u32) * (&q - 1u32);
        let d = mod_inverse(&e, &totient).unwrap();
        assert!(d < totient);
        assert_eq!((&e * &d) % &totient, big(1), "e={} totient={}", e, totient);
    }
}

#[test]
fn fuzz_shared_factor_has_no_inverse() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let k = rng.random_range(2..50u64);
        let a = k * rng.random_range(1..50u64);
        let m = k * rng.random_range(1..50u64);
        assert!(
            matches!(mod_inverse(&big(a), &big(m)), Err(QuizError::NoInverse { .. })),
            "{} mod {} shares factor {}",
            a,
            m,
            k
        );
    }
}

#[test]
fn textbook_inverse_example() {
    assert!(matches!(
        mod_inverse(&big(4), &big(10)),
        Err(QuizError::NoInverse { .. })
    ));
    assert_eq!(mod_inverse(&big(17), &big(3120)).unwrap(), big(2753));
}

#[test]
fn textbook_encrypt_then_decrypt() {
    let (p, q, e, m) = (big(61), big(53), big(17), big(65));

    let mut enc = store(&[
        (Variable::P, &p),
        (Variable::Q, &q),
        (Variable::E, &e),
        (Variable::Plaintext, &m),
    ]);
    derive(&mut enc).unwrap();
    let c = enc.get(Variable::Ciphertext).unwrap().clone();
    assert_eq!(c, big(2790));

    let mut dec = store(&[
        (Variable::P, &p),
        (Variable::Q, &q),
        (Variable::E, &e),
        (Variable::Ciphertext, &c),
    ]);
    derive(&mut dec).unwrap();
    assert_eq!(dec.get(Variable::Plaintext), Some(&m));
}

#[test]
fn fuzz_encrypt_then_decrypt() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let (p, q, e) = random_key(&mut rng);
        let n = &p * &q;
        // Messages coprime to n avoid the degenerate cases.
        let m = loop {
            let m = big(rng.random_range(2..1_000_000u64)) % &n;
            if m > big(1) && m.gcd(&n) == big(1) {
                break m;
            }
        };

        let mut enc = store(&[
            (Variable::N, &n),
            (Variable::E, &e),
            (Variable::Plaintext, &m),
        ]);
        derive(&mut enc).unwrap();
        let c = enc.get(Variable::Ciphertext).unwrap().clone();

        let totient = (&p - 1u32) * (&q - 1u32);
        let mut dec = store(&[
            (Variable::N, &n),
            (Variable::E, &e),
            (Variable::Totient, &totient),
            (Variable::Ciphertext, &c),
        ]);
        derive(&mut dec).unwrap();
        assert_eq!(dec.get(Variable::Plaintext), Some(&m), "p={} q={} e={}", p, q, e);
    }
}

#[test]
fn fuzz_derive_is_idempotent() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let (p, q, e) = random_key(&mut rng);
        let n = &p * &q;
        let m = big(42) % &n;
        let candidates = [
            (Variable::P, p.clone()),
            (Variable::Q, q.clone()),
            (Variable::N, n),
            (Variable::E, e),
            (Variable::Plaintext, m),
        ];

        // Random subset of consistent facts.
        let mut s = VariableStore::new();
        for (var, value) in candidates {
            if rng.random_bool(0.5) {
                s.set(var, value);
            }
        }

        derive(&mut s).unwrap();
        let fixed = s.clone();
        assert!(derive(&mut s).unwrap().is_empty());
        assert_eq!(s, fixed);
        assert!(s.known().count() <= Variable::ALL.len());
    }
}
