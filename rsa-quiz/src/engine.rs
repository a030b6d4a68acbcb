//! Fixed-point derivation over the RSA identities.
//!
//! The rule table is scanned top to bottom; the first rule whose inputs are
//! known and whose output is unknown fires, then the scan restarts from the
//! top. Every firing adds one variable, so at most [`Variable::ALL`]`.len()`
//! firings happen before nothing applies.

use crate::numtheory::mod_inverse;
use crate::variables::{QuizError, Variable, VariableStore};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

type RuleFn = fn(&[&BigUint]) -> Result<BigUint, QuizError>;

/// One RSA identity: `output <- f(inputs)`. `f` receives the input values
/// in the order of `inputs`.
pub struct Rule {
    pub name: &'static str,
    pub output: Variable,
    pub inputs: &'static [Variable],
    apply: RuleFn,
}

impl Rule {
    /// Input values, if every input is known and the output is not.
    pub fn ready<'s>(&self, store: &'s VariableStore) -> Option<Vec<&'s BigUint>> {
        if store.is_known(self.output) {
            return None;
        }
        self.inputs.iter().map(|v| store.get(*v)).collect()
    }

    pub fn applicable(&self, store: &VariableStore) -> bool {
        self.ready(store).is_some()
    }

    pub fn apply(&self, args: &[&BigUint]) -> Result<BigUint, QuizError> {
        (self.apply)(args)
    }
}

/// Rules in precedence order. The order decides which chain runs when
/// several rules are eligible at once.
pub static RULES: [Rule; 7] = [
    Rule {
        name: "n = p * q",
        output: Variable::N,
        inputs: &[Variable::P, Variable::Q],
        apply: |v| Ok(v[0] * v[1]),
    },
    Rule {
        name: "q = n / p",
        output: Variable::Q,
        inputs: &[Variable::N, Variable::P],
        apply: |v| divide("q = n / p", v[0], v[1]),
    },
    Rule {
        name: "p = n / q",
        output: Variable::P,
        inputs: &[Variable::N, Variable::Q],
        apply: |v| divide("p = n / q", v[0], v[1]),
    },
    Rule {
        name: "d = e^-1 mod totient(n)",
        output: Variable::D,
        inputs: &[Variable::E, Variable::Totient],
        apply: |v| mod_inverse(v[0], v[1]),
    },
    Rule {
        name: "totient(n) = (p - 1) * (q - 1)",
        output: Variable::Totient,
        inputs: &[Variable::P, Variable::Q],
        apply: |v| {
            let (p, q) = (v[0], v[1]);
            if p.is_zero() || q.is_zero() {
                return Err(QuizError::Degenerate {
                    rule: "totient(n) = (p - 1) * (q - 1)",
                    reason: "p and q must be positive".into(),
                });
            }
            Ok((p - 1u32) * (q - 1u32))
        },
    },
    Rule {
        name: "plaintext = ciphertext^d mod n",
        output: Variable::Plaintext,
        inputs: &[Variable::Ciphertext, Variable::D, Variable::N],
        apply: |v| power_mod("plaintext = ciphertext^d mod n", v[0], v[1], v[2]),
    },
    Rule {
        name: "ciphertext = plaintext^e mod n",
        output: Variable::Ciphertext,
        inputs: &[Variable::Plaintext, Variable::E, Variable::N],
        apply: |v| power_mod("ciphertext = plaintext^e mod n", v[0], v[1], v[2]),
    },
];

fn divide(rule: &'static str, n: &BigUint, divisor: &BigUint) -> Result<BigUint, QuizError> {
    if divisor.is_zero() {
        return Err(QuizError::Degenerate {
            rule,
            reason: "division by zero".into(),
        });
    }
    let (quotient, remainder) = n.div_rem(divisor);
    if !remainder.is_zero() {
        log::warn!("{}: {} is not a multiple of {}", rule, n, divisor);
    }
    Ok(quotient)
}

fn power_mod(
    rule: &'static str,
    base: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
) -> Result<BigUint, QuizError> {
    if modulus.is_zero() {
        return Err(QuizError::Degenerate {
            rule,
            reason: "modulus n is zero".into(),
        });
    }
    if modulus.is_one() {
        return Ok(BigUint::zero());
    }
    Ok(base.modpow(exponent, modulus))
}

/// Enrich `store` until no rule applies.
///
/// Returns the derived variables in firing order. An error aborts the
/// derivation; values derived before it stay in the store.
pub fn derive(store: &mut VariableStore) -> Result<Vec<Variable>, QuizError> {
    let mut derived = Vec::new();
    // Each firing adds a variable, so this bound is never the reason to stop.
    for _ in 0..=Variable::ALL.len() {
        let Some((rule, args)) = RULES.iter().find_map(|r| r.ready(store).map(|args| (r, args)))
        else {
            return Ok(derived);
        };
        let value = rule.apply(&args)?;
        log::debug!("derive: {} -> {}", rule.name, value);
        store.set(rule.output, value);
        derived.push(rule.output);
    }
    Ok(derived)
}
