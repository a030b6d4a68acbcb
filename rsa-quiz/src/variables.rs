use num_bigint::BigUint;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The fixed vocabulary of quiz variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    P,
    Q,
    N,
    D,
    E,
    Totient,
    Plaintext,
    Ciphertext,
}

impl Variable {
    pub const ALL: [Variable; 8] = [
        Variable::P,
        Variable::Q,
        Variable::N,
        Variable::D,
        Variable::E,
        Variable::Totient,
        Variable::Plaintext,
        Variable::Ciphertext,
    ];

    /// Name as it appears on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Variable::P => "p",
            Variable::Q => "q",
            Variable::N => "n",
            Variable::D => "d",
            Variable::E => "e",
            Variable::Totient => "totient(n)",
            Variable::Plaintext => "plaintext",
            Variable::Ciphertext => "ciphertext",
        }
    }
}

impl std::str::FromStr for Variable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("Unknown variable: {}", s))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Known values for one puzzle, plus the name of the variable to produce.
///
/// Values are only ever added: [`VariableStore::set`] refuses to overwrite.
/// The goal is the one entry that a later write replaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    values: BTreeMap<Variable, BigUint>,
    // Names outside the vocabulary; resolvable as a goal, ignored by derivation.
    extras: BTreeMap<String, BigUint>,
    goal: Option<String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: Variable) -> Option<&BigUint> {
        self.values.get(&var)
    }

    pub fn is_known(&self, var: Variable) -> bool {
        self.values.contains_key(&var)
    }

    /// Record `value` for `var` unless it is already known.
    /// Returns whether the store changed.
    pub fn set(&mut self, var: Variable, value: BigUint) -> bool {
        if self.values.contains_key(&var) {
            return false;
        }
        self.values.insert(var, value);
        true
    }

    /// Record a value by its wire name. Names outside the vocabulary go to
    /// the side table.
    pub fn set_named(&mut self, name: &str, value: BigUint) -> bool {
        match name.parse::<Variable>() {
            Ok(var) => self.set(var, value),
            Err(_) => {
                if self.extras.contains_key(name) {
                    return false;
                }
                log::warn!("storing unrecognized variable {:?}", name);
                self.extras.insert(name.to_string(), value);
                true
            }
        }
    }

    /// Look a value up by wire name, including unrecognized names.
    pub fn get_named(&self, name: &str) -> Option<&BigUint> {
        match name.parse::<Variable>() {
            Ok(var) => self.get(var),
            Err(_) => self.extras.get(name),
        }
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = Some(goal.into());
    }

    /// Number of known values (vocabulary and side table).
    pub fn len(&self) -> usize {
        self.values.len() + self.extras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known vocabulary variables in canonical order.
    pub fn known(&self) -> impl Iterator<Item = (Variable, &BigUint)> {
        self.values.iter().map(|(v, n)| (*v, n))
    }
}

impl fmt::Display for VariableStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        let named = self
            .values
            .iter()
            .map(|(v, n)| (v.name(), n))
            .chain(self.extras.iter().map(|(k, n)| (k.as_str(), n)));
        for (name, value) in named {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {}", name, value)?;
        }
        if let Some(goal) = &self.goal {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "goal: {:?}", goal)?;
        }
        write!(f, "}}")
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Malformed puzzle line: {0}")]
    Parse(String),
    #[error("No modular inverse of {value} mod {modulus}")]
    NoInverse { value: BigUint, modulus: BigUint },
    #[error("Cannot apply {rule}: {reason}")]
    Degenerate { rule: &'static str, reason: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout")]
    Timeout,
    #[error("Connection closed by peer")]
    Closed,
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            QuizError::Timeout
        } else {
            QuizError::Network(err.to_string())
        }
    }
}
