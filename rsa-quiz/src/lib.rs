//! `rsa-quiz` — answers RSA parameter quizzes served over a line protocol.
//!
//! Each module has a single responsibility:
//! - [`numtheory`]  — extended Euclid and modular inverse
//! - [`variables`]  — variable vocabulary, per-puzzle store, error type
//! - [`parser`]     — transcript state machine producing a store
//! - [`engine`]     — fixed-point derivation over the RSA identities
//! - [`responder`]  — feasibility verdict for the goal
//! - [`network`]    — TCP setup and polling line reader
//! - [`session`]    — per-puzzle pipeline and reply protocol

pub mod engine;
pub mod network;
pub mod numtheory;
pub mod parser;
pub mod responder;
pub mod session;
pub mod variables;

pub use engine::derive;
pub use network::{connect, LineReader};
pub use numtheory::{extended_gcd, mod_inverse};
pub use parser::{parse_puzzle, LineSource, PuzzleParser};
pub use responder::{decide, Verdict};
pub use session::{solve_puzzle, PuzzleOutcome, Session, SessionConfig};
pub use variables::{QuizError, Variable, VariableStore};
