//! Puzzle transcript parser.
//!
//! A transcript is split into regions by marker lines:
//!
//! ```text
//!  <preamble ...>
//!  #### NEW PROBLEM ####             -> ReadingVariables
//!  p : 61
//!  q : 53
//!  ##### PRODUCE THE FOLLOWING ####  -> ReadingGoal
//!  n
//!  IS THIS POSSIBLE and FEASIBLE?    -> done
//! ```
//!
//! Markers are matched by substring, so region lengths never matter.

use crate::variables::{QuizError, VariableStore};
use num_bigint::BigUint;

pub const NEW_PROBLEM_MARKER: &str = "#### NEW PROBLEM ####";
pub const GOAL_MARKER: &str = "##### PRODUCE THE FOLLOWING ####";
pub const QUESTION_MARKER: &str = "IS THIS POSSIBLE and FEASIBLE?";

/// Supplies transcript lines one at a time.
pub trait LineSource {
    /// `Ok(Some(line))` for a complete line (terminator stripped),
    /// `Ok(None)` when nothing is available yet. Callers poll again on `None`.
    fn next_line(&mut self) -> Result<Option<String>, QuizError>;
}

/// Poll `source` until it produces a line.
pub fn wait_line<L: LineSource + ?Sized>(source: &mut L) -> Result<String, QuizError> {
    loop {
        if let Some(line) = source.next_line()? {
            return Ok(line);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    Preamble,
    ReadingVariables,
    ReadingGoal,
}

/// Incremental parser for one puzzle.
#[derive(Debug, Default)]
pub struct PuzzleParser {
    state: ParserState,
    store: VariableStore,
}

impl PuzzleParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Consume one line. Returns `Ok(true)` once the question line is seen;
    /// the question line itself is not parsed.
    pub fn feed(&mut self, line: &str) -> Result<bool, QuizError> {
        if line.contains(NEW_PROBLEM_MARKER) {
            log::debug!("parser: {:?} -> ReadingVariables", self.state);
            self.state = ParserState::ReadingVariables;
            return Ok(false);
        }
        if line.contains(GOAL_MARKER) {
            log::debug!("parser: {:?} -> ReadingGoal", self.state);
            self.state = ParserState::ReadingGoal;
            return Ok(false);
        }
        if line.contains(QUESTION_MARKER) {
            return Ok(true);
        }

        match self.state {
            ParserState::Preamble => {}
            ParserState::ReadingVariables => {
                if line.trim().is_empty() {
                    return Ok(false);
                }
                let (name, value) = parse_assignment(line)?;
                log::debug!("parser: {} = {}", name, value);
                self.store.set_named(name, value);
            }
            ParserState::ReadingGoal => {
                let goal = line.trim();
                if !goal.is_empty() {
                    log::debug!("parser: goal = {}", goal);
                    self.store.set_goal(goal);
                }
            }
        }
        Ok(false)
    }

    pub fn into_store(self) -> VariableStore {
        self.store
    }
}

/// Split `name : value` at the first colon.
fn parse_assignment(line: &str) -> Result<(&str, BigUint), QuizError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| QuizError::Parse(format!("missing ':' in {:?}", line)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(QuizError::Parse(format!("missing variable name in {:?}", line)));
    }
    let value = value.trim();
    let value = value.strip_prefix('+').unwrap_or(value);
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuizError::Parse(format!(
            "value of {} is not a decimal integer: {:?}",
            name, value
        )));
    }
    let value = value
        .parse::<BigUint>()
        .map_err(|e| QuizError::Parse(format!("value of {}: {}", name, e)))?;
    Ok((name, value))
}

/// Read lines from `source` until the question line and return the
/// populated store for that puzzle.
pub fn parse_puzzle<L: LineSource + ?Sized>(source: &mut L) -> Result<VariableStore, QuizError> {
    let mut parser = PuzzleParser::new();
    loop {
        let line = wait_line(source)?;
        log::debug!("<< {}", line);
        if parser.feed(&line)? {
            return Ok(parser.into_store());
        }
    }
}
