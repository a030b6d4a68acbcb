//! Session driver: one puzzle after another over a single connection.
//!
//! ```text
//!  peer ──lines──▶ parse_puzzle ──▶ derive ──▶ decide
//!   ▲                                             │
//!   └──────────── "Y" + value  /  "N" ◀───────────┘
//! ```

use crate::engine::derive;
use crate::network::LineReader;
use crate::parser::{parse_puzzle, wait_line};
use crate::responder::{decide, Verdict};
use crate::variables::{QuizError, VariableStore};
use std::io::{Read, Write};

/// Consecutive empty polls before an unterminated prompt is released.
pub const DEFAULT_IDLE_POLLS: u32 = 4;

/// Lines the peer sends between our `Y` and its request for the value.
pub const DEFAULT_PROMPT_LINES: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub idle_polls: u32,
    pub prompt_lines: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_polls: DEFAULT_IDLE_POLLS,
            prompt_lines: DEFAULT_PROMPT_LINES,
        }
    }
}

/// What happened to one puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleOutcome {
    pub store: VariableStore,
    pub verdict: Verdict,
    pub acknowledgement: String,
}

/// Derive everything derivable and decide the reply.
pub fn solve_puzzle(store: &mut VariableStore) -> Result<Verdict, QuizError> {
    let derived = derive(store)?;
    log::debug!("derived {} variable(s): {}", derived.len(), store);
    Ok(decide(store))
}

/// A quiz conversation over one stream.
pub struct Session<S> {
    reader: LineReader<S>,
    config: SessionConfig,
    answered: usize,
}

impl<S: Read + Write> Session<S> {
    pub fn new(stream: S, config: SessionConfig) -> Self {
        Self {
            reader: LineReader::new(stream, config.idle_polls),
            config,
            answered: 0,
        }
    }

    /// Puzzles answered so far on this session.
    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    fn send_line(&mut self, text: &str) -> Result<(), QuizError> {
        log::debug!(">> {}", text);
        let stream = self.reader.get_mut();
        stream.write_all(text.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
        Ok(())
    }

    fn discard_line(&mut self) -> Result<String, QuizError> {
        let line = wait_line(&mut self.reader)?;
        log::debug!("<< {}", line);
        Ok(line)
    }

    /// Read, solve and answer the next puzzle.
    pub fn solve_next(&mut self) -> Result<PuzzleOutcome, QuizError> {
        let mut store = parse_puzzle(&mut self.reader)?;
        log::info!("puzzle: {}", store);

        let verdict = solve_puzzle(&mut store)?;
        log::info!("goal {:?} is {}", store.goal().unwrap_or(""), verdict);

        self.send_line(verdict.reply())?;
        if let Verdict::Feasible(value) = &verdict {
            self.reader.expect_value_prompt(true);
            let prompts = (0..self.config.prompt_lines)
                .try_for_each(|_| self.discard_line().map(drop));
            self.reader.expect_value_prompt(false);
            prompts?;
            self.send_line(&value.to_string())?;
        }
        let acknowledgement = self.discard_line()?;
        log::info!("peer: {}", acknowledgement);

        self.answered += 1;
        Ok(PuzzleOutcome {
            store,
            verdict,
            acknowledgement,
        })
    }

    /// Answer puzzles until an error, or until `limit` have been answered.
    /// Returns the number answered by this call.
    pub fn run(&mut self, limit: Option<usize>) -> Result<usize, QuizError> {
        let mut count = 0;
        while limit.map_or(true, |max| count < max) {
            self.solve_next()?;
            count += 1;
        }
        Ok(count)
    }
}
