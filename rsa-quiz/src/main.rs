//! Entry point for `rsa-quiz`.
//!
//! Parses CLI arguments, connects to the quiz server and answers puzzles,
//! reconnecting after failures unless `--once` is given.

use anyhow::{Context, Result};
use clap::Parser;
use rsa_quiz::session::{DEFAULT_IDLE_POLLS, DEFAULT_PROMPT_LINES};
use rsa_quiz::{connect, Session, SessionConfig};
use std::thread;
use std::time::Duration;

/// Answer RSA pop-quiz puzzles from a remote server.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Quiz server host.
    #[arg(long, default_value = "2019shell1.picoctf.com")]
    host: String,

    /// Quiz server port.
    #[arg(short, long, default_value_t = 30962)]
    port: u16,

    /// Socket read timeout per poll, in milliseconds.
    #[arg(long, default_value_t = 250, value_parser = clap::value_parser!(u64).range(1..))]
    poll_ms: u64,

    /// Empty polls before an unterminated line is taken as a prompt.
    #[arg(long, default_value_t = DEFAULT_IDLE_POLLS)]
    idle_polls: u32,

    /// Lines to skip after answering `Y` before sending the value.
    #[arg(long, default_value_t = DEFAULT_PROMPT_LINES)]
    prompt_lines: usize,

    /// Stop after this many puzzles have been answered.
    #[arg(long)]
    max_puzzles: Option<usize>,

    /// Delay before reconnecting after a failed session, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    reconnect_delay_ms: u64,

    /// Exit on the first failure instead of reconnecting.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; `debug` shows the full transcript.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SessionConfig {
        idle_polls: cli.idle_polls,
        prompt_lines: cli.prompt_lines,
    };
    let poll = Duration::from_millis(cli.poll_ms);
    let mut answered = 0usize;

    loop {
        let remaining = cli.max_puzzles.map(|max| max.saturating_sub(answered));
        if remaining == Some(0) {
            log::info!("answered {} puzzle(s); done", answered);
            return Ok(());
        }

        let result = connect(&cli.host, cli.port, poll)
            .with_context(|| format!("connecting to {}:{}", cli.host, cli.port))
            .and_then(|stream| {
                let mut session = Session::new(stream, config.clone());
                let outcome = session.run(remaining);
                answered += session.answered();
                outcome.context("quiz session failed")
            });

        match result {
            Ok(_) => {}
            Err(e) if cli.once => return Err(e),
            Err(e) => {
                log::warn!("{:#}; reconnecting", e);
                thread::sleep(Duration::from_millis(cli.reconnect_delay_ms));
            }
        }
    }
}
