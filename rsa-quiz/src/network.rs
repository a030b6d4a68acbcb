//! Network backend: TCP connection setup and a polling line reader.

use crate::parser::{LineSource, QUESTION_MARKER};
use crate::variables::QuizError;
use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Timeout for establishing the TCP connection, per resolved address.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bytes requested from the stream per poll.
const READ_CHUNK: usize = 1024;

/// Returns true if the error only means "nothing to read yet".
fn is_idle_io_error(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
        || e.raw_os_error() == Some(35) // EAGAIN on macOS
}

/// Connect to the quiz server. Reads on the returned stream time out after
/// `poll`, which is what lets [`LineReader`] report "no data yet".
pub fn connect(host: &str, port: u16, poll: Duration) -> Result<TcpStream, QuizError> {
    if poll.is_zero() {
        return Err(QuizError::Network("poll interval must be non-zero".into()));
    }
    let addrs = format!("{}:{}", host, port)
        .to_socket_addrs()
        .map_err(|e| QuizError::Network(format!("resolve {}:{}: {}", host, port, e)))?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => {
                stream.set_read_timeout(Some(poll))?;
                stream.set_nodelay(true)?;
                log::info!("connected to {}", addr);
                return Ok(stream);
            }
            Err(e) => {
                log::debug!("connect {} failed: {}", addr, e);
                last_err = Some(QuizError::from(e));
            }
        }
    }
    Err(last_err.unwrap_or_else(|| QuizError::Network(format!("no address for {}:{}", host, port))))
}

/// Splits a byte stream into lines.
///
/// A line is returned once its `\n` arrives. Reads that time out are "no
/// data yet" and leave partial bytes buffered. The peer's prompts are not
/// newline-terminated, so after `idle_polls` empty reads in a row a partial
/// is handed out only if it is a prompt: the feasibility question, or a
/// `name:` value prompt while one is expected (see
/// [`LineReader::expect_value_prompt`]). Any other partial keeps waiting
/// for its terminator.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    idle_polls: u32,
    idle: u32,
    value_prompt: bool,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R, idle_polls: u32) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            idle_polls,
            idle: 0,
            value_prompt: false,
            eof: false,
        }
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Bytes received but not yet returned as a line.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let rest = self.buf.split_off(pos + 1);
        let mut line = std::mem::replace(&mut self.buf, rest);
        line.pop();
        Some(decode(line))
    }

    /// Whether an unterminated `name:` partial may be released as a prompt.
    pub fn expect_value_prompt(&mut self, expected: bool) {
        self.value_prompt = expected;
    }

    fn partial_is_prompt(&self) -> bool {
        let text = String::from_utf8_lossy(&self.buf);
        text.contains(QUESTION_MARKER) || (self.value_prompt && text.trim_end().ends_with(':'))
    }

    fn take_partial(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        Some(decode(std::mem::take(&mut self.buf)))
    }
}

fn decode(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

impl<R: Read> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>, QuizError> {
        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }
        if self.eof {
            return self.take_partial().map(Some).ok_or(QuizError::Closed);
        }

        let mut chunk = [0u8; READ_CHUNK];
        match self.inner.read(&mut chunk) {
            Ok(0) => {
                self.eof = true;
                self.take_partial().map(Some).ok_or(QuizError::Closed)
            }
            Ok(n) => {
                self.idle = 0;
                self.buf.extend_from_slice(&chunk[..n]);
                Ok(self.take_line())
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(None),
            Err(e) if is_idle_io_error(&e) => {
                self.idle = self.idle.saturating_add(1);
                if self.idle >= self.idle_polls && self.partial_is_prompt() {
                    self.idle = 0;
                    return Ok(self.take_partial());
                }
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
