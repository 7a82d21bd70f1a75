//! Byte sources the lexer pulls from.
//!
//! [`TimeoutReader`] moves the blocking reads of an arbitrary [`Read`] onto a helper thread and
//! bounds every single wait for the next chunk by a [`ReadTimeout`]. The deadline is rolling:
//! a stream that keeps delivering data never times out, no matter how long the whole parse takes.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::Duration;

use crate::error::{ConfigError, Error, StreamReadTimeout, TimeUnit};

#[cfg(test)]
mod test;

const CHUNK_SIZE: usize = 8 * 1024;
const CHANNEL_CAPACITY: usize = 4;

/// A sequential source of input bytes.
pub trait Source {
    /// Returns the next byte, or `None` once the input is exhausted.
    fn next_byte(&mut self) -> Result<Option<u8>, Error>;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        (**self).next_byte()
    }
}

/// In-memory input, never blocks.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Source for SliceSource<'_> {
    #[inline]
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let b = self.bytes.get(self.pos).copied();
        self.pos += b.is_some() as usize;
        Ok(b)
    }
}

/// The maximum duration a single read may block. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadTimeout(Duration);

impl ReadTimeout {
    pub const DEFAULT: Self = Self(Duration::from_secs(30));

    pub fn new(duration: Duration) -> Result<Self, ConfigError> {
        if duration.is_zero() {
            return Err(ConfigError::NonPositiveTimeout {
                value: 0,
                unit: TimeUnit::Millis,
            });
        }
        Ok(Self(duration))
    }

    pub fn from_secs(secs: i64) -> Result<Self, ConfigError> {
        if secs <= 0 {
            return Err(ConfigError::NonPositiveTimeout {
                value: secs,
                unit: TimeUnit::Seconds,
            });
        }
        Ok(Self(Duration::from_secs(secs as u64)))
    }

    pub fn from_millis(millis: i64) -> Result<Self, ConfigError> {
        if millis <= 0 {
            return Err(ConfigError::NonPositiveTimeout {
                value: millis,
                unit: TimeUnit::Millis,
            });
        }
        Ok(Self(Duration::from_millis(millis as u64)))
    }

    pub fn get(&self) -> Duration {
        self.0
    }
}

impl Default for ReadTimeout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A chunk of input, an empty chunk marks the end of the stream.
type Chunk = io::Result<Vec<u8>>;

/// Wraps a blocking reader and enforces a per-read deadline.
///
/// If a read times out the helper thread is left behind, it exits as soon as the wrapped reader
/// returns and notices that nobody is listening anymore.
#[derive(Debug)]
pub struct TimeoutReader {
    rx: Receiver<Chunk>,
    buf: Vec<u8>,
    pos: usize,
    timeout: ReadTimeout,
    bytes_read: u64,
    done: bool,
}

impl TimeoutReader {
    pub fn new<R: Read + Send + 'static>(reader: R, timeout: ReadTimeout) -> Result<Self, Error> {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
        thread::Builder::new()
            .name("streamtoml-reader".into())
            .spawn(move || read_chunks(reader, tx))?;

        Ok(Self {
            rx,
            buf: Vec::new(),
            pos: 0,
            timeout,
            bytes_read: 0,
            done: false,
        })
    }

    pub fn timeout(&self) -> ReadTimeout {
        self.timeout
    }

    /// Number of bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the next byte, waiting at most `timeout` if none is buffered.
    pub fn read_next(&mut self, timeout: Duration) -> Result<Option<u8>, Error> {
        if self.pos >= self.buf.len() && !self.fill(timeout)? {
            return Ok(None);
        }

        let b = self.buf[self.pos];
        self.pos += 1;
        self.bytes_read += 1;
        Ok(Some(b))
    }

    /// Blocks until the next non-empty chunk arrives. Returns `false` at the end of the stream.
    fn fill(&mut self, timeout: Duration) -> Result<bool, Error> {
        while !self.done {
            match self.rx.recv_timeout(timeout) {
                Ok(Ok(chunk)) if chunk.is_empty() => {
                    tracing::debug!(bytes_read = self.bytes_read, "end of stream");
                    self.done = true;
                }
                Ok(Ok(chunk)) => {
                    self.buf = chunk;
                    self.pos = 0;
                    return Ok(true);
                }
                Ok(Err(e)) => {
                    self.done = true;
                    return Err(Error::Io(e));
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!(
                        bytes_read = self.bytes_read,
                        timeout_ms = timeout.as_millis() as u64,
                        "stream read timed out"
                    );
                    return Err(Error::Timeout(StreamReadTimeout {
                        timeout,
                        bytes_read: self.bytes_read,
                    }));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.done = true;
                    return Err(Error::Internal(
                        "reader thread exited before the end of the stream".into(),
                    ));
                }
            }
        }
        Ok(false)
    }
}

impl Source for TimeoutReader {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let timeout = self.timeout.get();
        self.read_next(timeout)
    }
}

fn read_chunks(mut reader: impl Read, tx: SyncSender<Chunk>) {
    let mut buf = vec![0; CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(n) => {
                if tx.send(Ok(buf[..n].to_vec())).is_err() || n == 0 {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                _ = tx.send(Err(e));
                return;
            }
        }
    }
}
