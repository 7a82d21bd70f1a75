use std::io::{self, Read};
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

/// Returns its data once, then blocks for `stall` before signaling the end of the stream.
struct Stalling {
    data: Option<Vec<u8>>,
    stall: Duration,
}

impl Read for Stalling {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            None => {
                std::thread::sleep(self.stall);
                Ok(0)
            }
        }
    }
}

struct Failing;

impl Read for Failing {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
}

fn read_all(source: &mut impl Source) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(b) = source.next_byte()? {
        bytes.push(b);
    }
    Ok(bytes)
}

#[test]
fn slice_source() {
    let mut source = SliceSource::new(b"abc");
    assert_eq!(read_all(&mut source).unwrap(), b"abc");
    assert_eq!(source.next_byte().unwrap(), None);
}

#[test]
fn timeout_must_be_positive() {
    assert_eq!(
        ReadTimeout::from_secs(0),
        Err(ConfigError::NonPositiveTimeout {
            value: 0,
            unit: TimeUnit::Seconds
        })
    );
    assert_eq!(
        ReadTimeout::from_millis(-5),
        Err(ConfigError::NonPositiveTimeout {
            value: -5,
            unit: TimeUnit::Millis
        })
    );
    assert!(ReadTimeout::new(Duration::ZERO).is_err());
    assert_eq!(
        ReadTimeout::from_millis(1500).unwrap().get(),
        Duration::from_millis(1500)
    );
    assert_eq!(ReadTimeout::default().get(), Duration::from_secs(30));
}

#[test]
fn config_error_message() {
    let err = ReadTimeout::from_secs(-1).unwrap_err();
    assert_eq!(err.to_string(), "read timeout must be positive, got `-1s`");
}

#[test]
fn reads_whole_stream() {
    let data = "x".repeat(3 * CHUNK_SIZE + 17).into_bytes();
    let mut reader = TimeoutReader::new(io::Cursor::new(data.clone()), ReadTimeout::DEFAULT).unwrap();
    assert_eq!(read_all(&mut reader).unwrap(), data);
    assert_eq!(reader.bytes_read(), data.len() as u64);
    // stays at the end
    assert_eq!(reader.next_byte().unwrap(), None);
}

#[test]
fn stalled_read_times_out() {
    let stalling = Stalling {
        data: Some(b"a = 1".to_vec()),
        stall: Duration::from_secs(2),
    };
    let timeout = ReadTimeout::from_millis(50).unwrap();
    let mut reader = TimeoutReader::new(stalling, timeout).unwrap();

    match read_all(&mut reader) {
        Err(Error::Timeout(t)) => {
            assert_eq!(t.timeout, Duration::from_millis(50));
            assert_eq!(t.bytes_read, 5);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn io_errors_are_propagated() {
    let mut reader = TimeoutReader::new(Failing, ReadTimeout::DEFAULT).unwrap();
    match reader.next_byte() {
        Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected io error, got {other:?}"),
    }
}
