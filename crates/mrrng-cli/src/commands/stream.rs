use std::io::{self, Write};

use mrrng_core::{Mrrng64, SystemProbe};

/// Words generated per write.
const CHUNK_WORDS: u64 = 512;

pub fn run(format: &str, words: u64) {
    let mut rng = Mrrng64::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = write_stream(&mut rng, &mut out, format == "hex", words) {
        super::fail("writing stdout", e);
    }
}

/// Write `words` generator outputs to `out` (0 = until the sink closes).
///
/// A closed pipe ends the stream quietly; any other write error is returned.
fn write_stream<P: SystemProbe, W: Write>(
    rng: &mut Mrrng64<P>,
    out: &mut W,
    hex: bool,
    words: u64,
) -> io::Result<()> {
    match emit(rng, out, hex, words) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn emit<P: SystemProbe, W: Write>(
    rng: &mut Mrrng64<P>,
    out: &mut W,
    hex: bool,
    words: u64,
) -> io::Result<()> {
    let mut total = 0u64;
    let mut buf = Vec::with_capacity(CHUNK_WORDS as usize * 16);

    while words == 0 || total < words {
        let want = if words == 0 {
            CHUNK_WORDS
        } else {
            CHUNK_WORDS.min(words - total)
        };

        buf.clear();
        for _ in 0..want {
            let word = rng.next_u64().to_ne_bytes();
            if hex {
                for b in word {
                    write!(buf, "{b:02x}")?;
                }
            } else {
                buf.extend_from_slice(&word);
            }
        }

        out.write_all(&buf)?;
        total += want;
    }

    if hex {
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that accepts `room` bytes, then fails every write with `kind`.
    struct FailingSink {
        room: usize,
        kind: io::ErrorKind,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::new(self.kind, "sink failed"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_raw_stream_writes_eight_bytes_per_word() {
        let mut rng = Mrrng64::new();
        let mut out = Vec::new();
        write_stream(&mut rng, &mut out, false, 1000).unwrap();
        assert_eq!(out.len(), 1000 * 8);
    }

    #[test]
    fn test_hex_stream_ends_with_newline() {
        let mut rng = Mrrng64::new();
        let mut out = Vec::new();
        write_stream(&mut rng, &mut out, true, 3).unwrap();
        assert_eq!(out.len(), 3 * 16 + 1);
        assert_eq!(out.last(), Some(&b'\n'));
        assert!(out[..48].iter().all(u8::is_ascii_hexdigit));
    }

    #[test]
    fn test_broken_pipe_ends_stream_quietly() {
        let mut rng = Mrrng64::new();
        let mut sink = FailingSink {
            room: 64,
            kind: io::ErrorKind::BrokenPipe,
        };
        assert!(write_stream(&mut rng, &mut sink, false, 0).is_ok());
    }

    #[test]
    fn test_other_write_errors_are_reported() {
        let mut rng = Mrrng64::new();
        let mut sink = FailingSink {
            room: 64,
            kind: io::ErrorKind::Other,
        };
        let err = write_stream(&mut rng, &mut sink, false, 100_000).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_unbounded_stream_reports_failure_on_full_sink() {
        let mut rng = Mrrng64::new();
        let mut sink = FailingSink {
            room: 0,
            kind: io::ErrorKind::WriteZero,
        };
        assert!(write_stream(&mut rng, &mut sink, true, 0).is_err());
    }
}
