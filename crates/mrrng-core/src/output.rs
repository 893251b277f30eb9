//! Word stream output.
//!
//! Output is a flat, header-less sequence of native-endian `u64` words, one
//! per generator call. No framing, no checksum, no metadata.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::generator::Mrrng64;
use crate::probe::SystemProbe;

/// Default output file name of the reference run.
pub const DEFAULT_OUTPUT: &str = "RNG.dat";

/// Words written by the reference run: 128 Mi words, 1 GiB.
pub const DEFAULT_WORDS: u64 = 128 * 1024 * 1024;

/// Words per buffered write.
const WORDS_PER_CHUNK: usize = 1024;

/// Write `words` generator outputs to `sink`. Returns the bytes written.
///
/// Any write error aborts the run and is returned as-is.
pub fn write_words<P: SystemProbe, W: Write>(
    rng: &mut Mrrng64<P>,
    sink: &mut W,
    words: u64,
) -> io::Result<u64> {
    let mut buf = [0u8; WORDS_PER_CHUNK * 8];
    let mut remaining = words;
    let mut written = 0u64;
    while remaining > 0 {
        let n = remaining.min(WORDS_PER_CHUNK as u64) as usize;
        for chunk in buf[..n * 8].chunks_exact_mut(8) {
            chunk.copy_from_slice(&rng.next_u64().to_ne_bytes());
        }
        sink.write_all(&buf[..n * 8])?;
        remaining -= n as u64;
        written = written.saturating_add(n as u64 * 8);
    }
    sink.flush()?;
    Ok(written)
}

/// Create (or truncate) `path` for reading and writing, fill it with `words`
/// generator outputs and return the file, positioned at its end, so the
/// caller can re-read it.
pub fn generate_file<P: SystemProbe>(
    rng: &mut Mrrng64<P>,
    path: impl AsRef<Path>,
    words: u64,
) -> io::Result<File> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    info!("writing {words} words to {}", path.display());
    let mut writer = BufWriter::new(file);
    let bytes = write_words(rng, &mut writer, words)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_data()?;
    info!("wrote {bytes} bytes to {}", path.display());
    Ok(file)
}
