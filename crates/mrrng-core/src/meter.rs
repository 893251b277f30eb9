//! Byte-level Shannon entropy of generated output.
//!
//! A single forward pass accumulates a 256-bucket [`FrequencyTable`]; the
//! entropy is `-Σ p·log2(p)` over the non-empty buckets, in bits per byte
//! (range 0–8). Empty input is defined as 0.0 rather than NaN.

use std::io::{self, Read, Seek, SeekFrom};

/// Read size for stream measurement.
pub const CHUNK_SIZE: usize = 0x4000;

// ---------------------------------------------------------------------------
// Frequency table
// ---------------------------------------------------------------------------

/// Occurrence count per byte value.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }

    pub fn accumulate(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Bytes accumulated so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of byte values seen at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Entropy using `total` as the probability denominator.
    ///
    /// Returns 0.0 when `total` is zero.
    pub fn shannon_entropy_with_total(&self, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let n = total as f64;
        let mut h = 0.0;
        for &c in &self.counts {
            if c > 0 {
                let p = c as f64 / n;
                h -= p * p.log2();
            }
        }
        h
    }

    /// Entropy using the accumulated byte count as the denominator.
    pub fn shannon_entropy(&self) -> f64 {
        self.shannon_entropy_with_total(self.total)
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// Result of measuring a byte stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyReport {
    /// Measured stream length in bytes.
    pub bytes: u64,
    /// Distinct byte values observed.
    pub distinct: usize,
    /// Shannon entropy in bits per byte.
    pub entropy: f64,
}

impl std::fmt::Display for EntropyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entropy: {:.11}", self.entropy)
    }
}

/// Shannon entropy of an in-memory slice, in bits per byte.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    let mut table = FrequencyTable::new();
    table.accumulate(data);
    table.shannon_entropy()
}

/// Measure a whole seekable stream from its start.
///
/// The stream length is measured by seeking to the end and is used as the
/// probability denominator; the stream is then rewound and read in
/// [`CHUNK_SIZE`] chunks. The stream is left positioned at its end.
pub fn measure_stream<R: Read + Seek>(stream: &mut R) -> io::Result<EntropyReport> {
    let bytes = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(0))?;

    let mut table = FrequencyTable::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        table.accumulate(&buf[..n]);
    }

    Ok(EntropyReport {
        bytes,
        distinct: table.distinct(),
        entropy: table.shannon_entropy_with_total(bytes),
    })
}

/// Open `path` and measure it.
pub fn measure_file(path: impl AsRef<std::path::Path>) -> io::Result<EntropyReport> {
    let mut file = std::fs::File::open(path)?;
    measure_stream(&mut file)
}
