//! Seed controller and the `Mrrng64` generator.
//!
//! The state word is the whole generator. A zero state means "not yet
//! seeded": the first [`next`] call runs the [`init`] bootstrap before its
//! own mixing round. Every call then folds a few live counters into the state
//! and hands the state back as the output word.
//!
//! Not a CSPRNG. Output is best-effort entropy mixing and the full state is
//! exposed on every call.

use log::debug;

use crate::probe::{OsProbe, SystemProbe};
use crate::sampler::{Sampler, apply_all};

/// Rounds of cycle-time + timestamp mixing performed by [`init`].
pub const INIT_ROUNDS: usize = 32;

/// Samplers mixed once at the start of [`init`].
pub const INIT_PRELUDE: [Sampler; 3] = [
    Sampler::MemoryCounters,
    Sampler::IoCounters,
    Sampler::CursorPosition,
];

/// Samplers mixed in each of the [`INIT_ROUNDS`] bootstrap rounds.
pub const INIT_ROUND: [Sampler; 2] = [Sampler::CycleTime { process: false }, Sampler::TimeStamp];

/// Samplers mixed by every [`next`] call.
///
/// The cursor position is left out: it adds little and halves throughput.
pub const NEXT_ROUND: [Sampler; 3] = [
    Sampler::IoCounters,
    Sampler::CycleTime { process: false },
    Sampler::TimeStamp,
];

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Bootstrap `state` from its current value plus every sampler, with
/// [`INIT_ROUNDS`] extra rounds of timing entropy.
pub fn init<P: SystemProbe + ?Sized>(state: &mut u64, probe: &P) {
    let mut s = apply_all(*state, probe, &INIT_PRELUDE);
    for _ in 0..INIT_ROUNDS {
        s = apply_all(s, probe, &INIT_ROUND);
    }
    *state = s;
}

/// Advance `state` and return it as the next output word.
///
/// A zero state is bootstrapped with [`init`] first.
pub fn next<P: SystemProbe + ?Sized>(state: &mut u64, probe: &P) -> u64 {
    if *state == 0 {
        debug!("bootstrapping zero state ({} probe)", probe.backend());
        init(state, probe);
    }
    *state = apply_all(*state, probe, &NEXT_ROUND);
    *state
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// A generation session: one exclusively owned state word plus its probe.
///
/// Concurrent streams each need their own `Mrrng64`.
#[derive(Debug, Clone)]
pub struct Mrrng64<P: SystemProbe = OsProbe> {
    state: u64,
    probe: P,
}

impl Mrrng64<OsProbe> {
    /// Unseeded generator on the native probe. Seeding happens lazily on the
    /// first draw.
    pub fn new() -> Self {
        Self::with_probe(OsProbe::new())
    }
}

impl Default for Mrrng64<OsProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SystemProbe> Mrrng64<P> {
    pub fn with_probe(probe: P) -> Self {
        Self::with_seed(0, probe)
    }

    /// Start from a caller-supplied state. A zero seed behaves like
    /// [`with_probe`](Self::with_probe); any other value is used as-is until
    /// [`init`](Self::init) is called explicitly.
    pub fn with_seed(seed: u64, probe: P) -> Self {
        Self { state: seed, probe }
    }

    /// Run the bootstrap on the current state now instead of lazily.
    pub fn init(&mut self) {
        init(&mut self.state, &self.probe);
    }

    /// Next 64-bit output word.
    pub fn next_u64(&mut self) -> u64 {
        next(&mut self.state, &self.probe)
    }

    /// Current state word (equal to the last output).
    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn is_seeded(&self) -> bool {
        self.state != 0
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Fill `dest` with output words in native byte order; a trailing partial
    /// word is truncated.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_ne_bytes());
        }
        let tail = chunks.into_remainder();
        if !tail.is_empty() {
            let word = self.next_u64().to_ne_bytes();
            tail.copy_from_slice(&word[..tail.len()]);
        }
    }
}

impl<P: SystemProbe> Iterator for Mrrng64<P> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_u64())
    }
}
