//! # mrrng-core
//!
//! **A 64-bit PRNG that keeps stirring the operating system into its state.**
//!
//! `mrrng-core` seeds a single 64-bit state word from live process counters,
//! CPU cycle counts, clocks and the pointer position, then re-mixes a few of
//! those counters on every draw. It is fast, dependency-light and explicitly
//! **not** cryptographically secure.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mrrng_core::{Mrrng64, shannon_entropy};
//!
//! let mut rng = Mrrng64::new();
//! let words: Vec<u64> = (0..1024).map(|_| rng.next_u64()).collect();
//!
//! let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
//! println!("{:.3} bits/byte", shannon_entropy(&bytes));
//! ```
//!
//! ## Architecture
//!
//! SystemProbe → Samplers → Byte mixer → State word → Output
//!
//! - [`mixer`]: folds bytes into two 32-bit lanes of the state.
//! - [`probe`]: the [`SystemProbe`] boundary and the native [`OsProbe`].
//! - [`sampler`]: one fail-open sampler per counter family.
//! - [`generator`]: the `init`/`next` protocol and [`Mrrng64`].
//! - [`meter`]: Shannon entropy of a produced stream.
//! - [`output`]: header-less word stream writer.
//!
//! Swap in your own [`SystemProbe`] to replay a recorded or scripted counter
//! sequence; with a deterministic probe the output is fully reproducible.

pub mod generator;
pub mod meter;
pub mod mixer;
pub mod output;
pub mod probe;
pub mod sampler;

pub use generator::{INIT_ROUNDS, Mrrng64, init, next};
pub use meter::{EntropyReport, FrequencyTable, measure_file, measure_stream, shannon_entropy};
pub use mixer::mix;
pub use output::{DEFAULT_OUTPUT, DEFAULT_WORDS, generate_file, write_words};
pub use probe::{CursorPosition, IoCounters, MemoryCounters, OsProbe, SystemProbe};
pub use sampler::Sampler;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
