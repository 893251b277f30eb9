//! Stream generator output to a file and measure it.
//!
//! Writes native-endian words to a file, then re-reads it and prints the
//! byte-level Shannon entropy.
//!
//! Run: `cargo run --example stream_to_file`

use mrrng_core::{Mrrng64, generate_file, measure_stream};

fn main() -> std::io::Result<()> {
    let output_path = "mrrng_output.bin";
    let words: u64 = 64 * 1024;

    let mut rng = Mrrng64::new();
    println!("Streaming {words} words to {output_path}");

    let mut file = generate_file(&mut rng, output_path, words)?;
    let report = measure_stream(&mut file)?;

    println!("Done. Wrote {} bytes to {output_path}", report.bytes);
    println!("{report}");
    Ok(())
}
