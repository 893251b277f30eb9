//! Basic generation example.
//!
//! Draws a handful of words from the native probe and prints them as hex.
//!
//! Run: `cargo run --example basic`

use mrrng_core::{Mrrng64, SystemProbe};

fn main() {
    let mut rng = Mrrng64::new();

    println!("Probe backend: {}", rng.probe().backend());
    println!("Seeded before first draw: {}", rng.is_seeded());

    for i in 0..8 {
        println!("  word {i}: {:016x}", rng.next_u64());
    }

    // Fill a byte buffer directly
    let mut buf = [0u8; 32];
    rng.fill_bytes(&mut buf);
    print!("Random bytes (hex): ");
    for b in &buf {
        print!("{b:02x}");
    }
    println!();
}
