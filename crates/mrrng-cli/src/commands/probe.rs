use std::time::Instant;

use mrrng_core::{OsProbe, SystemProbe};

fn show<T: std::fmt::Debug>(label: &str, reading: Option<T>) {
    match reading {
        Some(v) => println!("  \u{2705} {label:<20} {v:?}"),
        None => println!("  \u{274C} {label:<20} unavailable"),
    }
}

pub fn run() {
    let probe = OsProbe::new();
    println!(
        "Probe backend: {} ({} {})",
        probe.backend(),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();

    show("system_time", probe.system_time());
    show("performance_counter", probe.performance_counter());
    show("io_counters", probe.io_counters());
    show("memory_counters", probe.memory_counters());
    show("cursor_position", probe.cursor_position());
    show("thread_cycle_time", probe.thread_cycle_time());
    show("process_cycle_time", probe.process_cycle_time());

    println!();
    let rounds = 100_000u32;
    let t0 = Instant::now();
    let mut rng = mrrng_core::Mrrng64::with_probe(probe);
    for _ in 0..rounds {
        std::hint::black_box(rng.next_u64());
    }
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "  {rounds} draws in {elapsed:.3}s ({:.1} MB/s)",
        rounds as f64 * 8.0 / elapsed.max(f64::EPSILON) / 1e6
    );
}
