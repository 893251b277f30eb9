//! Fallback backend for targets without a native probe: wall clock and a
//! process-local monotonic counter only. Every other query reports
//! unavailable and its sampler becomes a no-op.

use std::sync::OnceLock;
use std::time::Instant;

use super::{CursorPosition, IoCounters, MemoryCounters};

pub const BACKEND: &str = "portable";

pub fn system_time() -> Option<u64> {
    super::std_system_time()
}

pub fn performance_counter() -> Option<i64> {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    Some(epoch.elapsed().as_nanos() as i64)
}

pub fn io_counters() -> Option<IoCounters> {
    None
}

pub fn memory_counters() -> Option<MemoryCounters> {
    None
}

pub fn cursor_position() -> Option<CursorPosition> {
    None
}

pub fn thread_cycle_time() -> Option<u64> {
    None
}

pub fn process_cycle_time() -> Option<u64> {
    None
}
