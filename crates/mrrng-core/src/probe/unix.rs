//! Probe primitives shared by the unix backends: POSIX clocks and
//! `getrusage(2)`. Also serves as the complete backend on BSDs.

use super::{CursorPosition, IoCounters, MemoryCounters};

#[cfg_attr(
    any(target_os = "linux", target_os = "android", target_os = "macos"),
    allow(dead_code)
)]
pub const BACKEND: &str = "unix";

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Read a POSIX clock as nanoseconds.
pub fn clock_ns(clock: libc::clockid_t) -> Option<u64> {
    // SAFETY: timespec is plain old data; all-zero is a valid bit pattern.
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(clock, &mut ts) };
    if rc != 0 {
        return None;
    }
    Some(
        (ts.tv_sec as u64)
            .wrapping_mul(1_000_000_000)
            .wrapping_add(ts.tv_nsec as u64),
    )
}

pub fn system_time() -> Option<u64> {
    super::std_system_time()
}

#[cfg_attr(target_os = "macos", allow(dead_code))]
pub fn performance_counter() -> Option<i64> {
    clock_ns(libc::CLOCK_MONOTONIC).map(|ns| ns as i64)
}

/// Thread CPU time in nanoseconds, the finest per-thread CPU clock POSIX
/// exposes without privileged counters.
pub fn thread_cycle_time() -> Option<u64> {
    clock_ns(libc::CLOCK_THREAD_CPUTIME_ID)
}

pub fn process_cycle_time() -> Option<u64> {
    clock_ns(libc::CLOCK_PROCESS_CPUTIME_ID)
}

// ---------------------------------------------------------------------------
// Resource usage
// ---------------------------------------------------------------------------

/// `getrusage(RUSAGE_SELF)`, or `None` if the call fails.
pub fn rusage() -> Option<libc::rusage> {
    // SAFETY: rusage is plain old data; all-zero is a valid bit pattern.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: `usage` is a valid, writable rusage struct.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    Some(usage)
}

/// Minor plus major page faults, wrapped to 32 bits.
pub fn page_faults(usage: &libc::rusage) -> u32 {
    (usage.ru_minflt as u64).wrapping_add(usage.ru_majflt as u64) as u32
}

/// Peak resident set size in bytes. Linux and the BSDs report kilobytes,
/// macOS reports bytes.
pub fn peak_rss_bytes(usage: &libc::rusage) -> usize {
    let raw = usage.ru_maxrss.max(0) as usize;
    if cfg!(target_os = "macos") {
        raw
    } else {
        raw.saturating_mul(1024)
    }
}

/// I/O counters from block and message counts. Byte totals are not exposed
/// by `getrusage` and stay zero.
pub fn io_counters() -> Option<IoCounters> {
    let usage = rusage()?;
    Some(IoCounters {
        read_operation_count: usage.ru_inblock.max(0) as u64,
        write_operation_count: usage.ru_oublock.max(0) as u64,
        other_operation_count: (usage.ru_msgsnd.max(0) as u64)
            .wrapping_add(usage.ru_msgrcv.max(0) as u64),
        ..Default::default()
    })
}

pub fn memory_counters() -> Option<MemoryCounters> {
    let usage = rusage()?;
    Some(MemoryCounters {
        page_fault_count: page_faults(&usage),
        peak_working_set_size: peak_rss_bytes(&usage),
        ..Default::default()
    })
}

#[cfg_attr(target_os = "macos", allow(dead_code))]
pub fn cursor_position() -> Option<CursorPosition> {
    None
}
