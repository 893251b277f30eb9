//! Operating-system counter probes.
//!
//! [`SystemProbe`] is the capability boundary between the mixing algorithm
//! and the host: one method per counter family, each returning `None` when the
//! host cannot answer. [`OsProbe`] is the native implementation for the build
//! target. Tests and deterministic replays substitute their own probe.

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd"
))]
mod unix;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux;
#[cfg(any(target_os = "linux", target_os = "android"))]
use linux as native;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
use macos as native;

#[cfg(target_os = "freebsd")]
use unix as native;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use self::windows as native;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd",
    windows
)))]
mod portable;
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd",
    windows
)))]
use portable as native;

use std::time::{SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Current-process I/O statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounters {
    pub read_operation_count: u64,
    pub write_operation_count: u64,
    pub other_operation_count: u64,
    pub read_transfer_count: u64,
    pub write_transfer_count: u64,
    pub other_transfer_count: u64,
}

impl IoCounters {
    /// All six fields in mixing order: operation counts, then byte totals.
    pub fn fields(&self) -> [u64; 6] {
        [
            self.read_operation_count,
            self.write_operation_count,
            self.other_operation_count,
            self.read_transfer_count,
            self.write_transfer_count,
            self.other_transfer_count,
        ]
    }
}

/// Current-process memory statistics.
///
/// Field names follow the classic process memory counter layout; backends
/// without a direct equivalent leave a field at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub page_fault_count: u32,
    pub peak_working_set_size: usize,
    pub working_set_size: usize,
    pub quota_peak_paged_pool_usage: usize,
    pub quota_paged_pool_usage: usize,
    pub quota_peak_non_paged_pool_usage: usize,
    pub quota_non_paged_pool_usage: usize,
    pub pagefile_usage: usize,
    pub peak_pagefile_usage: usize,
}

impl MemoryCounters {
    /// The eight size fields in priority order (everything after the page
    /// fault count).
    pub fn sizes(&self) -> [usize; 8] {
        [
            self.peak_working_set_size,
            self.working_set_size,
            self.quota_peak_paged_pool_usage,
            self.quota_paged_pool_usage,
            self.quota_peak_non_paged_pool_usage,
            self.quota_non_paged_pool_usage,
            self.pagefile_usage,
            self.peak_pagefile_usage,
        ]
    }
}

/// On-screen pointer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    /// `x` then `y`, native byte order.
    pub fn to_ne_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.x.to_ne_bytes());
        out[4..].copy_from_slice(&self.y.to_ne_bytes());
        out
    }
}

// ---------------------------------------------------------------------------
// Probe trait
// ---------------------------------------------------------------------------

/// Source of the live counters the samplers fold into generator state.
///
/// Every method is a single, non-blocking query. `None` means the counter is
/// unavailable right now; callers skip it.
pub trait SystemProbe {
    /// Wall-clock time as 100 ns ticks since 1601-01-01 UTC.
    fn system_time(&self) -> Option<u64>;

    /// Monotonic high-resolution counter value.
    fn performance_counter(&self) -> Option<i64>;

    /// Current-process I/O statistics.
    fn io_counters(&self) -> Option<IoCounters>;

    /// Current-process memory statistics.
    fn memory_counters(&self) -> Option<MemoryCounters>;

    /// Pointer position, if the host has a pointer and a display to ask.
    fn cursor_position(&self) -> Option<CursorPosition>;

    /// CPU cycles (or the finest CPU-time unit available) consumed by the
    /// calling thread.
    fn thread_cycle_time(&self) -> Option<u64>;

    /// CPU cycles consumed by the whole process. Noticeably slower than the
    /// thread query on most hosts.
    fn process_cycle_time(&self) -> Option<u64>;

    /// Short backend identifier for diagnostics.
    fn backend(&self) -> &'static str {
        "custom"
    }
}

impl<P: SystemProbe + ?Sized> SystemProbe for &P {
    fn system_time(&self) -> Option<u64> {
        (**self).system_time()
    }
    fn performance_counter(&self) -> Option<i64> {
        (**self).performance_counter()
    }
    fn io_counters(&self) -> Option<IoCounters> {
        (**self).io_counters()
    }
    fn memory_counters(&self) -> Option<MemoryCounters> {
        (**self).memory_counters()
    }
    fn cursor_position(&self) -> Option<CursorPosition> {
        (**self).cursor_position()
    }
    fn thread_cycle_time(&self) -> Option<u64> {
        (**self).thread_cycle_time()
    }
    fn process_cycle_time(&self) -> Option<u64> {
        (**self).process_cycle_time()
    }
    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}

// ---------------------------------------------------------------------------
// Native probe
// ---------------------------------------------------------------------------

/// Probe backed by the native OS calls of the build target.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl OsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl SystemProbe for OsProbe {
    fn system_time(&self) -> Option<u64> {
        native::system_time()
    }

    fn performance_counter(&self) -> Option<i64> {
        native::performance_counter()
    }

    fn io_counters(&self) -> Option<IoCounters> {
        native::io_counters()
    }

    fn memory_counters(&self) -> Option<MemoryCounters> {
        native::memory_counters()
    }

    fn cursor_position(&self) -> Option<CursorPosition> {
        native::cursor_position()
    }

    fn thread_cycle_time(&self) -> Option<u64> {
        native::thread_cycle_time()
    }

    fn process_cycle_time(&self) -> Option<u64> {
        native::process_cycle_time()
    }

    fn backend(&self) -> &'static str {
        native::BACKEND
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// 100 ns intervals between 1601-01-01 and 1970-01-01.
pub const FILETIME_UNIX_EPOCH_OFFSET: u64 = 116_444_736_000_000_000;

/// Convert a time since the Unix epoch into FILETIME ticks.
pub fn filetime_from_unix(secs: u64, nanos: u32) -> u64 {
    secs.wrapping_mul(10_000_000)
        .wrapping_add(nanos as u64 / 100)
        .wrapping_add(FILETIME_UNIX_EPOCH_OFFSET)
}

/// Wall clock via `std::time`, used by every non-Windows backend.
#[cfg_attr(windows, allow(dead_code))]
fn std_system_time() -> Option<u64> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    Some(filetime_from_unix(now.as_secs(), now.subsec_nanos()))
}
