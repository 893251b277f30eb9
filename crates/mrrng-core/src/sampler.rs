//! Entropy samplers: each one reads a counter family from a
//! [`SystemProbe`] and folds the raw bytes into the state with [`mix`].
//!
//! Samplers are fail-open: an unavailable counter leaves the state exactly as
//! it was. Counters are mixed in native byte order with the width of the
//! underlying field.

use crate::mixer::mix;
use crate::probe::{IoCounters, MemoryCounters, SystemProbe};

/// One entropy sampler, as used in the generator's mixing schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sampler {
    /// Wall clock followed by the performance counter.
    TimeStamp,
    /// Every non-zero process I/O counter.
    IoCounters,
    /// The first non-zero process memory counter.
    MemoryCounters,
    /// Pointer coordinates.
    CursorPosition,
    /// CPU cycles of the process (`process: true`) or the calling thread.
    CycleTime { process: bool },
}

impl Sampler {
    /// Run this sampler against `probe` and return the new state.
    pub fn apply<P: SystemProbe + ?Sized>(self, state: u64, probe: &P) -> u64 {
        match self {
            Self::TimeStamp => add_time_stamp(state, probe),
            Self::IoCounters => add_io_counters(state, probe),
            Self::MemoryCounters => add_memory_counters(state, probe),
            Self::CursorPosition => add_cursor_position(state, probe),
            Self::CycleTime { process } => add_cycle_time(state, probe, process),
        }
    }
}

impl std::fmt::Display for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimeStamp => write!(f, "time_stamp"),
            Self::IoCounters => write!(f, "io_counters"),
            Self::MemoryCounters => write!(f, "memory_counters"),
            Self::CursorPosition => write!(f, "cursor_position"),
            Self::CycleTime { process: true } => write!(f, "process_cycle_time"),
            Self::CycleTime { process: false } => write!(f, "thread_cycle_time"),
        }
    }
}

/// Apply `samplers` in order.
pub fn apply_all<P: SystemProbe + ?Sized>(state: u64, probe: &P, samplers: &[Sampler]) -> u64 {
    samplers.iter().fold(state, |s, sampler| sampler.apply(s, probe))
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Mix the wall clock, then the performance counter. Each half is skipped on
/// its own if the probe cannot supply it.
pub fn add_time_stamp<P: SystemProbe + ?Sized>(state: u64, probe: &P) -> u64 {
    let mut state = state;
    if let Some(now) = probe.system_time() {
        state = mix(state, &now.to_ne_bytes());
    }
    if let Some(count) = probe.performance_counter() {
        state = mix(state, &count.to_ne_bytes());
    }
    state
}

// ---------------------------------------------------------------------------
// Process counters
// ---------------------------------------------------------------------------

/// Mix every non-zero field of `io`, in field order.
pub fn mix_io_counters(state: u64, io: &IoCounters) -> u64 {
    io.fields()
        .into_iter()
        .filter(|&field| field != 0)
        .fold(state, |s, field| mix(s, &field.to_ne_bytes()))
}

pub fn add_io_counters<P: SystemProbe + ?Sized>(state: u64, probe: &P) -> u64 {
    match probe.io_counters() {
        Some(io) => mix_io_counters(state, &io),
        None => state,
    }
}

/// Mix only the first non-zero field of `mem` in priority order: the page
/// fault count (4 bytes), then the eight size fields (pointer width).
///
/// Unlike [`mix_io_counters`], at most one field contributes per call.
pub fn mix_memory_counters(state: u64, mem: &MemoryCounters) -> u64 {
    if mem.page_fault_count != 0 {
        return mix(state, &mem.page_fault_count.to_ne_bytes());
    }
    match mem.sizes().into_iter().find(|&size| size != 0) {
        Some(size) => mix(state, &size.to_ne_bytes()),
        None => state,
    }
}

pub fn add_memory_counters<P: SystemProbe + ?Sized>(state: u64, probe: &P) -> u64 {
    match probe.memory_counters() {
        Some(mem) => mix_memory_counters(state, &mem),
        None => state,
    }
}

// ---------------------------------------------------------------------------
// Pointer and CPU
// ---------------------------------------------------------------------------

pub fn add_cursor_position<P: SystemProbe + ?Sized>(state: u64, probe: &P) -> u64 {
    match probe.cursor_position() {
        Some(pos) => mix(state, &pos.to_ne_bytes()),
        None => state,
    }
}

/// Mix a CPU cycle count.
///
/// With `process` set the process-wide count is tried first; when it is not
/// requested, or the query fails, the calling thread's count is used. The
/// process query is much slower, keep it out of hot paths.
pub fn add_cycle_time<P: SystemProbe + ?Sized>(state: u64, probe: &P, process: bool) -> u64 {
    let cycles = if process {
        probe
            .process_cycle_time()
            .or_else(|| probe.thread_cycle_time())
    } else {
        probe.thread_cycle_time()
    };
    match cycles {
        Some(cycles) => mix(state, &cycles.to_ne_bytes()),
        None => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::CursorPosition;
    use std::cell::Cell;

    /// Probe with fixed answers and a call counter for the process query.
    #[derive(Default)]
    struct FixedProbe {
        time: Option<u64>,
        perf: Option<i64>,
        io: Option<IoCounters>,
        mem: Option<MemoryCounters>,
        cursor: Option<CursorPosition>,
        thread: Option<u64>,
        process: Option<u64>,
        process_calls: Cell<u32>,
    }

    impl SystemProbe for FixedProbe {
        fn system_time(&self) -> Option<u64> {
            self.time
        }
        fn performance_counter(&self) -> Option<i64> {
            self.perf
        }
        fn io_counters(&self) -> Option<IoCounters> {
            self.io
        }
        fn memory_counters(&self) -> Option<MemoryCounters> {
            self.mem
        }
        fn cursor_position(&self) -> Option<CursorPosition> {
            self.cursor
        }
        fn thread_cycle_time(&self) -> Option<u64> {
            self.thread
        }
        fn process_cycle_time(&self) -> Option<u64> {
            self.process_calls.set(self.process_calls.get() + 1);
            self.process
        }
    }

    const STATE: u64 = 0x0123_4567_89ab_cdef;

    #[test]
    fn unavailable_probe_is_identity_for_every_sampler() {
        let probe = FixedProbe::default();
        for sampler in [
            Sampler::TimeStamp,
            Sampler::IoCounters,
            Sampler::MemoryCounters,
            Sampler::CursorPosition,
            Sampler::CycleTime { process: false },
            Sampler::CycleTime { process: true },
        ] {
            assert_eq!(sampler.apply(STATE, &probe), STATE, "{sampler}");
        }
    }

    #[test]
    fn time_stamp_mixes_clock_then_counter() {
        let probe = FixedProbe {
            time: Some(0x01d9_0000_1234_5678),
            perf: Some(987_654_321),
            ..Default::default()
        };
        let expected = mix(
            mix(STATE, &0x01d9_0000_1234_5678u64.to_ne_bytes()),
            &987_654_321i64.to_ne_bytes(),
        );
        assert_eq!(add_time_stamp(STATE, &probe), expected);
    }

    #[test]
    fn time_stamp_skips_missing_half() {
        let probe = FixedProbe {
            perf: Some(42),
            ..Default::default()
        };
        assert_eq!(
            add_time_stamp(STATE, &probe),
            mix(STATE, &42i64.to_ne_bytes())
        );
    }

    #[test]
    fn io_counters_mix_every_nonzero_field() {
        let io = IoCounters {
            read_operation_count: 5,
            write_operation_count: 0,
            other_operation_count: 9,
            read_transfer_count: 0,
            write_transfer_count: 1 << 40,
            other_transfer_count: 0,
        };
        let mut expected = STATE;
        for field in [5u64, 9, 1 << 40] {
            expected = mix(expected, &field.to_ne_bytes());
        }
        assert_eq!(mix_io_counters(STATE, &io), expected);
    }

    #[test]
    fn all_zero_io_counters_are_identity() {
        assert_eq!(mix_io_counters(STATE, &IoCounters::default()), STATE);
    }

    #[test]
    fn memory_counters_stop_at_first_nonzero() {
        let mem = MemoryCounters {
            page_fault_count: 0,
            peak_working_set_size: 0,
            working_set_size: 4096,
            quota_paged_pool_usage: 77,
            peak_pagefile_usage: 12,
            ..Default::default()
        };
        assert_eq!(
            mix_memory_counters(STATE, &mem),
            mix(STATE, &4096usize.to_ne_bytes())
        );
    }

    #[test]
    fn memory_page_faults_take_priority_and_use_four_bytes() {
        let mem = MemoryCounters {
            page_fault_count: 300,
            peak_working_set_size: 1 << 20,
            ..Default::default()
        };
        assert_eq!(
            mix_memory_counters(STATE, &mem),
            mix(STATE, &300u32.to_ne_bytes())
        );
    }

    #[test]
    fn memory_last_field_is_reachable() {
        let mem = MemoryCounters {
            peak_pagefile_usage: 3,
            ..Default::default()
        };
        assert_eq!(
            mix_memory_counters(STATE, &mem),
            mix(STATE, &3usize.to_ne_bytes())
        );
    }

    #[test]
    fn cursor_mixes_both_coordinates() {
        let pos = CursorPosition { x: 640, y: 480 };
        let probe = FixedProbe {
            cursor: Some(pos),
            ..Default::default()
        };
        assert_eq!(
            add_cursor_position(STATE, &probe),
            mix(STATE, &pos.to_ne_bytes())
        );
    }

    #[test]
    fn thread_cycle_time_never_asks_for_process() {
        let probe = FixedProbe {
            thread: Some(1000),
            process: Some(2000),
            ..Default::default()
        };
        let out = add_cycle_time(STATE, &probe, false);
        assert_eq!(out, mix(STATE, &1000u64.to_ne_bytes()));
        assert_eq!(probe.process_calls.get(), 0);
    }

    #[test]
    fn process_cycle_time_preferred_when_requested() {
        let probe = FixedProbe {
            thread: Some(1000),
            process: Some(2000),
            ..Default::default()
        };
        assert_eq!(
            add_cycle_time(STATE, &probe, true),
            mix(STATE, &2000u64.to_ne_bytes())
        );
        assert_eq!(probe.process_calls.get(), 1);
    }

    #[test]
    fn process_cycle_time_falls_back_to_thread() {
        let probe = FixedProbe {
            thread: Some(1000),
            process: None,
            ..Default::default()
        };
        assert_eq!(
            add_cycle_time(STATE, &probe, true),
            mix(STATE, &1000u64.to_ne_bytes())
        );
    }

    #[test]
    fn apply_all_runs_in_order() {
        let probe = FixedProbe {
            time: Some(11),
            thread: Some(22),
            ..Default::default()
        };
        let schedule = [Sampler::CycleTime { process: false }, Sampler::TimeStamp];
        let expected = add_time_stamp(add_cycle_time(STATE, &probe, false), &probe);
        assert_eq!(apply_all(STATE, &probe, &schedule), expected);
    }

    #[test]
    fn sampler_names() {
        assert_eq!(Sampler::IoCounters.to_string(), "io_counters");
        assert_eq!(
            Sampler::CycleTime { process: false }.to_string(),
            "thread_cycle_time"
        );
    }
}
