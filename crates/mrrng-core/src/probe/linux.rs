//! Linux backend: procfs for per-process I/O and memory, POSIX clocks for
//! time and CPU usage. No pointer position is available without a display
//! server connection, so the cursor query always reports unavailable.

use std::fs::File;
use std::os::unix::fs::FileExt;
use std::sync::OnceLock;

use super::unix;
use super::{IoCounters, MemoryCounters};

pub use super::unix::{
    cursor_position, performance_counter, process_cycle_time, system_time, thread_cycle_time,
};

pub const BACKEND: &str = "linux-procfs";

const PROC_SELF_IO: &str = "/proc/self/io";
const PROC_SELF_STATUS: &str = "/proc/self/status";

/// `/proc/self/io` is a handful of short lines, well under this size.
const PROC_IO_BUF: usize = 512;

// ---------------------------------------------------------------------------
// /proc/self/io
// ---------------------------------------------------------------------------

/// Parse the `key: value` lines of `/proc/self/io`.
///
/// Operation counts come from `syscr`/`syscw`, byte totals from
/// `rchar`/`wchar`. Procfs has no "other operation" count; the "other"
/// byte total is the amount of writeback cancelled by truncation.
pub fn parse_proc_io(text: &str) -> Option<IoCounters> {
    let mut io = IoCounters::default();
    let mut seen = false;
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(value) = value.trim().parse::<u64>() else {
            continue;
        };
        let slot = match key.trim() {
            "syscr" => &mut io.read_operation_count,
            "syscw" => &mut io.write_operation_count,
            "rchar" => &mut io.read_transfer_count,
            "wchar" => &mut io.write_transfer_count,
            "cancelled_write_bytes" => &mut io.other_transfer_count,
            _ => continue,
        };
        *slot = value;
        seen = true;
    }
    seen.then_some(io)
}

/// Read an open `/proc/<pid>/io` handle from offset 0 into a stack buffer
/// and parse it. Procfs regenerates the contents on every positioned read,
/// so one handle serves every call.
pub fn read_proc_io(file: &File) -> Option<IoCounters> {
    let mut buf = [0u8; PROC_IO_BUF];
    let mut len = 0;
    while len < buf.len() {
        match file.read_at(&mut buf[len..], len as u64) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => return None,
        }
    }
    let text = std::str::from_utf8(&buf[..len]).ok()?;
    parse_proc_io(text)
}

/// Handle to `/proc/self/io`, opened on first use and kept for the life of
/// the process.
fn proc_self_io() -> Option<&'static File> {
    static FILE: OnceLock<Option<File>> = OnceLock::new();
    FILE.get_or_init(|| File::open(PROC_SELF_IO).ok()).as_ref()
}

/// Task I/O accounting can be compiled out or hidden inside containers;
/// fall back to `getrusage` block counts when it is.
pub fn io_counters() -> Option<IoCounters> {
    proc_self_io()
        .and_then(read_proc_io)
        .or_else(unix::io_counters)
}

// ---------------------------------------------------------------------------
// /proc/self/status
// ---------------------------------------------------------------------------

fn parse_kib(value: &str) -> Option<usize> {
    let kib = value.split_whitespace().next()?.parse::<usize>().ok()?;
    Some(kib.saturating_mul(1024))
}

/// Parse the `Vm*` lines of `/proc/self/status` into the size fields.
///
/// Mapping: `VmHWM`/`VmRSS` are the peak and current working set,
/// `VmPeak`/`VmSize` the peak and current pageable address space,
/// `VmLck`/`VmPin` the non-pageable memory, `VmSwap` the pagefile usage.
/// Linux keeps no peak swap figure, so `peak_pagefile_usage` stays zero.
pub fn parse_proc_status(text: &str) -> Option<MemoryCounters> {
    let mut mem = MemoryCounters::default();
    let mut seen = false;
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let slot = match key {
            "VmHWM" => &mut mem.peak_working_set_size,
            "VmRSS" => &mut mem.working_set_size,
            "VmPeak" => &mut mem.quota_peak_paged_pool_usage,
            "VmSize" => &mut mem.quota_paged_pool_usage,
            "VmLck" => &mut mem.quota_peak_non_paged_pool_usage,
            "VmPin" => &mut mem.quota_non_paged_pool_usage,
            "VmSwap" => &mut mem.pagefile_usage,
            _ => continue,
        };
        if let Some(bytes) = parse_kib(value) {
            *slot = bytes;
            seen = true;
        }
    }
    seen.then_some(mem)
}

pub fn memory_counters() -> Option<MemoryCounters> {
    let status = std::fs::read_to_string(PROC_SELF_STATUS)
        .ok()
        .and_then(|text| parse_proc_status(&text));
    let usage = unix::rusage();

    match (status, usage) {
        (Some(mut mem), Some(usage)) => {
            mem.page_fault_count = unix::page_faults(&usage);
            Some(mem)
        }
        (Some(mem), None) => Some(mem),
        (None, _) => unix::memory_counters(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_IO: &str = "rchar: 4096\n\
                             wchar: 128\n\
                             syscr: 12\n\
                             syscw: 3\n\
                             read_bytes: 0\n\
                             write_bytes: 0\n\
                             cancelled_write_bytes: 7\n";

    const SAMPLE_STATUS: &str = "Name:\tmrrng\n\
                                 VmPeak:\t   10000 kB\n\
                                 VmSize:\t    9000 kB\n\
                                 VmLck:\t       0 kB\n\
                                 VmPin:\t       0 kB\n\
                                 VmHWM:\t    2000 kB\n\
                                 VmRSS:\t    1500 kB\n\
                                 VmSwap:\t       4 kB\n\
                                 Threads:\t1\n";

    #[test]
    fn proc_io_maps_fields() {
        let io = parse_proc_io(SAMPLE_IO).unwrap();
        assert_eq!(io.read_operation_count, 12);
        assert_eq!(io.write_operation_count, 3);
        assert_eq!(io.other_operation_count, 0);
        assert_eq!(io.read_transfer_count, 4096);
        assert_eq!(io.write_transfer_count, 128);
        assert_eq!(io.other_transfer_count, 7);
    }

    #[test]
    fn proc_io_rejects_garbage() {
        assert!(parse_proc_io("").is_none());
        assert!(parse_proc_io("nothing useful here").is_none());
    }

    #[test]
    fn proc_io_reads_from_open_handle_repeatedly() {
        use std::io::Write;

        let mut file = tempfile::tempfile().unwrap();
        file.write_all(SAMPLE_IO.as_bytes()).unwrap();

        // The cursor sits at the end after writing; positioned reads ignore it.
        let first = read_proc_io(&file).unwrap();
        let second = read_proc_io(&file).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, parse_proc_io(SAMPLE_IO).unwrap());
    }

    #[test]
    fn proc_io_truncates_oversized_contents() {
        use std::io::Write;

        let mut file = tempfile::tempfile().unwrap();
        let mut text = String::from("syscr: 5\n");
        text.push_str(&"x".repeat(PROC_IO_BUF * 2));
        file.write_all(text.as_bytes()).unwrap();

        let io = read_proc_io(&file).unwrap();
        assert_eq!(io.read_operation_count, 5);
    }

    #[test]
    fn live_io_counters_reuse_one_handle() {
        let Some(first) = proc_self_io() else {
            return;
        };
        let second = proc_self_io().unwrap();
        assert!(std::ptr::eq(first, second));
        if let (Some(a), Some(b)) = (io_counters(), io_counters()) {
            assert!(b.read_transfer_count >= a.read_transfer_count);
        }
    }

    #[test]
    fn proc_status_maps_fields_to_bytes() {
        let mem = parse_proc_status(SAMPLE_STATUS).unwrap();
        assert_eq!(mem.page_fault_count, 0);
        assert_eq!(mem.peak_working_set_size, 2000 * 1024);
        assert_eq!(mem.working_set_size, 1500 * 1024);
        assert_eq!(mem.quota_peak_paged_pool_usage, 10000 * 1024);
        assert_eq!(mem.quota_paged_pool_usage, 9000 * 1024);
        assert_eq!(mem.quota_peak_non_paged_pool_usage, 0);
        assert_eq!(mem.pagefile_usage, 4 * 1024);
        assert_eq!(mem.peak_pagefile_usage, 0);
    }

    #[test]
    fn live_memory_counters_have_working_set() {
        if let Some(mem) = memory_counters() {
            assert!(mem.sizes().iter().any(|&s| s > 0) || mem.page_fault_count > 0);
        }
    }
}
