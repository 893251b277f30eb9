//! Win32 backend: the native process, thread and pointer queries.

use windows_sys::Win32::Foundation::{FILETIME, POINT};
use windows_sys::Win32::System::Performance::QueryPerformanceCounter;
use windows_sys::Win32::System::ProcessStatus::{K32GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};
use windows_sys::Win32::System::SystemInformation::GetSystemTimeAsFileTime;
use windows_sys::Win32::System::Threading::{
    GetCurrentProcess, GetCurrentThread, GetProcessIoCounters, IO_COUNTERS, QueryProcessCycleTime,
    QueryThreadCycleTime,
};
use windows_sys::Win32::UI::WindowsAndMessaging::GetCursorPos;

use super::{CursorPosition, IoCounters, MemoryCounters};

pub const BACKEND: &str = "win32";

pub fn system_time() -> Option<u64> {
    let mut ft = FILETIME {
        dwLowDateTime: 0,
        dwHighDateTime: 0,
    };
    // SAFETY: `ft` is a valid, writable FILETIME.
    unsafe { GetSystemTimeAsFileTime(&mut ft) };
    Some(((ft.dwHighDateTime as u64) << 32) | ft.dwLowDateTime as u64)
}

pub fn performance_counter() -> Option<i64> {
    let mut count = 0i64;
    // SAFETY: `count` is a valid, writable i64.
    let ok = unsafe { QueryPerformanceCounter(&mut count) };
    (ok != 0).then_some(count)
}

pub fn io_counters() -> Option<IoCounters> {
    // SAFETY: IO_COUNTERS is plain old data; all-zero is a valid bit pattern.
    let mut io: IO_COUNTERS = unsafe { std::mem::zeroed() };
    // SAFETY: the pseudo-handle of the current process is always valid and
    // `io` is a writable IO_COUNTERS.
    let ok = unsafe { GetProcessIoCounters(GetCurrentProcess(), &mut io) };
    if ok == 0 {
        return None;
    }
    Some(IoCounters {
        read_operation_count: io.ReadOperationCount,
        write_operation_count: io.WriteOperationCount,
        other_operation_count: io.OtherOperationCount,
        read_transfer_count: io.ReadTransferCount,
        write_transfer_count: io.WriteTransferCount,
        other_transfer_count: io.OtherTransferCount,
    })
}

pub fn memory_counters() -> Option<MemoryCounters> {
    // SAFETY: PROCESS_MEMORY_COUNTERS is plain old data.
    let mut pmc: PROCESS_MEMORY_COUNTERS = unsafe { std::mem::zeroed() };
    let size = std::mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32;
    pmc.cb = size;
    // SAFETY: `pmc` is a writable buffer of `size` bytes.
    let ok = unsafe { K32GetProcessMemoryInfo(GetCurrentProcess(), &mut pmc, size) };
    if ok == 0 {
        return None;
    }
    Some(MemoryCounters {
        page_fault_count: pmc.PageFaultCount,
        peak_working_set_size: pmc.PeakWorkingSetSize,
        working_set_size: pmc.WorkingSetSize,
        quota_peak_paged_pool_usage: pmc.QuotaPeakPagedPoolUsage,
        quota_paged_pool_usage: pmc.QuotaPagedPoolUsage,
        quota_peak_non_paged_pool_usage: pmc.QuotaPeakNonPagedPoolUsage,
        quota_non_paged_pool_usage: pmc.QuotaNonPagedPoolUsage,
        pagefile_usage: pmc.PagefileUsage,
        peak_pagefile_usage: pmc.PeakPagefileUsage,
    })
}

pub fn cursor_position() -> Option<CursorPosition> {
    let mut point = POINT { x: 0, y: 0 };
    // SAFETY: `point` is a valid, writable POINT.
    let ok = unsafe { GetCursorPos(&mut point) };
    (ok != 0).then_some(CursorPosition {
        x: point.x,
        y: point.y,
    })
}

pub fn thread_cycle_time() -> Option<u64> {
    let mut cycles = 0u64;
    // SAFETY: the current-thread pseudo-handle is always valid.
    let ok = unsafe { QueryThreadCycleTime(GetCurrentThread(), &mut cycles) };
    (ok != 0).then_some(cycles)
}

pub fn process_cycle_time() -> Option<u64> {
    let mut cycles = 0u64;
    // SAFETY: the current-process pseudo-handle is always valid.
    let ok = unsafe { QueryProcessCycleTime(GetCurrentProcess(), &mut cycles) };
    (ok != 0).then_some(cycles)
}
