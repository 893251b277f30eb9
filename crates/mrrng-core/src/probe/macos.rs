//! macOS backend: Mach absolute time for the performance counter,
//! `proc_pidinfo` task info for memory, CoreGraphics for the pointer.

use super::unix;
use super::{CursorPosition, MemoryCounters};

pub use super::unix::{io_counters, process_cycle_time, system_time, thread_cycle_time};

pub const BACKEND: &str = "macos";

pub fn performance_counter() -> Option<i64> {
    unsafe extern "C" {
        fn mach_absolute_time() -> u64;
    }
    // SAFETY: mach_absolute_time() reads the system absolute time counter
    // and has no preconditions.
    Some(unsafe { mach_absolute_time() } as i64)
}

fn task_info() -> Option<libc::proc_taskinfo> {
    // SAFETY: proc_taskinfo is plain old data; all-zero is a valid bit pattern.
    let mut info: libc::proc_taskinfo = unsafe { std::mem::zeroed() };
    let size = std::mem::size_of::<libc::proc_taskinfo>() as libc::c_int;
    // SAFETY: `info` is a writable buffer of exactly `size` bytes.
    let written = unsafe {
        libc::proc_pidinfo(
            libc::getpid(),
            libc::PROC_PIDTASKINFO,
            0,
            &mut info as *mut libc::proc_taskinfo as *mut libc::c_void,
            size,
        )
    };
    (written == size).then_some(info)
}

/// Task info supplies fault count, resident and virtual size; the peak
/// working set comes from `getrusage`.
pub fn memory_counters() -> Option<MemoryCounters> {
    let Some(info) = task_info() else {
        return unix::memory_counters();
    };
    let peak = unix::rusage()
        .map(|usage| unix::peak_rss_bytes(&usage))
        .unwrap_or(0);
    Some(MemoryCounters {
        page_fault_count: info.pti_faults as u32,
        peak_working_set_size: peak,
        working_set_size: info.pti_resident_size as usize,
        quota_paged_pool_usage: info.pti_virtual_size as usize,
        ..Default::default()
    })
}

#[repr(C)]
#[derive(Clone, Copy)]
struct CGPoint {
    x: f64,
    y: f64,
}

type CGEventRef = *mut libc::c_void;

unsafe extern "C" {
    fn CGEventCreate(source: *const libc::c_void) -> CGEventRef;
    fn CGEventGetLocation(event: CGEventRef) -> CGPoint;
    fn CFRelease(cf: *const libc::c_void);
}

/// Current pointer location in global display coordinates.
pub fn cursor_position() -> Option<CursorPosition> {
    // SAFETY: a null event source is documented as valid; the returned event
    // is released before leaving the block.
    let point = unsafe {
        let event = CGEventCreate(std::ptr::null());
        if event.is_null() {
            return None;
        }
        let point = CGEventGetLocation(event);
        CFRelease(event as *const libc::c_void);
        point
    };
    Some(CursorPosition {
        x: point.x as i32,
        y: point.y as i32,
    })
}
