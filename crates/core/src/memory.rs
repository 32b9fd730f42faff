//! Heap usage tracking for memory-aware measurements
//!
//! [`PeakAllocator`] wraps the system allocator and keeps two counters: the
//! bytes currently live and the highest value that count reached since the
//! last [`MemoryProbe::mark`]. Binaries install it with
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: algo_lab_core::PeakAllocator = algo_lab_core::PeakAllocator::new();
//! ```
//!
//! and hand `&ALLOC` to the harness.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Baseline captured right before a measured run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMark {
    baseline: usize,
}

impl MemoryMark {
    /// Live bytes when the mark was taken
    pub fn baseline(&self) -> usize {
        self.baseline
    }
}

/// Something that can report peak heap usage between two points in time
pub trait MemoryProbe: Sync {
    /// Reset the peak to the current usage and remember it as the baseline
    fn mark(&self) -> MemoryMark;

    /// Peak bytes allocated above the baseline since `mark`
    fn peak_since(&self, mark: &MemoryMark) -> usize;
}

/// Global allocator that tracks live and peak heap bytes
pub struct PeakAllocator {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl PeakAllocator {
    pub const fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Bytes currently allocated through this allocator
    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    fn grow(&self, bytes: usize) {
        let now = self.current.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.peak.fetch_max(now, Ordering::Relaxed);
    }

    fn shrink(&self, bytes: usize) {
        self.current.fetch_sub(bytes, Ordering::Relaxed);
    }
}

impl Default for PeakAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for PeakAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            self.grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            self.grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        self.shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size > old_size {
                self.grow(new_size - old_size);
            } else {
                self.shrink(old_size - new_size);
            }
        }
        new_ptr
    }
}

impl MemoryProbe for PeakAllocator {
    fn mark(&self) -> MemoryMark {
        let baseline = self.current.load(Ordering::Relaxed);
        self.peak.store(baseline, Ordering::Relaxed);
        MemoryMark { baseline }
    }

    fn peak_since(&self, mark: &MemoryMark) -> usize {
        self.peak.load(Ordering::Relaxed).saturating_sub(mark.baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Drives the allocator directly; it is not installed as the global one here.
    #[test]
    fn test_peak_tracks_high_water_mark() {
        let alloc = PeakAllocator::new();
        let mark = alloc.mark();

        unsafe {
            let big = Layout::from_size_align(4096, 8).unwrap();
            let small = Layout::from_size_align(128, 8).unwrap();

            let a = alloc.alloc(big);
            let b = alloc.alloc(small);
            assert_eq!(alloc.current(), 4096 + 128);

            alloc.dealloc(a, big);
            alloc.dealloc(b, small);
        }

        assert_eq!(alloc.current(), 0);
        assert_eq!(alloc.peak_since(&mark), 4096 + 128);
    }

    #[test]
    fn test_mark_resets_peak() {
        let alloc = PeakAllocator::new();

        unsafe {
            let layout = Layout::from_size_align(1024, 8).unwrap();
            let ptr = alloc.alloc(layout);
            alloc.dealloc(ptr, layout);
        }

        let mark = alloc.mark();
        assert_eq!(mark.baseline(), 0);
        assert_eq!(alloc.peak_since(&mark), 0);
    }

    #[test]
    fn test_realloc_adjusts_counters() {
        let alloc = PeakAllocator::new();
        let mark = alloc.mark();

        unsafe {
            let layout = Layout::from_size_align(64, 8).unwrap();
            let ptr = alloc.alloc(layout);
            let ptr = alloc.realloc(ptr, layout, 256);
            assert_eq!(alloc.current(), 256);

            let grown = Layout::from_size_align(256, 8).unwrap();
            let ptr = alloc.realloc(ptr, grown, 32);
            assert_eq!(alloc.current(), 32);

            alloc.dealloc(ptr, Layout::from_size_align(32, 8).unwrap());
        }

        assert_eq!(alloc.peak_since(&mark), 256);
    }
}
