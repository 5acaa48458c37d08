mod fixed;

pub use self::fixed::{FixedHeap, MIN_ALIGN};

use core::alloc::Layout;
use core::fmt;
use core::ops::Range;
use core::ptr::NonNull;

/// The error returned when a heap has no room left for a requested layout
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AllocError;
impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("heap exhausted")
    }
}
#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

/// A `Heap` is a specialized allocator over a fixed-size region of memory.
///
/// Heaps are allocated and freed as a region, rather than in terms of individual
/// allocations, so there is no way to release a single block. Reclaiming space is
/// the job of whoever owns the heap, typically by evacuating live blocks into a
/// new one.
pub trait Heap {
    /// Returns the address of the first addressable byte of the heap.
    ///
    /// The pointer returned by `heap_start` is always lower than or equal to `heap_end`
    fn heap_start(&self) -> *mut u8;

    /// Returns the address of the first addressable byte of the heap which is free for allocation.
    ///
    /// On a new heap, this will return the same address as `heap_start`.
    /// If a heap was perfectly filled, this would return the same address as `heap_end`.
    fn heap_top(&self) -> *mut u8;

    /// Returns the address one byte past the addressable range of this heap.
    ///
    /// The pointer returned by this function should _never_ be dereferenced
    fn heap_end(&self) -> *mut u8;

    /// Allocates a block of memory described by `layout` at the top of the heap.
    ///
    /// The returned memory is uninitialized.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Returns a `Range` representing `heap_start..heap_top`
    #[inline]
    fn used_range(&self) -> Range<*mut u8> {
        self.heap_start()..self.heap_top()
    }

    /// Returns the total size in bytes of the addressable heap
    #[inline]
    fn heap_size(&self) -> usize {
        self.heap_end() as usize - self.heap_start() as usize
    }

    /// Returns the total size in bytes of allocated memory on this heap
    #[inline]
    fn heap_used(&self) -> usize {
        self.heap_top() as usize - self.heap_start() as usize
    }

    /// Returns the total size in bytes of unallocated memory on this heap
    #[inline]
    fn heap_available(&self) -> usize {
        self.heap_end() as usize - self.heap_top() as usize
    }

    /// Returns true if this heap contains the allocation pointed to by `ptr`
    #[inline]
    fn contains(&self, ptr: *const ()) -> bool {
        self.used_range().contains(&(ptr as *mut u8))
    }
}

impl<H> Heap for &H
where
    H: ?Sized + Heap,
{
    #[inline]
    fn heap_start(&self) -> *mut u8 {
        (**self).heap_start()
    }

    #[inline]
    fn heap_top(&self) -> *mut u8 {
        (**self).heap_top()
    }

    #[inline]
    fn heap_end(&self) -> *mut u8 {
        (**self).heap_end()
    }

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    fn heap_size(&self) -> usize {
        (**self).heap_size()
    }

    #[inline]
    fn heap_used(&self) -> usize {
        (**self).heap_used()
    }

    #[inline]
    fn heap_available(&self) -> usize {
        (**self).heap_available()
    }

    #[inline]
    fn contains(&self, ptr: *const ()) -> bool {
        (**self).contains(ptr)
    }
}
