use alloc::alloc::{alloc, dealloc};
use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::ptr::NonNull;

use log::trace;

use super::{AllocError, Heap};

/// The alignment of the region backing every [`FixedHeap`]
pub const MIN_ALIGN: usize = 16;

/// A bump allocator over a single region obtained from the global allocator.
///
/// The region never grows. When it is full, allocations fail and the owner is
/// expected to move on to a new heap.
pub struct FixedHeap {
    base: NonNull<u8>,
    size: usize,
    layout: Layout,
    top: Cell<*mut u8>,
}
impl FixedHeap {
    /// Allocates a new heap able to hold `size` bytes
    pub fn new(size: usize) -> Result<Self, AllocError> {
        let layout =
            Layout::from_size_align(size.max(MIN_ALIGN), MIN_ALIGN).map_err(|_| AllocError)?;
        let base = NonNull::new(unsafe { alloc(layout) }).ok_or(AllocError)?;
        trace!(target: "gc", "created heap of {} bytes at {:p}", size, base);
        Ok(Self {
            base,
            size,
            layout,
            top: Cell::new(base.as_ptr()),
        })
    }
}
impl fmt::Debug for FixedHeap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FixedHeap")
            .field("start", &self.heap_start())
            .field("used", &self.heap_used())
            .field("size", &self.size)
            .finish()
    }
}
impl Drop for FixedHeap {
    fn drop(&mut self) {
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}
impl Heap for FixedHeap {
    #[inline]
    fn heap_start(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    #[inline]
    fn heap_top(&self) -> *mut u8 {
        self.top.get()
    }

    #[inline]
    fn heap_end(&self) -> *mut u8 {
        unsafe { self.base.as_ptr().add(self.size) }
    }

    #[inline(always)]
    fn heap_size(&self) -> usize {
        self.size
    }

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let top = self.top.get();
        let available = self.heap_available();

        // Calculate the base pointer of the allocation at the desired alignment,
        // then make sure the allocation still fits between it and the end
        let offset = top.align_offset(layout.align());
        if offset > available || layout.size() > available - offset {
            return Err(AllocError);
        }

        unsafe {
            let base = top.add(offset);
            self.top.set(base.add(layout.size()));
            Ok(NonNull::new_unchecked(base))
        }
    }
}
