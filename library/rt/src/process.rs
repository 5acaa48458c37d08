use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt;
use core::mem;

use ember_alloc::heap::{AllocError, FixedHeap, Heap};
use log::{debug, trace};

use crate::gc::{Mutator, RootSet};

/// Sizing parameters for the heaps of a [`Process`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Size in words of the first heap
    pub min_heap_size: usize,
    /// Each new heap is at least this many times larger than the one it replaces
    pub growth_factor: usize,
}
impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            min_heap_size: 233,
            growth_factor: 2,
        }
    }
}

/// The default host for primitives.
///
/// A process never moves blocks. When its heap fills up, the heap is retired,
/// staying alive for as long as the process does so that every term handed out
/// remains valid, and allocation continues on a fresh, larger heap.
///
/// Nothing is ever reclaimed: the memory held by a process only grows until it
/// is dropped, see [`Process::total_heap_used`].
pub struct Process {
    heap: FixedHeap,
    retired: Vec<FixedHeap>,
    options: ProcessOptions,
}
impl Process {
    pub fn new(options: ProcessOptions) -> Result<Self, AllocError> {
        let heap = FixedHeap::new(words_to_bytes(options.min_heap_size.max(1))?)?;
        debug!(target: "process", "spawned process with a heap of {} bytes", heap.heap_size());
        Ok(Self {
            heap,
            retired: Vec::new(),
            options,
        })
    }

    #[inline]
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Returns the number of heaps which have filled up so far
    #[inline]
    pub fn retired_heaps(&self) -> usize {
        self.retired.len()
    }

    /// Returns the number of bytes allocated across all heaps of this process
    pub fn total_heap_used(&self) -> usize {
        self.retired
            .iter()
            .map(|heap| heap.heap_used())
            .sum::<usize>()
            + self.heap.heap_used()
    }
}
impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Process")
            .field("heap", &self.heap)
            .field("retired", &self.retired.len())
            .field("options", &self.options)
            .finish()
    }
}
impl Mutator for Process {
    #[inline]
    fn heap(&self) -> &dyn Heap {
        &self.heap
    }

    fn garbage_collect(&mut self, needed: Layout, _roots: RootSet) -> Result<(), AllocError> {
        let grown = self
            .heap
            .heap_size()
            .saturating_mul(self.options.growth_factor.max(1));
        let size = grown
            .max(needed.size().saturating_add(needed.align()))
            .max(words_to_bytes(self.options.min_heap_size)?);
        let heap = FixedHeap::new(size)?;
        trace!(
            target: "process",
            "retiring heap with {} bytes used, continuing on a heap of {} bytes",
            self.heap.heap_used(),
            size
        );
        let full = mem::replace(&mut self.heap, heap);
        self.retired.push(full);
        Ok(())
    }
}

fn words_to_bytes(words: usize) -> Result<usize, AllocError> {
    words
        .checked_mul(mem::size_of::<usize>())
        .ok_or(AllocError)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::gc::alloc_block;
    use crate::term::{Header, OpaqueTerm, Tag};

    #[test]
    fn default_options() {
        let process = Process::new(ProcessOptions::default()).unwrap();
        assert_eq!(process.heap().heap_size(), 233 * mem::size_of::<usize>());
        assert_eq!(process.retired_heaps(), 0);
    }

    #[test]
    fn full_heap_is_retired_not_freed() {
        let options = ProcessOptions {
            min_heap_size: 4,
            growth_factor: 2,
        };
        let mut process = Process::new(options).unwrap();
        let first = alloc_block(&mut process, Header::new(Tag::Tuple, 2), RootSet::default());
        unsafe {
            first.as_ptr().write(OpaqueTerm::from_int(1));
            first.as_ptr().add(1).write(OpaqueTerm::from_int(2));
        }

        // Does not fit in the remaining word
        let second = alloc_block(&mut process, Header::new(Tag::Tuple, 1), RootSet::default());
        assert_eq!(process.retired_heaps(), 1);
        assert_eq!(process.heap().heap_size(), 8 * mem::size_of::<usize>());
        assert!(process.heap().contains(second.as_ptr() as *const ()));

        let first = OpaqueTerm::from_block(first);
        assert_eq!(unsafe { first.header() }.map(|h| h.wosize()), Some(2));
        assert_eq!(unsafe { first.as_block().unwrap().as_ptr().read() }, OpaqueTerm::from_int(1));
        assert_eq!(process.total_heap_used(), 5 * mem::size_of::<usize>());
    }

    #[test]
    fn oversized_blocks_get_a_heap_that_fits() {
        let options = ProcessOptions {
            min_heap_size: 2,
            growth_factor: 2,
        };
        let mut process = Process::new(options).unwrap();
        let block = alloc_block(&mut process, Header::new(Tag::Tuple, 100), RootSet::default());
        assert!(process.heap().contains(block.as_ptr() as *const ()));
        assert!(process.heap().heap_size() >= 101 * mem::size_of::<usize>());
    }
}
