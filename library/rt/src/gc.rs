//! The contract between primitives that allocate and the host that owns the heap.
//!
//! Primitives never collect on their own: when the heap is full they hand the
//! host a [`RootSet`] naming every block they still need, and the host is free
//! to move those blocks as long as it rewrites the roots to match.
use alloc::alloc::handle_alloc_error;
use core::alloc::Layout;
use core::ops::AddAssign;
use core::ptr::NonNull;

use ember_alloc::heap::{AllocError, Heap};
use log::trace;
use smallvec::SmallVec;

use crate::term::{Header, OpaqueTerm};

/// The locations of live terms which must be updated if their blocks move
#[derive(Default)]
pub struct RootSet(SmallVec<[*mut OpaqueTerm; 4]>);
impl RootSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = *mut OpaqueTerm> + '_ {
        self.0.iter().copied()
    }
}
impl AddAssign<*mut OpaqueTerm> for RootSet {
    #[inline]
    fn add_assign(&mut self, root: *mut OpaqueTerm) {
        self.0.push(root);
    }
}

/// Implemented by anything primitives can allocate through
pub trait Mutator {
    /// The heap new blocks are allocated on
    fn heap(&self) -> &dyn Heap;

    /// Makes room for at least `needed` on the heap returned by [`Mutator::heap`].
    ///
    /// Any block may be moved in the process; each term named in `roots` must be
    /// rewritten to point to the new location of its block. Blocks which are not
    /// reachable from `roots` may be discarded.
    fn garbage_collect(&mut self, needed: Layout, roots: RootSet) -> Result<(), AllocError>;
}

/// Returns the layout of a block of `wosize` fields plus its header
pub fn block_layout(wosize: usize) -> Layout {
    match wosize.checked_add(1).map(Layout::array::<OpaqueTerm>) {
        Some(Ok(layout)) => layout,
        _ => panic!("a block of {} words exceeds the address space", wosize),
    }
}

/// Allocates a block described by `header`, collecting if the heap is full.
///
/// The header is written, the fields are left uninitialized. The returned
/// pointer is to the first field, which is how blocks are referenced by terms.
///
/// If the heap still has no room once the mutator has collected, this ends in
/// [`handle_alloc_error`].
pub fn alloc_block<M>(mutator: &mut M, header: Header, roots: RootSet) -> NonNull<OpaqueTerm>
where
    M: ?Sized + Mutator,
{
    let layout = block_layout(header.wosize());
    let allocated = mutator.heap().allocate(layout);
    let block = match allocated {
        Ok(block) => block,
        Err(_) => {
            trace!(
                target: "gc",
                "heap full, collecting for {} bytes with {} roots",
                layout.size(),
                roots.len()
            );
            if mutator.garbage_collect(layout, roots).is_err() {
                handle_alloc_error(layout);
            }
            match mutator.heap().allocate(layout) {
                Ok(block) => block,
                Err(_) => handle_alloc_error(layout),
            }
        }
    };

    unsafe {
        let block = block.cast::<Header>();
        block.as_ptr().write(header);
        NonNull::new_unchecked(block.as_ptr().add(1).cast::<OpaqueTerm>())
    }
}
