use core::ptr::NonNull;
use core::slice;

use crate::gc::{self, Mutator, RootSet};

use super::{Header, OpaqueTerm, Tag};

/// A borrowed view of a tuple block
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tuple {
    fields: NonNull<OpaqueTerm>,
    len: usize,
}
impl Tuple {
    /// Allocates a tuple holding `elements`.
    ///
    /// Block elements are rooted for the duration of the allocation, so the
    /// slice may have been rewritten by a collection once this returns; the
    /// tuple always holds the up to date values.
    pub fn alloc<M>(mutator: &mut M, elements: &mut [OpaqueTerm]) -> OpaqueTerm
    where
        M: ?Sized + Mutator,
    {
        let mut roots = RootSet::default();
        for element in elements.iter_mut().filter(|element| element.is_block()) {
            roots += element as *mut OpaqueTerm;
        }

        let fields = gc::alloc_block(mutator, Header::new(Tag::Tuple, elements.len()), roots);
        unsafe {
            fields
                .as_ptr()
                .copy_from_nonoverlapping(elements.as_ptr(), elements.len());
        }
        OpaqueTerm::from_block(fields)
    }

    /// Returns a view of `term` if it points to a tuple
    pub fn from_term(term: OpaqueTerm) -> Option<Self> {
        let header = unsafe { term.header()? };
        if !header.is(Tag::Tuple) {
            return None;
        }
        Some(Self {
            fields: term.as_block()?,
            len: header.wosize(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<OpaqueTerm> {
        self.as_slice().get(index).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[OpaqueTerm] {
        unsafe { slice::from_raw_parts(self.fields.as_ptr(), self.len) }
    }
}
