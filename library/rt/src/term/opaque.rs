//! Terms are a single machine word, and are either an immediate integer or a
//! pointer to a heap block:
//!
//! * An integer `n` is encoded as `(n << 1) | 1`, so the low bit is always set.
//! Booleans and unit are the integers `0` (`false`, `()`) and `1` (`true`).
//! * Any word with the low bit clear is a pointer to the first field of a
//! block. The block's [`Header`] is the word right before that field, which is
//! why blocks can be inspected without knowing their type in advance.
//!
//! Blocks are word-aligned, so a block pointer never has its low bit set.
use core::fmt;
use core::mem;
use core::ptr::NonNull;

use static_assertions::const_assert_eq;

use super::{float, Header, Tag};

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct OpaqueTerm(usize);

const_assert_eq!(mem::size_of::<OpaqueTerm>(), mem::size_of::<usize>());

impl OpaqueTerm {
    const INT_TAG: usize = 1;

    /// The largest integer which can be represented as an immediate
    pub const MAX_INT: isize = isize::MAX >> 1;
    /// The smallest integer which can be represented as an immediate
    pub const MIN_INT: isize = isize::MIN >> 1;

    pub const FALSE: Self = Self::from_int(0);
    pub const TRUE: Self = Self::from_int(1);

    /// Encodes `n` as an immediate.
    ///
    /// Integers outside `MIN_INT..=MAX_INT` lose their most significant bit.
    #[inline]
    pub const fn from_int(n: isize) -> Self {
        Self(((n as usize) << 1) | Self::INT_TAG)
    }

    #[inline(always)]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Builds a term pointing at the first field of a block
    #[inline]
    pub fn from_block(fields: NonNull<OpaqueTerm>) -> Self {
        let raw = fields.as_ptr() as usize;
        debug_assert_eq!(raw & Self::INT_TAG, 0);
        Self(raw)
    }

    #[inline(always)]
    pub const fn is_int(self) -> bool {
        self.0 & Self::INT_TAG == Self::INT_TAG
    }

    #[inline(always)]
    pub const fn is_block(self) -> bool {
        !self.is_int()
    }

    #[inline]
    pub const fn as_int(self) -> Option<isize> {
        if self.is_int() {
            Some((self.0 as isize) >> 1)
        } else {
            None
        }
    }

    #[inline]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::TRUE => Some(true),
            Self::FALSE => Some(false),
            _ => None,
        }
    }

    /// Returns a pointer to the first field of the block this term points to
    #[inline]
    pub fn as_block(self) -> Option<NonNull<OpaqueTerm>> {
        if self.is_block() {
            NonNull::new(self.0 as *mut OpaqueTerm)
        } else {
            None
        }
    }

    /// Reads the header of the block this term points to.
    ///
    /// # Safety
    ///
    /// The term must be an integer or point to a live block.
    #[inline]
    pub unsafe fn header(self) -> Option<Header> {
        let fields = self.as_block()?;
        Some(fields.as_ptr().cast::<Header>().sub(1).read())
    }

    /// Returns true if this term points to a block tagged `Tag::Double`
    #[inline]
    pub fn is_double(self) -> bool {
        unsafe { self.header() }.map_or(false, |header| header.is(Tag::Double))
    }

    /// Returns the value of a boxed double, or `None` if this term is anything else
    pub fn as_double(self) -> Option<f64> {
        let header = unsafe { self.header()? };
        if !header.is(Tag::Double) || header.wosize() != float::DOUBLE_WOSIZE {
            return None;
        }
        let fields = self.as_block()?;
        Some(unsafe { float::load(fields) })
    }
}
impl From<bool> for OpaqueTerm {
    #[inline]
    fn from(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}
impl fmt::Debug for OpaqueTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_int() {
            Some(n) => write!(f, "OpaqueTerm::Int({})", n),
            None => write!(f, "OpaqueTerm::Block({:#x})", self.0),
        }
    }
}
