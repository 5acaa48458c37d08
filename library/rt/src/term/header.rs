use core::fmt;
use core::mem;

use static_assertions::const_assert_eq;

/// The type of a heap block, stored in the low byte of its [`Header`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// A block of `wosize` terms
    Tuple = 0,
    /// A block holding the raw bits of one `f64`, never scanned as terms
    Double = 253,
}
impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Tuple),
            253 => Ok(Self::Double),
            other => Err(other),
        }
    }
}

/// The word preceding the fields of every heap block.
///
/// The low 8 bits hold the [`Tag`], the remaining bits hold the size of the
/// block in words, header excluded.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Header(usize);

const_assert_eq!(mem::size_of::<Header>(), mem::size_of::<usize>());

impl Header {
    const TAG_BITS: u32 = 8;
    const TAG_MASK: usize = (1 << Self::TAG_BITS) - 1;

    /// The largest block size that can be encoded in a header
    pub const MAX_WOSIZE: usize = usize::MAX >> Self::TAG_BITS;

    #[inline]
    pub const fn new(tag: Tag, wosize: usize) -> Self {
        debug_assert!(wosize <= Self::MAX_WOSIZE);
        Self((wosize << Self::TAG_BITS) | tag as usize)
    }

    #[inline(always)]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Returns the tag of this block, or `None` if the tag byte is not one we know
    #[inline]
    pub fn tag(self) -> Option<Tag> {
        Tag::try_from((self.0 & Self::TAG_MASK) as u8).ok()
    }

    #[inline]
    pub const fn wosize(self) -> usize {
        self.0 >> Self::TAG_BITS
    }

    #[inline]
    pub fn is(self, tag: Tag) -> bool {
        self.0 & Self::TAG_MASK == tag as usize
    }
}
impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "Header({:?}, {})", tag, self.wosize()),
            None => write!(f, "Header({:#x})", self.0),
        }
    }
}
