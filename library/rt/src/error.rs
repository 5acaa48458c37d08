use core::fmt;

/// The class of exception raised by a primitive
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// A well-formed request which could not be carried out
    Failure,
    /// An argument outside the domain of the primitive
    InvalidArgument,
}

/// An exception to be raised in managed code.
///
/// The tag names the primitive which failed, and is the payload managed code
/// sees, e.g. `Failure "float_of_string"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Exception {
    pub kind: ExceptionKind,
    pub tag: &'static str,
}
impl Exception {
    #[inline]
    pub const fn failure(tag: &'static str) -> Self {
        Self {
            kind: ExceptionKind::Failure,
            tag,
        }
    }

    #[inline]
    pub const fn invalid_argument(tag: &'static str) -> Self {
        Self {
            kind: ExceptionKind::InvalidArgument,
            tag,
        }
    }
}
impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ExceptionKind::Failure => write!(f, "Failure {:?}", self.tag),
            ExceptionKind::InvalidArgument => write!(f, "Invalid_argument {:?}", self.tag),
        }
    }
}
#[cfg(feature = "std")]
impl std::error::Error for Exception {}
