mod format;
pub mod math;
mod parse;
pub mod words;

pub use self::format::{
    buffer_capacity, format_float, Conversion, FormatError, FormatFlags, FormatSpec, MAX_DIGITS,
    MAX_FIELD,
};
pub use self::math::{FloatMath, Math, Soft};
#[cfg(feature = "std")]
pub use self::math::Hosted;
pub use self::parse::{parse, ParseFloatError, PARSE_BUFFER_SIZE};

use core::cmp::Ordering;
use core::fmt;
use core::num::FpCategory;

const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const MANTISSA_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;

/// The IEEE-754 class of a double.
///
/// The discriminants are the codes handed back to managed code by
/// `classify_float`, so their order is part of the runtime ABI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FloatClass {
    Normal = 0,
    Subnormal = 1,
    Zero = 2,
    Infinite = 3,
    Nan = 4,
}
impl FloatClass {
    /// Returns the integer code of this class
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}
impl From<FpCategory> for FloatClass {
    fn from(category: FpCategory) -> Self {
        match category {
            FpCategory::Nan => Self::Nan,
            FpCategory::Infinite => Self::Infinite,
            FpCategory::Zero => Self::Zero,
            FpCategory::Subnormal => Self::Subnormal,
            FpCategory::Normal => Self::Normal,
        }
    }
}
impl fmt::Display for FloatClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Subnormal => f.write_str("subnormal"),
            Self::Zero => f.write_str("zero"),
            Self::Infinite => f.write_str("infinite"),
            Self::Nan => f.write_str("nan"),
        }
    }
}

/// Classifies `d` by inspecting its exponent and mantissa fields directly.
///
/// The sign bit is ignored, so `-0.0` is `Zero` and `-inf` is `Infinite`.
pub fn classify(d: f64) -> FloatClass {
    let bits = d.to_bits();
    let exponent = bits & EXPONENT_MASK;
    let mantissa = bits & MANTISSA_MASK;
    match (exponent, mantissa) {
        (0, 0) => FloatClass::Zero,
        (0, _) => FloatClass::Subnormal,
        (EXPONENT_MASK, 0) => FloatClass::Infinite,
        (EXPONENT_MASK, _) => FloatClass::Nan,
        _ => FloatClass::Normal,
    }
}

/// Three-way comparison used by the runtime to sort floats.
///
/// Ordered operands compare as usual. If either operand is NaN the result is
/// `Equal`: NaNs are equal to each other and are neither less nor greater
/// than any other float.
pub fn compare(f: f64, g: f64) -> Ordering {
    if f == g {
        Ordering::Equal
    } else if f < g {
        Ordering::Less
    } else if f > g {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
