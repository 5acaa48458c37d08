use core::fmt;
use core::str;

use log::trace;
use smallvec::SmallVec;

/// Inputs up to this many bytes are cleaned up without touching the heap
pub const PARSE_BUFFER_SIZE: usize = 64;

/// Digit-group separator accepted anywhere in numeric text, e.g. `1_000.5`
const SEPARATOR: u8 = b'_';

/// Binary exponent of the least significant bit of the smallest subnormal
const MIN_EXPONENT: i64 = -1074;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseFloatError {
    /// Nothing was left to parse once separators were removed
    Empty,
    /// The text is not a float, or has trailing characters after one
    Invalid,
}
impl fmt::Display for ParseFloatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no digits to parse"),
            Self::Invalid => write!(f, "could not parse string as float"),
        }
    }
}
#[cfg(feature = "std")]
impl std::error::Error for ParseFloatError {}

/// Parses `text` as a double.
///
/// Every `_` is removed first, then the remainder must be consumed entirely by
/// one of the following forms, after optional leading whitespace and sign:
///
/// * a decimal float, e.g. `3.14`, `.5`, `1e-3`, `2.`
/// * `inf`, `infinity` or `nan`, in any case
/// * a hexadecimal float, e.g. `0x1.8p3`, `0xff`
///
/// Trailing characters of any kind, whitespace included, are rejected.
pub fn parse(text: &[u8]) -> Result<f64, ParseFloatError> {
    let mut buffer: SmallVec<[u8; PARSE_BUFFER_SIZE]> = SmallVec::with_capacity(text.len());
    buffer.extend(text.iter().copied().filter(|&c| c != SEPARATOR));

    if buffer.is_empty() {
        trace!(target: "float", "no digits left to parse in {:?}", text);
        return Err(ParseFloatError::Empty);
    }

    match parse_cleaned(&buffer) {
        Some(value) => Ok(value),
        None => {
            trace!(target: "float", "could not parse {:?} as a float", text);
            Err(ParseFloatError::Invalid)
        }
    }
}

fn parse_cleaned(buffer: &[u8]) -> Option<f64> {
    let start = buffer.iter().position(|&c| !is_space(c))?;
    let text = &buffer[start..];

    let (negative, unsigned) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };

    match unsigned {
        [b'0', b'x' | b'X', digits @ ..] => {
            let value = parse_hex(digits)?;
            Some(if negative { -value } else { value })
        }
        _ => str::from_utf8(text).ok()?.parse::<f64>().ok(),
    }
}

/// Parses the part of a hexadecimal float following `0x`.
///
/// The binary exponent is optional. Significant digits are accumulated while
/// they fit in 64 bits; any further non-zero digit is folded into a sticky bit
/// so that the final conversion still rounds correctly.
fn parse_hex(text: &[u8]) -> Option<f64> {
    let mut mantissa: u64 = 0;
    let mut exponent: i64 = 0;
    let mut sticky = false;
    let mut seen_digit = false;
    let mut seen_point = false;

    let mut consumed = 0;
    for &c in text {
        match c {
            b'.' if !seen_point => seen_point = true,
            _ => {
                let Some(digit) = (c as char).to_digit(16) else {
                    break;
                };
                seen_digit = true;
                if mantissa >> 60 == 0 {
                    mantissa = (mantissa << 4) | digit as u64;
                    if seen_point {
                        exponent -= 4;
                    }
                } else {
                    sticky |= digit != 0;
                    if !seen_point {
                        exponent += 4;
                    }
                }
            }
        }
        consumed += 1;
    }
    if !seen_digit {
        return None;
    }

    let rest = &text[consumed..];
    let rest = match rest {
        [b'p' | b'P', tail @ ..] => {
            let (power, tail) = parse_exponent(tail)?;
            exponent = exponent.saturating_add(power);
            tail
        }
        _ => rest,
    };
    if !rest.is_empty() {
        return None;
    }

    if sticky {
        mantissa |= 1;
    }
    if mantissa == 0 {
        return Some(0.0);
    }
    // Anything outside this range is already zero or infinity
    let exponent = exponent.clamp(-4096, 4096);
    Some(round_to_double(mantissa, exponent))
}

/// Returns the double nearest to `mantissa * 2^exponent`, ties to even.
///
/// The mantissa is rounded once, at the precision of the result, which is
/// below 53 bits for subnormals. The scaling that follows is then exact, or
/// overflows to infinity.
fn round_to_double(mantissa: u64, exponent: i64) -> f64 {
    let top = exponent + (63 - mantissa.leading_zeros() as i64);
    let lsb = (top - (f64::MANTISSA_DIGITS as i64 - 1)).max(MIN_EXPONENT);
    if exponent >= lsb {
        return libm::ldexp(mantissa as f64, exponent as i32);
    }

    let shift = (lsb - exponent) as u32;
    let rounded = if shift >= u128::BITS {
        0
    } else {
        let wide = mantissa as u128;
        let kept = wide >> shift;
        let dropped = wide & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        if dropped > half || (dropped == half && kept & 1 == 1) {
            kept + 1
        } else {
            kept
        }
    };
    libm::ldexp(rounded as f64, lsb as i32)
}

/// Parses a signed decimal exponent, returning it and the unconsumed input
fn parse_exponent(text: &[u8]) -> Option<(i64, &[u8])> {
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };
    let len = digits.iter().take_while(|c| c.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let value = digits[..len].iter().fold(0i64, |acc, &c| {
        acc.saturating_mul(10).saturating_add((c - b'0') as i64)
    });
    Some((if negative { -value } else { value }, &digits[len..]))
}

#[inline]
fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}
