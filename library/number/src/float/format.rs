use alloc::format;
use alloc::string::String;
use core::fmt;

use log::trace;

/// Max number of decimal digits in a "natural" (not artificially padded)
/// rendering of a double. The largest IEEE-754 decimal exponent is 308, so
/// `%f` of `f64::MAX` stays well under this.
pub const MAX_DIGITS: usize = 350;

/// Largest field width or precision a template may ask for
pub const MAX_FIELD: usize = 1 << 15;

const DEFAULT_PRECISION: usize = 6;

bitflags::bitflags! {
    /// The flag characters of a printf-style conversion
    pub struct FormatFlags: u8 {
        /// `-`: pad on the right
        const LEFT = 1;
        /// `+`: always print a sign
        const PLUS = 1 << 1;
        /// ` `: print a space where a `+` sign would go
        const SPACE = 1 << 2;
        /// `#`: always print the decimal point, keep trailing zeros of `%g`
        const ALTERNATE = 1 << 3;
        /// `0`: pad with zeros after the sign
        const ZERO = 1 << 4;
    }
}
impl Default for FormatFlags {
    fn default() -> Self {
        Self::empty()
    }
}
impl FormatFlags {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::LEFT),
            '+' => Some(Self::PLUS),
            ' ' => Some(Self::SPACE),
            '#' => Some(Self::ALTERNATE),
            '0' => Some(Self::ZERO),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The template contains no conversion at all
    MissingConversion,
    /// The conversion character is not one of `f F e E g G`
    UnsupportedConversion(char),
    /// The template contains more than one conversion
    TooManyConversions,
    /// The field width or precision is larger than [`MAX_FIELD`]
    FieldTooLarge,
}
impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingConversion => write!(f, "format contains no float conversion"),
            Self::UnsupportedConversion(c) => write!(f, "unsupported float conversion '{}'", c),
            Self::TooManyConversions => write!(f, "format contains more than one conversion"),
            Self::FieldTooLarge => write!(f, "width or precision exceeds {}", MAX_FIELD),
        }
    }
}
#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// `%f`
    Fixed,
    /// `%e`
    Exponent,
    /// `%g`
    General,
}

/// A parsed printf-style template holding a single float conversion,
/// e.g. `%.12g` or `x = %+8.3f;`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormatSpec<'a> {
    prefix: &'a str,
    suffix: &'a str,
    flags: FormatFlags,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
    uppercase: bool,
}
impl<'a> FormatSpec<'a> {
    pub fn parse(template: &'a str) -> Result<Self, FormatError> {
        let Some(start) = find_conversion(template, 0) else {
            return Err(FormatError::MissingConversion);
        };
        let prefix = &template[..start];

        let mut chars = template[start + 1..].char_indices().peekable();
        let mut flags = FormatFlags::empty();
        while let Some(flag) = chars.peek().and_then(|&(_, c)| FormatFlags::from_char(c)) {
            flags |= flag;
            chars.next();
        }

        let mut width = 0usize;
        while let Some(digit) = chars.peek().and_then(|&(_, c)| c.to_digit(10)) {
            width = width.saturating_mul(10).saturating_add(digit as usize);
            chars.next();
        }

        let mut precision = None;
        if let Some(&(_, '.')) = chars.peek() {
            chars.next();
            let mut value = 0usize;
            while let Some(digit) = chars.peek().and_then(|&(_, c)| c.to_digit(10)) {
                value = value.saturating_mul(10).saturating_add(digit as usize);
                chars.next();
            }
            precision = Some(value);
        }

        // C allows a length modifier on double conversions, it has no effect
        if let Some(&(_, 'l' | 'L')) = chars.peek() {
            chars.next();
        }

        let Some((offset, c)) = chars.next() else {
            return Err(FormatError::MissingConversion);
        };
        let conversion = match c.to_ascii_lowercase() {
            'f' => Conversion::Fixed,
            'e' => Conversion::Exponent,
            'g' => Conversion::General,
            _ => return Err(FormatError::UnsupportedConversion(c)),
        };

        let end = start + 1 + offset + c.len_utf8();
        if find_conversion(template, end).is_some() {
            return Err(FormatError::TooManyConversions);
        }
        if width > MAX_FIELD || precision.map_or(false, |p| p > MAX_FIELD) {
            return Err(FormatError::FieldTooLarge);
        }

        Ok(Self {
            prefix,
            suffix: &template[end..],
            flags,
            width,
            precision,
            conversion,
            uppercase: c.is_ascii_uppercase(),
        })
    }

    #[inline]
    pub fn flags(&self) -> FormatFlags {
        self.flags
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    #[inline]
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Renders `value` according to this template, appending it to `out`
    pub fn render(&self, value: f64, out: &mut String) {
        push_literal(self.prefix, out);

        let negative = value.is_sign_negative() && !value.is_nan();
        let sign = if negative {
            "-"
        } else if self.flags.contains(FormatFlags::PLUS) {
            "+"
        } else if self.flags.contains(FormatFlags::SPACE) {
            " "
        } else {
            ""
        };

        let finite = value.is_finite();
        let mut body = if value.is_nan() {
            String::from("nan")
        } else if value.is_infinite() {
            String::from("inf")
        } else {
            let magnitude = if value.is_sign_negative() { -value } else { value };
            self.render_digits(magnitude)
        };
        if self.uppercase {
            body.make_ascii_uppercase();
        }

        let len = sign.len() + body.len();
        let padding = self.width.saturating_sub(len);
        if self.flags.contains(FormatFlags::LEFT) {
            out.push_str(sign);
            out.push_str(&body);
            out.extend(core::iter::repeat(' ').take(padding));
        } else if self.flags.contains(FormatFlags::ZERO) && finite {
            out.push_str(sign);
            out.extend(core::iter::repeat('0').take(padding));
            out.push_str(&body);
        } else {
            out.extend(core::iter::repeat(' ').take(padding));
            out.push_str(sign);
            out.push_str(&body);
        }

        push_literal(self.suffix, out);
    }

    fn render_digits(&self, magnitude: f64) -> String {
        let alternate = self.flags.contains(FormatFlags::ALTERNATE);
        match self.conversion {
            Conversion::Fixed => {
                let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
                fixed(magnitude, precision, alternate)
            }
            Conversion::Exponent => {
                let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
                exponent(magnitude, precision, alternate)
            }
            Conversion::General => {
                let precision = match self.precision.unwrap_or(DEFAULT_PRECISION) {
                    0 => 1,
                    p => p,
                };
                // The style is chosen from the exponent the `%e` rendering would have
                let (_, x) = split_exponent(&format!("{:.*e}", precision - 1, magnitude));
                let precision = precision as i64;
                let mut digits = if x < precision && x >= -4 {
                    fixed(magnitude, (precision - 1 - x) as usize, alternate)
                } else {
                    exponent(magnitude, (precision - 1) as usize, alternate)
                };
                if !alternate {
                    strip_trailing_zeros(&mut digits);
                }
                digits
            }
        }
    }
}

/// Computes how much room rendering with `template` may need.
///
/// The first number found in the template is taken as the field width and the
/// number following the next `.` as the precision; each one is added to
/// [`MAX_DIGITS`] and the largest total wins. Numbers are capped at
/// [`MAX_FIELD`], so the result never exceeds `MAX_FIELD + MAX_DIGITS`.
pub fn buffer_capacity(template: &str) -> usize {
    let bytes = template.as_bytes();
    let mut capacity = MAX_DIGITS;
    let Some(start) = bytes.iter().position(u8::is_ascii_digit) else {
        return capacity;
    };
    let rest = &bytes[start..];
    capacity = capacity.max(leading_number(rest) + MAX_DIGITS);
    if let Some(dot) = rest.iter().position(|&c| c == b'.') {
        capacity = capacity.max(leading_number(&rest[dot + 1..]) + MAX_DIGITS);
    }
    capacity
}

/// Renders `value` using the printf-style `template`, e.g. `%.12g`.
///
/// Non-finite values are always rendered as `nan`, `inf` or `-inf`
/// (upper-cased for `%F`, `%E` and `%G`).
pub fn format_float(template: &str, value: f64) -> Result<String, FormatError> {
    let spec = FormatSpec::parse(template).map_err(|err| {
        trace!(target: "float", "invalid float format {:?}: {}", template, err);
        err
    })?;
    let mut out = String::with_capacity(buffer_capacity(template));
    spec.render(value, &mut out);
    Ok(out)
}

/// Returns the byte offset of the first `%` starting a conversion at or after `from`
fn find_conversion(template: &str, from: usize) -> Option<usize> {
    let bytes = template.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if bytes.get(i + 1) == Some(&b'%') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn push_literal(text: &str, out: &mut String) {
    let mut pieces = text.split("%%");
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        out.push('%');
        out.push_str(piece);
    }
}

fn leading_number(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .fold(0usize, |acc, &c| {
            acc.saturating_mul(10).saturating_add((c - b'0') as usize)
        })
        .min(MAX_FIELD)
}

fn fixed(magnitude: f64, precision: usize, alternate: bool) -> String {
    let mut digits = format!("{:.*}", precision, magnitude);
    if alternate && precision == 0 {
        digits.push('.');
    }
    digits
}

fn exponent(magnitude: f64, precision: usize, alternate: bool) -> String {
    let rendered = format!("{:.*e}", precision, magnitude);
    let (mantissa, exponent) = split_exponent(&rendered);
    let point = if alternate && precision == 0 { "." } else { "" };
    // C prints the exponent signed and with at least two digits
    format!("{}{}e{:+03}", mantissa, point, exponent)
}

/// Splits Rust's `{:e}` output (`1.5e-7`) into mantissa and exponent
fn split_exponent(rendered: &str) -> (&str, i64) {
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (rendered, 0),
    }
}

/// Removes trailing zeros of the fraction, and the point if nothing is left after it
fn strip_trailing_zeros(digits: &mut String) {
    let exponent_at = digits.find('e').unwrap_or(digits.len());
    let (mantissa, exponent) = digits.split_at(exponent_at);
    if !mantissa.contains('.') {
        return;
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    let stripped = format!("{}{}", trimmed, exponent);
    *digits = stripped;
}
