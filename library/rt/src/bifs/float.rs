//! Primitives over boxed floats.
//!
//! Floats cross into these functions as terms pointing to double blocks and are
//! returned the same way, freshly allocated through the calling [`Mutator`].
//! The math itself is done by the back-end selected at build time, see
//! [`ember_number::float::math`]. None of the arithmetic raises: NaN and the
//! infinities flow through as IEEE-754 prescribes.
use alloc::string::String;
use core::cmp::Ordering;
use core::sync::atomic::{self, AtomicBool};

use ember_number::float::{self as number, FloatMath, Math};
use log::debug;

use crate::error::Exception;
use crate::gc::{self, Mutator, RootSet};
use crate::term::{self, Header, OpaqueTerm, Tag, Tuple, DOUBLE_WOSIZE};

/// Boxes `d` in a new double block
#[inline]
pub fn copy_double<M>(mutator: &mut M, d: f64) -> OpaqueTerm
where
    M: ?Sized + Mutator,
{
    copy_double_rooted(mutator, d, RootSet::default())
}

fn copy_double_rooted<M>(mutator: &mut M, d: f64, roots: RootSet) -> OpaqueTerm
where
    M: ?Sized + Mutator,
{
    let fields = gc::alloc_block(mutator, Header::new(Tag::Double, DOUBLE_WOSIZE), roots);
    unsafe { term::store_double(fields, d) };
    OpaqueTerm::from_block(fields)
}

/// Returns the value of the boxed double `f`.
///
/// `f` must be a boxed double; anything else is a bug in the caller, caught in
/// debug builds and read as NaN otherwise.
#[inline]
pub fn double_val(f: OpaqueTerm) -> f64 {
    match f.as_double() {
        Some(d) => d,
        None => {
            debug_assert!(false, "expected a boxed double, got {:?}", f);
            f64::NAN
        }
    }
}

#[inline]
fn int_val(i: OpaqueTerm) -> isize {
    debug_assert!(i.is_int(), "expected an integer, got {:?}", i);
    i.as_int().unwrap_or(0)
}

macro_rules! unary_float {
    ($($name:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Boxes `", stringify!($name), "` of a boxed float")]
                pub fn [<$name _float>]<M>(mutator: &mut M, f: OpaqueTerm) -> OpaqueTerm
                where
                    M: ?Sized + Mutator,
                {
                    copy_double(mutator, Math::$name(double_val(f)))
                }
            )*
        }
    };
}

macro_rules! binary_float {
    ($($name:ident => $op:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Boxes `", stringify!($op), "` of two boxed floats")]
                pub fn [<$name _float>]<M>(mutator: &mut M, f: OpaqueTerm, g: OpaqueTerm) -> OpaqueTerm
                where
                    M: ?Sized + Mutator,
                {
                    copy_double(mutator, Math::$op(double_val(f), double_val(g)))
                }
            )*
        }
    };
}

macro_rules! compare_float {
    ($($name:ident => $op:tt),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Returns `f ", stringify!($op), " g` as a boolean, with IEEE-754 semantics")]
                #[inline]
                pub fn [<$name _float>](f: OpaqueTerm, g: OpaqueTerm) -> OpaqueTerm {
                    OpaqueTerm::from(double_val(f) $op double_val(g))
                }
            )*
        }
    };
}

unary_float!(
    neg, abs, floor, ceil, exp, expm1, log, log10, log1p, sqrt, sin, cos, tan, asin, acos, atan,
    sinh, cosh, tanh,
);

binary_float!(
    add => add,
    sub => sub,
    mul => mul,
    div => div,
    fmod => fmod,
    power => pow,
    atan2 => atan2,
    hypot => hypot,
    copysign => copysign,
);

compare_float!(
    eq => ==,
    neq => !=,
    le => <=,
    lt => <,
    ge => >=,
    gt => >,
);

/// Returns `f * 2^i`, where `i` is an immediate integer
pub fn ldexp_float<M>(mutator: &mut M, f: OpaqueTerm, i: OpaqueTerm) -> OpaqueTerm
where
    M: ?Sized + Mutator,
{
    // Any exponent past these bounds already saturates to zero or infinity
    let exp = int_val(i).clamp(i32::MIN as isize, i32::MAX as isize) as i32;
    copy_double(mutator, Math::ldexp(double_val(f), exp))
}

/// Returns the tuple `(mantissa, exponent)` such that `f = mantissa * 2^exponent`.
///
/// The mantissa is a boxed float with magnitude in `[0.5, 1)`, or zero, and the
/// exponent is an immediate integer.
pub fn frexp_float<M>(mutator: &mut M, f: OpaqueTerm) -> OpaqueTerm
where
    M: ?Sized + Mutator,
{
    let (mantissa, exponent) = Math::frexp(double_val(f));
    let mantissa = copy_double(mutator, mantissa);
    Tuple::alloc(mutator, &mut [mantissa, OpaqueTerm::from_int(exponent as isize)])
}

/// Returns the tuple `(fractional, integral)` of boxed floats, both with the sign of `f`
pub fn modf_float<M>(mutator: &mut M, f: OpaqueTerm) -> OpaqueTerm
where
    M: ?Sized + Mutator,
{
    let (fractional, integral) = Math::modf(double_val(f));
    let mut fractional = copy_double(mutator, fractional);

    let mut roots = RootSet::default();
    roots += &mut fractional as *mut OpaqueTerm;
    let integral = copy_double_rooted(mutator, integral, roots);

    Tuple::alloc(mutator, &mut [fractional, integral])
}

/// Three-way comparison of two boxed floats, returned as `-1`, `0` or `1`.
///
/// If either operand is NaN the result is `0`.
pub fn float_compare(f: OpaqueTerm, g: OpaqueTerm) -> OpaqueTerm {
    match number::compare(double_val(f), double_val(g)) {
        Ordering::Less => OpaqueTerm::from_int(-1),
        Ordering::Equal => OpaqueTerm::from_int(0),
        Ordering::Greater => OpaqueTerm::from_int(1),
    }
}

/// Returns the class code of `f`, see [`number::FloatClass`]
pub fn classify_float(f: OpaqueTerm) -> OpaqueTerm {
    OpaqueTerm::from_int(number::classify(double_val(f)).code() as isize)
}

/// Truncates `f` toward zero.
///
/// Out of range values saturate to the word range, then wrap to fit an immediate.
pub fn int_of_float(f: OpaqueTerm) -> OpaqueTerm {
    OpaqueTerm::from_int(double_val(f) as isize)
}

pub fn float_of_int<M>(mutator: &mut M, n: OpaqueTerm) -> OpaqueTerm
where
    M: ?Sized + Mutator,
{
    copy_double(mutator, int_val(n) as f64)
}

/// Parses `s` as a float, ignoring any `_` it contains.
///
/// Raises `Failure "float_of_string"` if nothing is left to parse or if `s`
/// does not hold a float and nothing else.
pub fn float_of_string<M>(mutator: &mut M, s: &[u8]) -> Result<OpaqueTerm, Exception>
where
    M: ?Sized + Mutator,
{
    match number::parse(s) {
        Ok(d) => Ok(copy_double(mutator, d)),
        Err(_) => Err(Exception::failure("float_of_string")),
    }
}

/// Parses the `len` bytes of `s` starting at `idx`, like [`float_of_string`].
///
/// A range which does not fit in `s`, or is empty, is parsed as the empty string.
pub fn float_of_substring<M>(
    mutator: &mut M,
    s: &[u8],
    idx: OpaqueTerm,
    len: OpaqueTerm,
) -> Result<OpaqueTerm, Exception>
where
    M: ?Sized + Mutator,
{
    let text = match (usize::try_from(int_val(idx)), usize::try_from(int_val(len))) {
        (Ok(idx), Ok(len)) if idx < s.len() && len > 0 && len <= s.len() - idx => {
            &s[idx..(idx + len)]
        }
        _ => &s[..0],
    };
    float_of_string(mutator, text)
}

/// Renders `f` using the printf-style template `fmt`, e.g. `%.12g`.
///
/// Raises `Invalid_argument "format_float"` if `fmt` does not hold exactly one
/// float conversion, or asks for a width or precision above
/// [`number::MAX_FIELD`].
pub fn format_float(fmt: &str, f: OpaqueTerm) -> Result<String, Exception> {
    number::format_float(fmt, double_val(f))
        .map_err(|_| Exception::invalid_argument("format_float"))
}

static IEEE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Prepares the floating-point unit for IEEE-754 arithmetic.
///
/// Rust targets already run with every floating-point trap disabled, so there
/// is nothing to configure. Safe to call any number of times.
pub fn init_ieee_floats() {
    if !IEEE_INITIALIZED.swap(true, atomic::Ordering::AcqRel) {
        debug!(target: "float", "floating-point unit in IEEE-754 default mode, traps disabled");
    }
}

/// Returns true once [`init_ieee_floats`] has been called
pub fn ieee_floats_initialized() -> bool {
    IEEE_INITIALIZED.load(atomic::Ordering::Acquire)
}
