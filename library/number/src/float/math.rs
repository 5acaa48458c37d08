//! Math back-ends.
//!
//! Every primitive over doubles goes through [`FloatMath`]. The trait only has
//! associated functions, so the back-end in use is resolved statically through
//! the [`Math`] alias, which is picked at build time:
//!
//! * [`Hosted`] when the `std` feature is enabled, delegating to the `f64`
//! methods of the standard library (and thus to the platform libm)
//! * [`Soft`] otherwise, or when `soft-float` is requested, delegating to the
//! pure Rust `libm` crate. This is the back-end used in kernel and embedded
//! builds, where no hosted math library is available.
//!
//! Both back-ends follow IEEE-754 semantics: no function here reports an error,
//! NaN and the infinities propagate through.

pub trait FloatMath {
    #[inline]
    fn neg(x: f64) -> f64 {
        -x
    }

    #[inline]
    fn add(x: f64, y: f64) -> f64 {
        x + y
    }

    #[inline]
    fn sub(x: f64, y: f64) -> f64 {
        x - y
    }

    #[inline]
    fn mul(x: f64, y: f64) -> f64 {
        x * y
    }

    #[inline]
    fn div(x: f64, y: f64) -> f64 {
        x / y
    }

    /// Splits `x` into a mantissa with magnitude in `[0.5, 1)` and a power of two.
    ///
    /// The standard library has no equivalent, so both back-ends share the `libm` one.
    #[inline]
    fn frexp(x: f64) -> (f64, i32) {
        libm::frexp(x)
    }

    /// Computes `x * 2^exp`
    #[inline]
    fn ldexp(x: f64, exp: i32) -> f64 {
        libm::ldexp(x, exp)
    }

    /// Splits `x` into its fractional and integral parts, in that order.
    ///
    /// Both parts carry the sign of `x`.
    #[inline]
    fn modf(x: f64) -> (f64, f64) {
        libm::modf(x)
    }

    fn abs(x: f64) -> f64;
    fn floor(x: f64) -> f64;
    fn ceil(x: f64) -> f64;
    fn fmod(x: f64, y: f64) -> f64;
    fn exp(x: f64) -> f64;
    fn expm1(x: f64) -> f64;
    fn log(x: f64) -> f64;
    fn log10(x: f64) -> f64;
    fn log1p(x: f64) -> f64;
    fn sqrt(x: f64) -> f64;
    fn pow(x: f64, y: f64) -> f64;
    fn hypot(x: f64, y: f64) -> f64;
    fn copysign(x: f64, y: f64) -> f64;
    fn sin(x: f64) -> f64;
    fn cos(x: f64) -> f64;
    fn tan(x: f64) -> f64;
    fn asin(x: f64) -> f64;
    fn acos(x: f64) -> f64;
    fn atan(x: f64) -> f64;
    fn atan2(y: f64, x: f64) -> f64;
    fn sinh(x: f64) -> f64;
    fn cosh(x: f64) -> f64;
    fn tanh(x: f64) -> f64;
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "std", not(feature = "soft-float")))] {
        /// The back-end selected for this build
        pub type Math = Hosted;
    } else {
        /// The back-end selected for this build
        pub type Math = Soft;
    }
}

/// Delegates to the platform math library through `std`
#[cfg(feature = "std")]
#[derive(Debug, Copy, Clone)]
pub struct Hosted;

#[cfg(feature = "std")]
impl FloatMath for Hosted {
    #[inline]
    fn abs(x: f64) -> f64 {
        x.abs()
    }
    #[inline]
    fn floor(x: f64) -> f64 {
        x.floor()
    }
    #[inline]
    fn ceil(x: f64) -> f64 {
        x.ceil()
    }
    #[inline]
    fn fmod(x: f64, y: f64) -> f64 {
        // `%` on floats is C's fmod: the result has the sign of `x`
        x % y
    }
    #[inline]
    fn exp(x: f64) -> f64 {
        x.exp()
    }
    #[inline]
    fn expm1(x: f64) -> f64 {
        x.exp_m1()
    }
    #[inline]
    fn log(x: f64) -> f64 {
        x.ln()
    }
    #[inline]
    fn log10(x: f64) -> f64 {
        x.log10()
    }
    #[inline]
    fn log1p(x: f64) -> f64 {
        x.ln_1p()
    }
    #[inline]
    fn sqrt(x: f64) -> f64 {
        x.sqrt()
    }
    #[inline]
    fn pow(x: f64, y: f64) -> f64 {
        x.powf(y)
    }
    #[inline]
    fn hypot(x: f64, y: f64) -> f64 {
        x.hypot(y)
    }
    #[inline]
    fn copysign(x: f64, y: f64) -> f64 {
        x.copysign(y)
    }
    #[inline]
    fn sin(x: f64) -> f64 {
        x.sin()
    }
    #[inline]
    fn cos(x: f64) -> f64 {
        x.cos()
    }
    #[inline]
    fn tan(x: f64) -> f64 {
        x.tan()
    }
    #[inline]
    fn asin(x: f64) -> f64 {
        x.asin()
    }
    #[inline]
    fn acos(x: f64) -> f64 {
        x.acos()
    }
    #[inline]
    fn atan(x: f64) -> f64 {
        x.atan()
    }
    #[inline]
    fn atan2(y: f64, x: f64) -> f64 {
        y.atan2(x)
    }
    #[inline]
    fn sinh(x: f64) -> f64 {
        x.sinh()
    }
    #[inline]
    fn cosh(x: f64) -> f64 {
        x.cosh()
    }
    #[inline]
    fn tanh(x: f64) -> f64 {
        x.tanh()
    }
}

/// Software implementation backed by the `libm` crate, available without `std`
#[derive(Debug, Copy, Clone)]
pub struct Soft;

impl FloatMath for Soft {
    #[inline]
    fn abs(x: f64) -> f64 {
        libm::fabs(x)
    }
    #[inline]
    fn floor(x: f64) -> f64 {
        libm::floor(x)
    }
    #[inline]
    fn ceil(x: f64) -> f64 {
        libm::ceil(x)
    }
    #[inline]
    fn fmod(x: f64, y: f64) -> f64 {
        libm::fmod(x, y)
    }
    #[inline]
    fn exp(x: f64) -> f64 {
        libm::exp(x)
    }
    #[inline]
    fn expm1(x: f64) -> f64 {
        libm::expm1(x)
    }
    #[inline]
    fn log(x: f64) -> f64 {
        libm::log(x)
    }
    #[inline]
    fn log10(x: f64) -> f64 {
        libm::log10(x)
    }
    #[inline]
    fn log1p(x: f64) -> f64 {
        libm::log1p(x)
    }
    #[inline]
    fn sqrt(x: f64) -> f64 {
        libm::sqrt(x)
    }
    #[inline]
    fn pow(x: f64, y: f64) -> f64 {
        libm::pow(x, y)
    }
    #[inline]
    fn hypot(x: f64, y: f64) -> f64 {
        libm::hypot(x, y)
    }
    #[inline]
    fn copysign(x: f64, y: f64) -> f64 {
        libm::copysign(x, y)
    }
    #[inline]
    fn sin(x: f64) -> f64 {
        libm::sin(x)
    }
    #[inline]
    fn cos(x: f64) -> f64 {
        libm::cos(x)
    }
    #[inline]
    fn tan(x: f64) -> f64 {
        libm::tan(x)
    }
    #[inline]
    fn asin(x: f64) -> f64 {
        libm::asin(x)
    }
    #[inline]
    fn acos(x: f64) -> f64 {
        libm::acos(x)
    }
    #[inline]
    fn atan(x: f64) -> f64 {
        libm::atan(x)
    }
    #[inline]
    fn atan2(y: f64, x: f64) -> f64 {
        libm::atan2(y, x)
    }
    #[inline]
    fn sinh(x: f64) -> f64 {
        libm::sinh(x)
    }
    #[inline]
    fn cosh(x: f64) -> f64 {
        libm::cosh(x)
    }
    #[inline]
    fn tanh(x: f64) -> f64 {
        libm::tanh(x)
    }
}
