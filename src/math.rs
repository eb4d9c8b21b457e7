//! Scalar math substrate.
//!
//! Every transcendental used by the vector, matrix and quaternion code goes
//! through this module. By default the functions forward to the host math
//! library (`f32` methods from `std`). With the `freestanding` feature they
//! use the approximations in [`approx`], which need nothing beyond integer
//! and float arithmetic.
//!
//! The approximations trade accuracy for independence: expect roughly 1e-2
//! relative error. Callers needing more precision should leave the feature
//! off.

/// π
pub const PI: f32 = core::f32::consts::PI;
/// π / 2
pub const PI_HALF: f32 = core::f32::consts::FRAC_PI_2;
/// 2π
pub const PI_DOUBLE: f32 = core::f32::consts::TAU;

/// Converts degrees to radians.
#[inline(always)]
pub fn radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

#[cfg(not(feature = "freestanding"))]
mod imp {
    #[inline(always)]
    pub fn sin(x: f32) -> f32 {
        x.sin()
    }

    #[inline(always)]
    pub fn cos(x: f32) -> f32 {
        x.cos()
    }

    #[inline(always)]
    pub fn tan(x: f32) -> f32 {
        x.tan()
    }

    #[inline(always)]
    pub fn sqrt(x: f32) -> f32 {
        x.sqrt()
    }

    #[inline(always)]
    pub fn floor(x: f32) -> f32 {
        x.floor()
    }
}

#[cfg(feature = "freestanding")]
mod imp {
    pub use super::approx::{cos, floor, sin, sqrt, tan};
}

pub use imp::{cos, floor, sin, sqrt, tan};

/// Host-independent approximations.
///
/// Always compiled, so they can be tested and benchmarked against `std`
/// regardless of which implementation [`crate::math`] forwards to.
pub mod approx {
    use super::{PI, PI_DOUBLE, PI_HALF};

    // Every f32 at or above 2^23 is already an integer.
    const INTEGRAL_THRESHOLD: f32 = 8_388_608.0;

    // Magic seed for the inverse square root estimate.
    const RSQRT_MAGIC: u32 = 0x5f37_59df;

    // Past this magnitude a period spans less than one ulp, so the phase is lost.
    const REDUCTION_LIMIT: f32 = INTEGRAL_THRESHOLD * PI_DOUBLE;

    /// Sine via range reduction to [-π/2, π/2] and a degree-7 Taylor polynomial.
    ///
    /// Non-finite input gives NaN. Finite input too large to reduce gives 0.
    #[inline]
    pub fn sin(x: f32) -> f32 {
        if !x.is_finite() {
            return f32::NAN;
        }
        if x.abs() >= REDUCTION_LIMIT {
            return 0.0;
        }

        // [0, 2π], clamped against rounding in the product.
        let mut x = (x - PI_DOUBLE * floor(x / PI_DOUBLE)).clamp(0.0, PI_DOUBLE);
        let mut flip = false;

        // [0, π]
        if x > PI {
            x -= PI;
            flip = true;
        }
        // [0, π/2]
        if x > PI_HALF {
            x = PI - x;
        }

        let x2 = x * x;
        let result = x * (1.0 - x2 / 6.0 * (1.0 - x2 / 20.0 * (1.0 - x2 / 42.0)));
        if flip {
            -result
        } else {
            result
        }
    }

    #[inline]
    pub fn cos(x: f32) -> f32 {
        sin(x + PI_HALF)
    }

    #[inline]
    pub fn tan(x: f32) -> f32 {
        sin(x) / cos(x)
    }

    /// Square root from the bit-level inverse square root estimate and one
    /// Newton-Raphson step. Returns 0 for non-positive input. Positive
    /// infinity and NaN are returned as is.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        // NaN fails the comparison above.
        if !x.is_finite() {
            return x;
        }

        let x_half = 0.5 * x;
        let mut y = f32::from_bits(RSQRT_MAGIC - (x.to_bits() >> 1));
        y *= 1.5 - x_half * y * y;
        x * y
    }

    #[inline]
    pub fn floor(x: f32) -> f32 {
        // NaN fails the comparison and is returned as is.
        if !(x.abs() < INTEGRAL_THRESHOLD) {
            return x;
        }

        let truncated = (x as i32) as f32;
        if x < truncated {
            truncated - 1.0
        } else {
            truncated
        }
    }
}
