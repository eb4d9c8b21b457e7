//! Small linear algebra for real-time graphics.
//!
//! Fixed-size [vectors](vector), column-major [matrices](matrix) and
//! [quaternions](quat) over `f32`, `i32` and `u32`, with the hot 4-wide `f32`
//! operations routed at runtime to SSE2, AVX or NEON kernels.
//!
//! ```
//! use linmath::{vec4, Mat4};
//!
//! let p = Mat4::translation(1.0, 2.0, 3.0) * vec4(1.0, 2.0, 3.0, 1.0);
//! assert_eq!(p, vec4(2.0, 4.0, 6.0, 1.0));
//! ```
//!
//! # Dispatch
//!
//! [`dot4`], [`mat4_mul`] and [`mat4_mul_vec`] read the process-wide
//! [`CapabilityLevel`] on every call. It is detected from the host CPU on
//! first use and can be overridden with [`simd::set_level`]. The `*_with`
//! variants take the level explicitly. Whatever the level, results agree
//! with the scalar reference up to float reassociation, and a level the host
//! cannot execute silently uses the scalar path.
//!
//! # Features
//!
//! - `force-scalar`: compile out every SIMD kernel (also enabled by building
//!   with `LINMATH_FORCE_NO_SIMD=1`).
//! - `freestanding`: use the bundled approximations in [`math::approx`]
//!   instead of the platform math library.

pub mod config;
pub mod error;
pub mod math;
pub mod matrix;
pub mod quat;
pub mod scalar;
pub mod simd;
pub mod vector;

pub use config::Config;
pub use error::{LinmathError, Result};
pub use matrix::{
    mat4_mul, mat4_mul_vec, mat4_mul_vec_with, mat4_mul_with, Mat2x3, Mat2x3Of, Mat3, Mat3Of, Mat4,
    Mat4Of, Matrix,
};
pub use quat::{Quat, Quaternion};
pub use scalar::Scalar;
pub use simd::CapabilityLevel;
pub use vector::{
    dot4, dot4_with, vec2, vec3, vec4, IVec2, IVec3, IVec4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4,
    Vector,
};
