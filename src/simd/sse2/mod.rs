//! SSE2 kernels (128-bit, x86 and x86_64).
//!
//! SSE2 is part of the x86_64 baseline, but the kernels are still compiled
//! with `#[target_feature(enable = "sse2")]` and only reached through the
//! dispatch points after the host has been checked, so 32-bit x86 builds
//! without SSE2 stay correct.
//!
//! The AVX and AVX2 levels also route `dot4` and `mat4_mul_vec` here: a
//! single 4-lane product gains nothing from wider registers.

pub mod f32x4;
pub mod kernels;
