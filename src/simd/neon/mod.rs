//! NEON kernels (128-bit Advanced SIMD, aarch64).
//!
//! NEON is mandatory on aarch64, so this module is compiled whenever the
//! target enables the `neon` feature and the kernels run without a runtime
//! check. 32-bit ARM is served by the scalar path.
//!
//! The kernels use separate multiply and add instructions rather than fused
//! multiply-accumulate, so their rounding matches the x86 kernels.

pub mod f32x4;
pub mod kernels;
