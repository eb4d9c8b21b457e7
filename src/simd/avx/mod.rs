//! AVX kernels (256-bit, x86 and x86_64).
//!
//! Only `mat4_mul` has an AVX kernel: it packs two output columns into each
//! register. The `Avx` and `Avx2` levels both use it; AVX2 adds nothing a
//! 4x4 float product can use.
//!
//! Every kernel is compiled with `#[target_feature(enable = "avx")]` and is
//! only reached after the host has reported OS-enabled YMM state.

pub mod f32x8;
pub mod kernels;
