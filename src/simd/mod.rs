//! Runtime SIMD capability detection and dispatch.
//!
//! The accelerated entry points ([`crate::vector::dot4`],
//! [`crate::matrix::mat4_mul`], [`crate::matrix::mat4_mul_vec`]) read the
//! process-wide [`CapabilityLevel`] from [`dispatch`] on every call and route
//! to one of the ISA-specific kernels below, or to the generic scalar loop.
//!
//! Which kernel families exist is decided at build time (see `build.rs`):
//!
//! - `simd_x86`: [`sse2`] and [`avx`] kernels, gated at runtime by CPUID
//! - `simd_neon`: [`neon`] kernels (aarch64 only)
//! - `simd_fallback`: scalar only, either because the target has no supported
//!   SIMD extension or because the `force-scalar` feature is enabled

use std::fmt;
use std::str::FromStr;

use crate::error::{unknown_level, LinmathError};

pub mod detect;
pub mod dispatch;
pub mod traits;

#[cfg(simd_x86)]
pub mod avx;
#[cfg(simd_x86)]
pub mod sse2;

#[cfg(simd_neon)]
pub mod neon;

pub use detect::detect;
pub use dispatch::{current_level, host_level, reset_level, scoped_level, set_level, LevelGuard};
pub use traits::SimdVec;

/// `true` when this build contains at least one SIMD kernel family.
pub const SIMD_COMPILED: bool = cfg!(any(simd_x86, simd_neon));

/// Instruction-set family the dispatch points may use.
///
/// `None` is valid on every host. On x86 the levels nest
/// (`Avx2` ⊃ `Avx` ⊃ `Sse2`); `Neon` is the only option on ARM. Because the
/// x86 and ARM levels are unrelated, the type is deliberately not `Ord`:
/// use [`CapabilityLevel::supports`] to compare a host against a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CapabilityLevel {
    /// Generic scalar code only.
    #[default]
    None = 0,
    /// 128-bit SSE2 (x86).
    Sse2 = 1,
    /// 256-bit AVX with OS-enabled YMM state (x86).
    Avx = 2,
    /// AVX2 (x86).
    Avx2 = 3,
    /// 128-bit Advanced SIMD (aarch64).
    Neon = 4,
}

impl CapabilityLevel {
    /// Every level, in declaration order.
    pub const ALL: [CapabilityLevel; 5] = [
        CapabilityLevel::None,
        CapabilityLevel::Sse2,
        CapabilityLevel::Avx,
        CapabilityLevel::Avx2,
        CapabilityLevel::Neon,
    ];

    /// Decodes the registry representation. Unknown values map to `None`.
    #[inline(always)]
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => CapabilityLevel::Sse2,
            2 => CapabilityLevel::Avx,
            3 => CapabilityLevel::Avx2,
            4 => CapabilityLevel::Neon,
            _ => CapabilityLevel::None,
        }
    }

    /// `true` for the x86 family (`Sse2`, `Avx`, `Avx2`).
    #[inline(always)]
    pub const fn is_x86(self) -> bool {
        matches!(
            self,
            CapabilityLevel::Sse2 | CapabilityLevel::Avx | CapabilityLevel::Avx2
        )
    }

    /// Whether a host detected at `self` can execute kernels for `requested`.
    ///
    /// `None` is supported everywhere. Within the x86 family a host supports
    /// every level up to its own; `Neon` is supported only by a `Neon` host.
    #[inline(always)]
    pub const fn supports(self, requested: CapabilityLevel) -> bool {
        match requested {
            CapabilityLevel::None => true,
            CapabilityLevel::Neon => matches!(self, CapabilityLevel::Neon),
            _ => self.is_x86() && requested as u8 <= self as u8,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            CapabilityLevel::None => "none",
            CapabilityLevel::Sse2 => "sse2",
            CapabilityLevel::Avx => "avx",
            CapabilityLevel::Avx2 => "avx2",
            CapabilityLevel::Neon => "neon",
        }
    }
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CapabilityLevel {
    type Err = LinmathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "scalar" => Ok(CapabilityLevel::None),
            "sse2" => Ok(CapabilityLevel::Sse2),
            "avx" => Ok(CapabilityLevel::Avx),
            "avx2" => Ok(CapabilityLevel::Avx2),
            "neon" => Ok(CapabilityLevel::Neon),
            _ => Err(unknown_level(s)),
        }
    }
}
