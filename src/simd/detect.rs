//! Host CPU capability detection.
//!
//! On x86 the detector reads CPUID directly rather than relying on
//! compile-time target features, so a single binary picks the best kernels on
//! whatever machine it runs on. AVX is only reported when the operating
//! system has enabled the 256-bit register state (XCR0 bits 1 and 2):
//! hardware support alone is not enough, since executing AVX instructions
//! with YMM state disabled raises an invalid-opcode fault.
//!
//! On aarch64 NEON availability is a property of the compilation target.

use super::CapabilityLevel;

/// CPUID leaf 1, EDX: SSE2.
pub const EDX_SSE2: u32 = 1 << 26;
/// CPUID leaf 1, ECX: XSAVE enabled by the OS (XGETBV usable).
pub const ECX_OSXSAVE: u32 = 1 << 27;
/// CPUID leaf 1, ECX: AVX.
pub const ECX_AVX: u32 = 1 << 28;
/// CPUID leaf 7 sub-leaf 0, EBX: AVX2.
pub const EBX_AVX2: u32 = 1 << 5;
/// XCR0: SSE (bit 1) and AVX (bit 2) state saved on context switch.
pub const XCR0_YMM_STATE: u64 = 0b110;

/// Raw x86 feature bits relevant to dispatch, as read from the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct X86Features {
    /// Highest basic CPUID leaf.
    pub max_leaf: u32,
    /// Leaf 1 ECX.
    pub leaf1_ecx: u32,
    /// Leaf 1 EDX.
    pub leaf1_edx: u32,
    /// XCR0, when it was safe to read it (OSXSAVE set).
    pub xcr0: Option<u64>,
    /// Leaf 7 sub-leaf 0 EBX, when leaf 7 exists.
    pub leaf7_ebx: Option<u32>,
}

impl X86Features {
    /// Reduces the raw bits to the capability level dispatch should use.
    pub fn level(&self) -> CapabilityLevel {
        let hw_sse2 = self.leaf1_edx & EDX_SSE2 != 0;
        let hw_avx = self.leaf1_ecx & ECX_AVX != 0;
        let osxsave = self.leaf1_ecx & ECX_OSXSAVE != 0;

        if hw_avx && osxsave {
            let ymm_enabled = self
                .xcr0
                .map_or(false, |xcr0| xcr0 & XCR0_YMM_STATE == XCR0_YMM_STATE);

            if ymm_enabled {
                let hw_avx2 = self.max_leaf >= 7
                    && self.leaf7_ebx.map_or(false, |ebx| ebx & EBX_AVX2 != 0);

                return if hw_avx2 {
                    CapabilityLevel::Avx2
                } else {
                    CapabilityLevel::Avx
                };
            }
        }

        if hw_sse2 {
            CapabilityLevel::Sse2
        } else {
            CapabilityLevel::None
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::{__cpuid_count, _xgetbv, CpuidResult};
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::{__cpuid_count, _xgetbv, CpuidResult};

    use super::{X86Features, ECX_OSXSAVE};

    // `__cpuid_count` is a safe fn on newer toolchains.
    #[allow(unused_unsafe)]
    #[inline]
    fn cpuid(leaf: u32, sub_leaf: u32) -> CpuidResult {
        unsafe { __cpuid_count(leaf, sub_leaf) }
    }

    #[cfg(target_arch = "x86")]
    fn has_cpuid() -> bool {
        std::arch::x86::has_cpuid()
    }

    #[cfg(target_arch = "x86_64")]
    fn has_cpuid() -> bool {
        true
    }

    /// Reads the feature bits from the running CPU.
    pub fn probe() -> Option<X86Features> {
        if !has_cpuid() {
            return None;
        }

        let max_leaf = cpuid(0, 0).eax;
        if max_leaf < 1 {
            return None;
        }

        let leaf1 = cpuid(1, 0);

        // XGETBV faults unless the OS has set CR4.OSXSAVE.
        let xcr0 = if leaf1.ecx & ECX_OSXSAVE != 0 {
            Some(unsafe { _xgetbv(0) })
        } else {
            None
        };

        let leaf7_ebx = (max_leaf >= 7).then(|| cpuid(7, 0).ebx);

        Some(X86Features {
            max_leaf,
            leaf1_ecx: leaf1.ecx,
            leaf1_edx: leaf1.edx,
            xcr0,
            leaf7_ebx,
        })
    }
}

/// Detects the best capability level of the running host.
///
/// Pure with respect to the host: repeated calls return the same value.
/// Never fails; anything ambiguous reports [`CapabilityLevel::None`].
pub fn detect() -> CapabilityLevel {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        x86::probe().map_or(CapabilityLevel::None, |features| features.level())
    }

    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    {
        CapabilityLevel::Neon
    }

    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        all(target_arch = "aarch64", target_feature = "neon")
    )))]
    {
        CapabilityLevel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(ecx: u32, edx: u32, xcr0: Option<u64>, leaf7_ebx: Option<u32>) -> X86Features {
        X86Features {
            max_leaf: if leaf7_ebx.is_some() { 7 } else { 1 },
            leaf1_ecx: ecx,
            leaf1_edx: edx,
            xcr0,
            leaf7_ebx,
        }
    }

    #[test]
    fn test_no_features_is_none() {
        assert_eq!(X86Features::default().level(), CapabilityLevel::None);
    }

    #[test]
    fn test_sse2_only() {
        let f = features(0, EDX_SSE2, None, None);
        assert_eq!(f.level(), CapabilityLevel::Sse2);
    }

    #[test]
    fn test_avx_hardware_without_osxsave_falls_back_to_sse2() {
        let f = features(ECX_AVX, EDX_SSE2, None, Some(EBX_AVX2));
        assert_eq!(f.level(), CapabilityLevel::Sse2);
    }

    #[test]
    fn test_avx_with_ymm_state_disabled_falls_back_to_sse2() {
        // OS supports XSAVE but has only enabled x87/SSE state.
        let f = features(ECX_AVX | ECX_OSXSAVE, EDX_SSE2, Some(0b011), Some(EBX_AVX2));
        assert_eq!(f.level(), CapabilityLevel::Sse2);

        let f = features(ECX_AVX | ECX_OSXSAVE, EDX_SSE2, Some(0b101), Some(EBX_AVX2));
        assert_eq!(f.level(), CapabilityLevel::Sse2);
    }

    #[test]
    fn test_avx_enabled() {
        let f = features(ECX_AVX | ECX_OSXSAVE, EDX_SSE2, Some(0b111), Some(0));
        assert_eq!(f.level(), CapabilityLevel::Avx);
    }

    #[test]
    fn test_avx2_enabled() {
        let f = features(ECX_AVX | ECX_OSXSAVE, EDX_SSE2, Some(0b111), Some(EBX_AVX2));
        assert_eq!(f.level(), CapabilityLevel::Avx2);
    }

    #[test]
    fn test_avx2_bit_ignored_when_leaf7_missing() {
        let mut f = features(ECX_AVX | ECX_OSXSAVE, EDX_SSE2, Some(0b111), Some(EBX_AVX2));
        f.max_leaf = 6;
        assert_eq!(f.level(), CapabilityLevel::Avx);
    }

    #[test]
    fn test_detect_is_stable() {
        assert_eq!(detect(), detect());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_detect_agrees_with_std_detection() {
        let level = detect();

        // SSE2 is part of the x86_64 baseline.
        assert_ne!(level, CapabilityLevel::None);
        assert_eq!(
            level == CapabilityLevel::Avx2,
            is_x86_feature_detected!("avx2"),
            "detected {level}"
        );
        assert_eq!(
            matches!(level, CapabilityLevel::Avx | CapabilityLevel::Avx2),
            is_x86_feature_detected!("avx"),
            "detected {level}"
        );
    }

    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    #[test]
    fn test_detect_neon_on_aarch64() {
        assert_eq!(detect(), CapabilityLevel::Neon);
    }
}
