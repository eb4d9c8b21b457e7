#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::SimdVec;

pub const LANE_COUNT: usize = 8;

/// Eight packed `f32` in an AVX register.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x8 {
    elements: __m256,
}

impl F32x8 {
    /// Loads four values and repeats them in both 128-bit halves.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `f32` values and the CPU must
    /// support AVX.
    #[inline(always)]
    pub unsafe fn load_duplicated(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        unsafe {
            let half = _mm_loadu_ps(ptr);
            Self {
                elements: _mm256_insertf128_ps::<1>(_mm256_castps128_ps256(half), half),
            }
        }
    }

    /// `lo` in the low four lanes, `hi` in the high four.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[inline(always)]
    pub unsafe fn splat_halves(lo: f32, hi: f32) -> Self {
        Self {
            elements: unsafe { _mm256_setr_ps(lo, lo, lo, lo, hi, hi, hi, hi) },
        }
    }

    /// Copies the lanes out, lowest first.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX.
    #[inline(always)]
    pub unsafe fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        unsafe { self.store_at(out.as_mut_ptr()) };
        out
    }
}

impl SimdVec for F32x8 {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        unsafe { _mm256_storeu_ps(ptr, self.elements) }
    }

    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_add_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_mul_ps(self.elements, rhs.elements) },
        }
    }
}
