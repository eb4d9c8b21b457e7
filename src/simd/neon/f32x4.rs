use std::arch::aarch64::*;

use crate::simd::traits::SimdVec;

pub const LANE_COUNT: usize = 4;

/// Four packed `f32` in a NEON register.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x4 {
    elements: float32x4_t,
}

impl F32x4 {
    /// Loads four values from a possibly unaligned pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `f32` values and the CPU must
    /// support NEON.
    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: unsafe { vld1q_f32(ptr) },
        }
    }

    /// Broadcasts `value` to every lane.
    ///
    /// # Safety
    ///
    /// The CPU must support NEON.
    #[inline(always)]
    pub unsafe fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { vdupq_n_f32(value) },
        }
    }

    /// Pairwise add of the low and high halves, then of the two results:
    /// `(x0 + x1) + (x2 + x3)`.
    ///
    /// # Safety
    ///
    /// The CPU must support NEON.
    #[inline(always)]
    pub unsafe fn horizontal_sum(self) -> f32 {
        unsafe {
            let pairs = vpadd_f32(vget_low_f32(self.elements), vget_high_f32(self.elements));
            vget_lane_f32::<0>(pairs) + vget_lane_f32::<1>(pairs)
        }
    }

    /// Copies the lanes out, lowest first.
    ///
    /// # Safety
    ///
    /// The CPU must support NEON.
    #[inline(always)]
    pub unsafe fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        unsafe { self.store_at(out.as_mut_ptr()) };
        out
    }
}

impl SimdVec for F32x4 {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        unsafe { vst1q_f32(ptr, self.elements) }
    }

    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vaddq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_f32(self.elements, rhs.elements) },
        }
    }
}
