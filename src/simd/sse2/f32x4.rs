#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::SimdVec;

pub const LANE_COUNT: usize = 4;

// _MM_SHUFFLE(2, 3, 0, 1): swap adjacent lanes.
const SWAP_PAIRS: i32 = 0b10_11_00_01;

/// Four packed `f32` in an SSE register.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x4 {
    elements: __m128,
}

impl F32x4 {
    /// Loads four values from a possibly unaligned pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 `f32` values and the CPU must
    /// support SSE2.
    #[inline(always)]
    pub unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: unsafe { _mm_loadu_ps(ptr) },
        }
    }

    /// Broadcasts `value` to every lane.
    ///
    /// # Safety
    ///
    /// The CPU must support SSE2.
    #[inline(always)]
    pub unsafe fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm_set1_ps(value) },
        }
    }

    /// `(x0 + x1) + (x2 + x3)` via shuffle, add, move-high and a scalar add.
    ///
    /// # Safety
    ///
    /// The CPU must support SSE2.
    #[inline(always)]
    pub unsafe fn horizontal_sum(self) -> f32 {
        unsafe {
            let v = self.elements;
            let shuf = _mm_shuffle_ps::<SWAP_PAIRS>(v, v);
            let sums = _mm_add_ps(v, shuf);
            let high = _mm_movehl_ps(shuf, sums);
            _mm_cvtss_f32(_mm_add_ss(sums, high))
        }
    }

    /// Copies the lanes out, lowest first.
    ///
    /// # Safety
    ///
    /// The CPU must support SSE2.
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

        unsafe { _mm_storeu_ps(ptr, self.elements) }
    }

    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_add_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_mul_ps(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store() {
        let data = [1.0f32, -2.0, 3.5, 4.25];
        let lanes = unsafe { F32x4::load(data.as_ptr()).to_array() };
        assert_eq!(lanes, data);
    }

    #[test]
    fn test_load_unaligned() {
        // Offset by one float so the load address is not 16-byte aligned.
        let data = [0.0f32, 1.0, 2.0, 3.0, 4.0];
        let lanes = unsafe { F32x4::load(data.as_ptr().add(1)).to_array() };
        assert_eq!(lanes, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_splat_add_mul() {
        let data = [1.0f32, 2.0, 3.0, 4.0];
        let lanes = unsafe {
            let v = F32x4::load(data.as_ptr());
            v.mul(F32x4::splat(2.0)).add(F32x4::splat(0.5)).to_array()
        };
        assert_eq!(lanes, [2.5, 4.5, 6.5, 8.5]);
    }

    #[test]
    fn test_horizontal_sum() {
        let data = [1.0f32, 2.0, 3.0, 4.0];
        let sum = unsafe { F32x4::load(data.as_ptr()).horizontal_sum() };
        assert_eq!(sum, 10.0);

        let data = [1e8f32, 1.0, -1e8, 1.0];
        let sum = unsafe { F32x4::load(data.as_ptr()).horizontal_sum() };
        assert_eq!(sum, (1e8f32 + 1.0) + (-1e8 + 1.0));
    }
}
