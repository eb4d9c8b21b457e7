use crate::matrix::Mat4;
use crate::simd::avx::f32x8::F32x8;
use crate::simd::traits::{combine_columns, SimdVec};

/// `a * b` for column-major 4x4 matrices.
///
/// Each register holds two adjacent output columns. The columns of `a` are
/// duplicated into both halves and multiplied by weights whose low half comes
/// from `b[c]` and high half from `b[c + 1]`, so the store lands both
/// columns at once. Rounding matches the SSE2 kernel lane for lane.
///
/// # Safety
///
/// The CPU must support AVX and the OS must have enabled YMM state.
#[target_feature(enable = "avx")]
pub unsafe fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = Mat4::zero();
    unsafe {
        let a_ptr = a.as_ptr();
        let columns = [
            F32x8::load_duplicated(a_ptr),
            F32x8::load_duplicated(a_ptr.add(4)),
            F32x8::load_duplicated(a_ptr.add(8)),
            F32x8::load_duplicated(a_ptr.add(12)),
        ];

        let out_ptr = out.as_mut_ptr();
        for c in [0, 2] {
            let (left, right) = (&b[c], &b[c + 1]);
            let weights = [
                F32x8::splat_halves(left[0], right[0]),
                F32x8::splat_halves(left[1], right[1]),
                F32x8::splat_halves(left[2], right[2]),
                F32x8::splat_halves(left[3], right[3]),
            ];
            combine_columns(&columns, &weights).store_at(out_ptr.add(c * 4));
        }
    }
    out
}
