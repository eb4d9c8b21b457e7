//! SSE2 kernels for the 4-wide dispatch points.

use crate::matrix::Mat4;
use crate::simd::sse2::f32x4::F32x4;
use crate::simd::traits::{combine_columns, SimdVec};
use crate::vector::Vec4;

#[inline(always)]
unsafe fn load_columns(m: &Mat4) -> [F32x4; 4] {
    let ptr = m.as_ptr();
    unsafe {
        [
            F32x4::load(ptr),
            F32x4::load(ptr.add(4)),
            F32x4::load(ptr.add(8)),
            F32x4::load(ptr.add(12)),
        ]
    }
}

#[inline(always)]
unsafe fn splat_components(v: &Vec4) -> [F32x4; 4] {
    unsafe {
        [
            F32x4::splat(v[0]),
            F32x4::splat(v[1]),
            F32x4::splat(v[2]),
            F32x4::splat(v[3]),
        ]
    }
}

/// Dot product of two 4-vectors.
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn dot4(a: &Vec4, b: &Vec4) -> f32 {
    unsafe {
        let a = F32x4::load(a.as_ptr());
        let b = F32x4::load(b.as_ptr());
        a.mul(b).horizontal_sum()
    }
}

/// `a * b` for column-major 4x4 matrices, one output column per register.
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = Mat4::zero();
    unsafe {
        let columns = load_columns(a);
        let out_ptr = out.as_mut_ptr();
        for c in 0..4 {
            let weights = splat_components(&b[c]);
            combine_columns(&columns, &weights).store_at(out_ptr.add(c * 4));
        }
    }
    out
}

/// `m * v` for a column-major 4x4 matrix.
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn mat4_mul_vec(m: &Mat4, v: &Vec4) -> Vec4 {
    let mut out = Vec4::zero();
    unsafe {
        let columns = load_columns(m);
        let weights = splat_components(v);
        combine_columns(&columns, &weights).store_at(out.as_mut_ptr());
    }
    out
}
