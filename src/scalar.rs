//! Element types for vectors, matrices and quaternions.

use std::fmt::Debug;

use num::Num;

use crate::matrix::{self, Mat4Of};
use crate::vector::{self, Vector};

/// A numeric element type.
///
/// The three hooks are the specialization points of the generic
/// operations: [`Vector::dot`] on 4-vectors and the 4x4 [`Matrix`]
/// products call them instead of their generic loops. The default bodies
/// are those loops; `f32` overrides them with the runtime-dispatched
/// kernels.
///
/// [`Matrix`]: crate::matrix::Matrix
pub trait Scalar: Copy + PartialOrd + Debug + Num {
    /// Dot product of two 4-vectors.
    #[inline(always)]
    fn dot4(a: &Vector<Self, 4>, b: &Vector<Self, 4>) -> Self {
        a.scalar_dot(b)
    }

    /// Product of two 4x4 matrices.
    #[inline(always)]
    fn mat4_mul(a: &Mat4Of<Self>, b: &Mat4Of<Self>) -> Mat4Of<Self> {
        a.scalar_mul(b)
    }

    /// Product of a 4x4 matrix and a 4-vector.
    #[inline(always)]
    fn mat4_mul_vec(m: &Mat4Of<Self>, v: &Vector<Self, 4>) -> Vector<Self, 4> {
        m.scalar_mul_vec(v)
    }
}

impl Scalar for f32 {
    #[inline(always)]
    fn dot4(a: &Vector<f32, 4>, b: &Vector<f32, 4>) -> f32 {
        vector::dot4(a, b)
    }

    #[inline(always)]
    fn mat4_mul(a: &Mat4Of<f32>, b: &Mat4Of<f32>) -> Mat4Of<f32> {
        matrix::mat4_mul(a, b)
    }

    #[inline(always)]
    fn mat4_mul_vec(m: &Mat4Of<f32>, v: &Vector<f32, 4>) -> Vector<f32, 4> {
        matrix::mat4_mul_vec(m, v)
    }
}

impl Scalar for i32 {}

impl Scalar for u32 {}
