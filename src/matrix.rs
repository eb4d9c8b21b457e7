//! Column-major matrices.
//!
//! [`Matrix<T, C, R>`] stores `C` columns of `R` rows each. `m[c]` is a
//! column and `m[c][r]` the element in column `c`, row `r`. The columns are
//! contiguous, so a [`Mat4`] is 16 packed `f32` in the layout OpenGL
//! expects.
//!
//! The 4x4 `f32` products have runtime-dispatched kernels ([`mat4_mul`],
//! [`mat4_mul_vec`]); everything else is generic scalar code.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::math;
use crate::scalar::Scalar;
use crate::simd::dispatch::{current_level, kernel_level};
use crate::simd::CapabilityLevel;
use crate::vector::{vec4, Vec2, Vec3, Vec4, Vector};

#[cfg(simd_neon)]
use crate::simd::neon;
#[cfg(simd_x86)]
use crate::simd::{avx, sse2};

/// A `C`-column, `R`-row matrix of `T`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct Matrix<T, const C: usize, const R: usize> {
    cols: [Vector<T, R>; C],
}

pub type Mat2x3Of<T> = Matrix<T, 2, 3>;
pub type Mat3Of<T> = Matrix<T, 3, 3>;
pub type Mat4Of<T> = Matrix<T, 4, 4>;
pub type Mat2x3 = Mat2x3Of<f32>;
pub type Mat3 = Mat3Of<f32>;
pub type Mat4 = Mat4Of<f32>;

const _: () = assert!(std::mem::size_of::<Mat2x3>() == 24);
const _: () = assert!(std::mem::size_of::<Mat3>() == 36);
const _: () = assert!(std::mem::size_of::<Mat4>() == 64);

// Axes shorter than this leave `rotate` a no-op.
const MIN_AXIS_LENGTH: f32 = 1e-4;

impl<T: Scalar, const C: usize, const R: usize> Matrix<T, C, R> {
    #[inline]
    pub fn zero() -> Self {
        Self {
            cols: [Vector::zero(); C],
        }
    }

    #[inline(always)]
    pub const fn from_cols(cols: [Vector<T, R>; C]) -> Self {
        Self { cols }
    }

    /// Builds a matrix from `f(column, row)`.
    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        Self {
            cols: std::array::from_fn(|c| Vector::from_fn(|r| f(c, r))),
        }
    }

    #[inline(always)]
    pub fn cols(&self) -> &[Vector<T, R>; C] {
        &self.cols
    }

    #[inline(always)]
    pub fn col(&self, c: usize) -> Vector<T, R> {
        self.cols[c]
    }

    #[inline]
    pub fn row(&self, r: usize) -> Vector<T, C> {
        Vector::from_fn(|c| self.cols[c][r])
    }

    /// Pointer to element `[0][0]`. All `C * R` elements follow in
    /// column-major order.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.cols.as_ptr().cast::<T>()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.cols.as_mut_ptr().cast::<T>()
    }

    #[inline]
    pub fn scale(&self, k: T) -> Self {
        Self::from_fn(|c, r| self.cols[c][r] * k)
    }

    #[inline]
    pub fn transpose(&self) -> Matrix<T, R, C> {
        Matrix::from_fn(|c, r| self.cols[r][c])
    }

    /// `a * b^T`: element `[c][r]` is `a[r] * b[c]`.
    #[inline]
    pub fn outer_product(a: &Vector<T, R>, b: &Vector<T, C>) -> Self {
        Self::from_fn(|c, r| a[r] * b[c])
    }

    /// `self * rhs` as a plain triple loop.
    pub fn scalar_mul<const K: usize>(&self, rhs: &Matrix<T, K, C>) -> Matrix<T, K, R> {
        Matrix::from_fn(|c, r| {
            (0..C).fold(T::zero(), |acc, k| acc + self.cols[k][r] * rhs.cols[c][k])
        })
    }

    /// `self * v` as a plain loop over the columns.
    pub fn scalar_mul_vec(&self, v: &Vector<T, C>) -> Vector<T, R> {
        Vector::from_fn(|r| {
            (0..C).fold(T::zero(), |acc, c| acc + self.cols[c][r] * v[c])
        })
    }

    /// `self * rhs`. 4x4 products go through [`Scalar::mat4_mul`].
    #[inline]
    pub fn mul_mat<const K: usize>(&self, rhs: &Matrix<T, K, C>) -> Matrix<T, K, R> {
        if C == 4 && K == 4 && R == 4 {
            let a = Mat4Of::<T>::from_fn(|c, r| self.cols[c][r]);
            let b = Mat4Of::<T>::from_fn(|c, r| rhs.cols[c][r]);
            let product = T::mat4_mul(&a, &b);
            Matrix::from_fn(|c, r| product.cols[c][r])
        } else {
            self.scalar_mul(rhs)
        }
    }

    /// `self * v`. 4x4 products go through [`Scalar::mat4_mul_vec`].
    #[inline]
    pub fn mul_vec(&self, v: &Vector<T, C>) -> Vector<T, R> {
        if C == 4 && R == 4 {
            let m = Mat4Of::<T>::from_fn(|c, r| self.cols[c][r]);
            let v = Vector::<T, 4>::from_fn(|i| v[i]);
            let product = T::mat4_mul_vec(&m, &v);
            Vector::from_fn(|r| product[r])
        } else {
            self.scalar_mul_vec(v)
        }
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    #[inline]
    pub fn identity() -> Self {
        Self::from_fn(|c, r| if c == r { T::one() } else { T::zero() })
    }
}

/// `a * b` on the active capability level.
#[inline]
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    mat4_mul_with(current_level(), a, b)
}

/// `a * b` on an explicit capability level.
///
/// A level the host cannot execute falls back to [`Matrix::scalar_mul`].
#[inline]
pub fn mat4_mul_with(level: CapabilityLevel, a: &Mat4, b: &Mat4) -> Mat4 {
    match kernel_level(level) {
        #[cfg(simd_x86)]
        CapabilityLevel::Avx | CapabilityLevel::Avx2 => unsafe { avx::kernels::mat4_mul(a, b) },
        #[cfg(simd_x86)]
        CapabilityLevel::Sse2 => unsafe { sse2::kernels::mat4_mul(a, b) },
        #[cfg(simd_neon)]
        CapabilityLevel::Neon => unsafe { neon::kernels::mat4_mul(a, b) },
        _ => a.scalar_mul(b),
    }
}

/// `m * v` on the active capability level.
#[inline]
pub fn mat4_mul_vec(m: &Mat4, v: &Vec4) -> Vec4 {
    mat4_mul_vec_with(current_level(), m, v)
}

/// `m * v` on an explicit capability level.
///
/// A level the host cannot execute falls back to [`Matrix::scalar_mul_vec`].
#[inline]
pub fn mat4_mul_vec_with(level: CapabilityLevel, m: &Mat4, v: &Vec4) -> Vec4 {
    match kernel_level(level) {
        #[cfg(simd_x86)]
        CapabilityLevel::Sse2 | CapabilityLevel::Avx | CapabilityLevel::Avx2 => unsafe {
            sse2::kernels::mat4_mul_vec(m, v)
        },
        #[cfg(simd_neon)]
        CapabilityLevel::Neon => unsafe { neon::kernels::mat4_mul_vec(m, v) },
        _ => m.scalar_mul_vec(v),
    }
}

/// 3D transforms. Right-handed, column vectors, clip-space z in [-1, 1].
impl Matrix<f32, 4, 4> {
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.cols[3] = vec4(x, y, z, 1.0);
        m
    }

    /// Anisotropic scale.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.cols[0][0] = x;
        m.cols[1][1] = y;
        m.cols[2][2] = z;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = (math::sin(angle), math::cos(angle));
        let mut m = Self::identity();
        m.cols[1] = vec4(0.0, c, s, 0.0);
        m.cols[2] = vec4(0.0, -s, c, 0.0);
        m
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = (math::sin(angle), math::cos(angle));
        let mut m = Self::identity();
        m.cols[0] = vec4(c, 0.0, -s, 0.0);
        m.cols[2] = vec4(s, 0.0, c, 0.0);
        m
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = (math::sin(angle), math::cos(angle));
        let mut m = Self::identity();
        m.cols[0] = vec4(c, s, 0.0, 0.0);
        m.cols[1] = vec4(-s, c, 0.0, 0.0);
        m
    }

    /// Rotation by `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// The axis need not be normalized. An axis of length at most 1e-4
    /// yields the identity.
    pub fn rotation(axis: &Vec3, angle: f32) -> Self {
        if axis.length() <= MIN_AXIS_LENGTH {
            return Self::identity();
        }

        let u = axis.normalize();
        let (s, c) = (math::sin(angle), math::cos(angle));

        // u (x) u
        let uu = Matrix::<f32, 3, 3>::outer_product(&u, &u);
        // [u]x, the cross-product matrix
        let cross = Matrix::<f32, 3, 3>::from_cols([
            Vector([0.0, u[2], -u[1]]),
            Vector([-u[2], 0.0, u[0]]),
            Vector([u[1], -u[0], 0.0]),
        ]);
        let r = uu + (Mat3::identity() - uu).scale(c) + cross.scale(s);

        let mut m = Self::identity();
        for col in 0..3 {
            for row in 0..3 {
                m.cols[col][row] = r.cols[col][row];
            }
        }
        m
    }

    /// Perspective projection. `fov_y` is the full vertical field of view
    /// in radians.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let a = 1.0 / math::tan(fov_y * 0.5);
        let depth = far - near;

        let mut m = Self::zero();
        m.cols[0][0] = a / aspect;
        m.cols[1][1] = a;
        m.cols[2][2] = -(far + near) / depth;
        m.cols[2][3] = -1.0;
        m.cols[3][2] = -(2.0 * far * near) / depth;
        m
    }

    /// Orthographic projection of the given view box.
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut m = Self::zero();
        m.cols[0][0] = 2.0 / (right - left);
        m.cols[1][1] = 2.0 / (top - bottom);
        m.cols[2][2] = -2.0 / (far - near);
        m.cols[3] = vec4(
            -(right + left) / (right - left),
            -(top + bottom) / (top - bottom),
            -(far + near) / (far - near),
            1.0,
        );
        m
    }

    /// `self * rotation(axis, angle)`. Returns `self` unchanged for an axis
    /// of length at most 1e-4.
    pub fn rotate(&self, axis: &Vec3, angle: f32) -> Self {
        if axis.length() <= MIN_AXIS_LENGTH {
            return *self;
        }
        *self * Self::rotation(axis, angle)
    }

    pub fn rotate_x(&self, angle: f32) -> Self {
        *self * Self::rotation_x(angle)
    }

    pub fn rotate_y(&self, angle: f32) -> Self {
        *self * Self::rotation_y(angle)
    }

    pub fn rotate_z(&self, angle: f32) -> Self {
        *self * Self::rotation_z(angle)
    }

    /// `self * scaling(x, y, z)`: scales the first three columns.
    pub fn scale_aniso(&self, x: f32, y: f32, z: f32) -> Self {
        Self::from_cols([
            self.cols[0] * x,
            self.cols[1] * y,
            self.cols[2] * z,
            self.cols[3],
        ])
    }

    /// `self = self * translation(x, y, z)`.
    pub fn translate_in_place(&mut self, x: f32, y: f32, z: f32) {
        let t = vec4(x, y, z, 0.0);
        for r in 0..4 {
            self.cols[3][r] += self.row(r).dot(&t);
        }
    }
}

/// 2D homogeneous transforms.
impl Matrix<f32, 3, 3> {
    pub fn translation(x: f32, y: f32) -> Self {
        let mut m = Self::identity();
        m.cols[2][0] = x;
        m.cols[2][1] = y;
        m
    }

    pub fn scaling(x: f32, y: f32) -> Self {
        let mut m = Self::identity();
        m.cols[0][0] = x;
        m.cols[1][1] = y;
        m
    }

    pub fn rotation(angle: f32) -> Self {
        let (s, c) = (math::sin(angle), math::cos(angle));
        let mut m = Self::identity();
        m.cols[0] = Vector([c, s, 0.0]);
        m.cols[1] = Vector([-s, c, 0.0]);
        m
    }
}

/// Compact 2D affine transforms.
///
/// A [`Mat2x3`] maps the homogeneous row vector `(x, y, 1)` to a point:
/// `vec3(x, y, 1.0) * m`. Each column holds one output coordinate with its
/// translation in row 2.
impl Matrix<f32, 2, 3> {
    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            cols: [Vector([1.0, 0.0, x]), Vector([0.0, 1.0, y])],
        }
    }

    pub fn scaling(x: f32, y: f32) -> Self {
        Self {
            cols: [Vector([x, 0.0, 0.0]), Vector([0.0, y, 0.0])],
        }
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = (math::sin(angle), math::cos(angle));
        Self {
            cols: [Vector([c, -s, 0.0]), Vector([s, c, 0.0])],
        }
    }

    #[inline]
    pub fn transform_point(&self, p: &Vec2) -> Vec2 {
        Vector([p[0], p[1], 1.0]) * *self
    }
}

impl<T: Scalar, const C: usize, const R: usize> Default for Matrix<T, C, R> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T, const C: usize, const R: usize> Index<usize> for Matrix<T, C, R> {
    type Output = Vector<T, R>;

    #[inline(always)]
    fn index(&self, c: usize) -> &Vector<T, R> {
        &self.cols[c]
    }
}

impl<T, const C: usize, const R: usize> IndexMut<usize> for Matrix<T, C, R> {
    #[inline(always)]
    fn index_mut(&mut self, c: usize) -> &mut Vector<T, R> {
        &mut self.cols[c]
    }
}

impl<T: Scalar, const C: usize, const R: usize> Add for Matrix<T, C, R> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|c, r| self.cols[c][r] + rhs.cols[c][r])
    }
}

impl<T: Scalar, const C: usize, const R: usize> Sub for Matrix<T, C, R> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|c, r| self.cols[c][r] - rhs.cols[c][r])
    }
}

impl<T: Scalar + Neg<Output = T>, const C: usize, const R: usize> Neg for Matrix<T, C, R> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_fn(|c, r| -self.cols[c][r])
    }
}

impl<T: Scalar, const C: usize, const R: usize> AddAssign for Matrix<T, C, R> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar, const C: usize, const R: usize> SubAssign for Matrix<T, C, R> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Scalar, const K: usize, const C: usize, const R: usize> Mul<Matrix<T, K, C>>
    for Matrix<T, C, R>
{
    type Output = Matrix<T, K, R>;

    #[inline]
    fn mul(self, rhs: Matrix<T, K, C>) -> Matrix<T, K, R> {
        self.mul_mat(&rhs)
    }
}

impl<T: Scalar, const C: usize, const R: usize> Mul<Vector<T, C>> for Matrix<T, C, R> {
    type Output = Vector<T, R>;

    #[inline]
    fn mul(self, v: Vector<T, C>) -> Vector<T, R> {
        self.mul_vec(&v)
    }
}

/// Row vector times matrix: `v^T * m`.
impl<T: Scalar, const C: usize, const R: usize> Mul<Matrix<T, C, R>> for Vector<T, R> {
    type Output = Vector<T, C>;

    #[inline]
    fn mul(self, m: Matrix<T, C, R>) -> Vector<T, C> {
        Vector::from_fn(|c| self.dot(&m.cols[c]))
    }
}

macro_rules! impl_scalar_ops {
    ($($t:ty),+) => {
        $(
            impl<const C: usize, const R: usize> Mul<$t> for Matrix<$t, C, R> {
                type Output = Self;

                #[inline]
                fn mul(self, k: $t) -> Self {
                    self.scale(k)
                }
            }

            impl<const C: usize, const R: usize> Mul<Matrix<$t, C, R>> for $t {
                type Output = Matrix<$t, C, R>;

                #[inline]
                fn mul(self, m: Matrix<$t, C, R>) -> Matrix<$t, C, R> {
                    m.scale(self)
                }
            }

            impl<const C: usize, const R: usize> MulAssign<$t> for Matrix<$t, C, R> {
                #[inline]
                fn mul_assign(&mut self, k: $t) {
                    *self = self.scale(k);
                }
            }
        )+
    };
}

impl_scalar_ops!(f32, i32, u32);
