//! Quaternions.
//!
//! A [`Quaternion<T>`] is stored as its imaginary part `v = (x, y, z)` and
//! real part `w`. Unit quaternions represent rotations; products compose
//! them with the Hamilton convention, so `(p * q).rotate_vec3(v)` rotates by
//! `q` first and then by `p`.
//!
//! Nothing here dispatches on its own: conversions go through the vector and
//! matrix code.

use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use crate::math;
use crate::matrix::{Mat3Of, Mat4, Mat4Of, Matrix};
use crate::scalar::Scalar;
use crate::vector::{Vec3, Vector};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion<T> {
    /// Imaginary part.
    pub v: Vector<T, 3>,
    /// Real part.
    pub w: T,
}

pub type Quat = Quaternion<f32>;

// Axes shorter than this produce the identity rotation.
const MIN_AXIS_LENGTH: f32 = 1e-4;

impl<T: Scalar> Quaternion<T> {
    #[inline(always)]
    pub const fn new(v: Vector<T, 3>, w: T) -> Self {
        Self { v, w }
    }

    /// The rotation that does nothing: `(0, 0, 0, 1)`.
    #[inline]
    pub fn identity() -> Self {
        Self::new(Vector::zero(), T::one())
    }

    #[inline]
    pub fn scale(&self, k: T) -> Self {
        Self::new(self.v.scale(k), self.w * k)
    }

    /// Four-component dot product.
    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.v.dot(&other.v) + self.w * other.w
    }

    /// Hamilton product `self * other`.
    #[inline]
    pub fn hamilton(&self, other: &Self) -> Self {
        let v = self.v.cross(&other.v) + self.v.scale(other.w) + other.v.scale(self.w);
        let w = self.w * other.w - self.v.dot(&other.v);
        Self::new(v, w)
    }

    /// Rotates `v` by this (unit) quaternion.
    ///
    /// Uses `v + w t + q.v x t` with `t = 2 (q.v x v)`, which needs two cross
    /// products instead of two quaternion products.
    #[inline]
    pub fn rotate_vec3(&self, v: &Vector<T, 3>) -> Vector<T, 3> {
        let two = T::one() + T::one();
        let t = self.v.cross(v).scale(two);
        *v + t.scale(self.w) + self.v.cross(&t)
    }

    /// Rotation matrix with a homogeneous corner of 1.
    pub fn to_mat4(&self) -> Mat4Of<T> {
        let r = self.to_mat3();
        let mut m = Mat4Of::<T>::identity();
        for c in 0..3 {
            for row in 0..3 {
                m[c][row] = r[c][row];
            }
        }
        m
    }

    /// The 3x3 rotation matrix. Exact for unit quaternions; a non-unit
    /// quaternion also scales by its squared length.
    pub fn to_mat3(&self) -> Mat3Of<T> {
        let (a, b, c, d) = (self.w, self.v[0], self.v[1], self.v[2]);
        let (a2, b2, c2, d2) = (a * a, b * b, c * c, d * d);
        let two = T::one() + T::one();

        Matrix::from_cols([
            Vector([
                a2 + b2 - c2 - d2,
                two * (b * c + a * d),
                two * (b * d - a * c),
            ]),
            Vector([
                two * (b * c - a * d),
                a2 - b2 + c2 - d2,
                two * (c * d + a * b),
            ]),
            Vector([
                two * (b * d + a * c),
                two * (c * d - a * b),
                a2 - b2 - c2 + d2,
            ]),
        ])
    }
}

impl<T: Scalar + Neg<Output = T>> Quaternion<T> {
    /// `(-v, w)`; the inverse of a unit quaternion.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.v, self.w)
    }
}

impl Quaternion<f32> {
    #[inline]
    pub fn length(&self) -> f32 {
        math::sqrt(self.dot(self))
    }

    /// Unit quaternion in the same direction. Zero stays zero.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::new(Vector::zero(), 0.0);
        }
        self.scale(1.0 / len)
    }

    /// Rotation by `angle` radians about `axis`. The axis need not be
    /// normalized; one of length at most 1e-4 yields the identity.
    pub fn from_axis_angle(axis: &Vec3, angle: f32) -> Self {
        if axis.length() <= MIN_AXIS_LENGTH {
            return Self::identity();
        }
        let half = angle * 0.5;
        Self::new(axis.normalize() * math::sin(half), math::cos(half))
    }

    /// Recovers the rotation from the upper 3x3 block of `m`.
    ///
    /// Shepperd's method: the square root is taken of whichever of the trace
    /// and the three diagonal terms is largest, which keeps the divisor away
    /// from zero for every rotation. The result is a unit quaternion; `q` and
    /// `-q` describe the same rotation and either may be returned.
    pub fn from_mat4(m: &Mat4) -> Self {
        // r(row, col)
        let r = |row: usize, col: usize| m[col][row];
        let (m00, m11, m22) = (r(0, 0), r(1, 1), r(2, 2));
        let trace = m00 + m11 + m22;

        let q = if trace >= m00 && trace >= m11 && trace >= m22 {
            let s = 2.0 * math::sqrt(1.0 + trace);
            Self::new(
                Vector([
                    (r(2, 1) - r(1, 2)) / s,
                    (r(0, 2) - r(2, 0)) / s,
                    (r(1, 0) - r(0, 1)) / s,
                ]),
                0.25 * s,
            )
        } else if m00 >= m11 && m00 >= m22 {
            let s = 2.0 * math::sqrt(1.0 + m00 - m11 - m22);
            Self::new(
                Vector([
                    0.25 * s,
                    (r(0, 1) + r(1, 0)) / s,
                    (r(0, 2) + r(2, 0)) / s,
                ]),
                (r(2, 1) - r(1, 2)) / s,
            )
        } else if m11 >= m22 {
            let s = 2.0 * math::sqrt(1.0 + m11 - m00 - m22);
            Self::new(
                Vector([
                    (r(0, 1) + r(1, 0)) / s,
                    0.25 * s,
                    (r(1, 2) + r(2, 1)) / s,
                ]),
                (r(0, 2) - r(2, 0)) / s,
            )
        } else {
            let s = 2.0 * math::sqrt(1.0 + m22 - m00 - m11);
            Self::new(
                Vector([
                    (r(0, 2) + r(2, 0)) / s,
                    (r(1, 2) + r(2, 1)) / s,
                    0.25 * s,
                ]),
                (r(1, 0) - r(0, 1)) / s,
            )
        };

        q.normalize()
    }
}

impl<T: Scalar> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

/// `q[0..3]` is `v`, `q[3]` is `w`.
impl<T> Index<usize> for Quaternion<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match index {
            0..=2 => &self.v.0[index],
            3 => &self.w,
            _ => panic!("quaternion index out of range: {index}"),
        }
    }
}

impl<T> IndexMut<usize> for Quaternion<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0..=2 => &mut self.v.0[index],
            3 => &mut self.w,
            _ => panic!("quaternion index out of range: {index}"),
        }
    }
}

impl<T: Scalar> Add for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.v + rhs.v, self.w + rhs.w)
    }
}

impl<T: Scalar> Sub for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.v - rhs.v, self.w - rhs.w)
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.v, -self.w)
    }
}

impl<T: Scalar> Mul for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.hamilton(&rhs)
    }
}

impl<T: Scalar> Mul<Vector<T, 3>> for Quaternion<T> {
    type Output = Vector<T, 3>;

    #[inline]
    fn mul(self, v: Vector<T, 3>) -> Vector<T, 3> {
        self.rotate_vec3(&v)
    }
}

macro_rules! impl_scalar_ops {
    ($($t:ty),+) => {
        $(
            impl Mul<$t> for Quaternion<$t> {
                type Output = Self;

                #[inline]
                fn mul(self, k: $t) -> Self {
                    self.scale(k)
                }
            }

            impl Mul<Quaternion<$t>> for $t {
                type Output = Quaternion<$t>;

                #[inline]
                fn mul(self, q: Quaternion<$t>) -> Quaternion<$t> {
                    q.scale(self)
                }
            }
        )+
    };
}

impl_scalar_ops!(f32, i32, u32);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{PI, PI_HALF};
    use crate::vector::{vec3, vec4};

    const EPS: f32 = 1e-2;

    fn assert_quat_close(actual: Quat, expected: Quat, eps: f32) {
        for i in 0..4 {
            assert!(
                (actual[i] - expected[i]).abs() <= eps,
                "component {i}: {actual:?} != {expected:?}"
            );
        }
    }

    fn assert_vec3_close(actual: Vec3, expected: Vec3, eps: f32) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() <= eps,
                "component {i}: {actual:?} != {expected:?}"
            );
        }
    }

    fn sample() -> Quat {
        Quat::new(vec3(0.5, -1.0, 2.0), 1.5)
    }

    #[test]
    fn test_identity_is_neutral() {
        let q = sample();
        assert_eq!(q * Quat::identity(), q);
        assert_eq!(Quat::identity() * q, q);
        assert_eq!(Quat::default(), Quat::identity());
    }

    #[test]
    fn test_conjugate_product() {
        let q = sample();
        let p = q * q.conjugate();
        assert_eq!(p.v, Vec3::zero());
        assert_eq!(p.w, q.dot(&q));
    }

    #[test]
    fn test_integer_quaternions() {
        let q = Quaternion::<i32>::new(Vector([1, 2, 3]), 4);
        let p = q * q.conjugate();
        assert_eq!(p, Quaternion::new(Vector([0, 0, 0]), 30));
        assert_eq!(2 * q, q * 2);
        assert_eq!(-q + q, Quaternion::new(Vector([0, 0, 0]), 0));
    }

    #[test]
    fn test_hamilton_basis() {
        let i = Quat::new(vec3(1.0, 0.0, 0.0), 0.0);
        let j = Quat::new(vec3(0.0, 1.0, 0.0), 0.0);
        let k = Quat::new(vec3(0.0, 0.0, 1.0), 0.0);
        assert_eq!(i * j, k);
        assert_eq!(j * k, i);
        assert_eq!(k * i, j);
        assert_eq!(i * i, Quat::new(Vec3::zero(), -1.0));
    }

    #[test]
    fn test_arithmetic_and_index() {
        let a = sample();
        let b = Quat::new(vec3(1.0, 1.0, 1.0), 1.0);
        assert_eq!(a + b - b, a);
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(a.scale(0.5)[3], 0.75);

        let mut c = a;
        c[0] = 9.0;
        c[3] = -1.0;
        assert_eq!(c, Quat::new(vec3(9.0, -1.0, 2.0), -1.0));
    }

    #[test]
    #[should_panic(expected = "quaternion index out of range")]
    fn test_index_out_of_range() {
        let _ = sample()[4];
    }

    #[test]
    fn test_normalize() {
        let q = sample().normalize();
        assert!((q.length() - 1.0).abs() < EPS);

        let zero = Quat::new(Vec3::zero(), 0.0);
        assert_eq!(zero.normalize(), zero);
    }

    #[test]
    fn test_axis_angle_rotation() {
        let q = Quat::from_axis_angle(&vec3(0.0, 0.0, 2.0), PI_HALF);
        assert_vec3_close(q.rotate_vec3(&vec3(1.0, 0.0, 0.0)), vec3(0.0, 1.0, 0.0), EPS);
        assert_vec3_close(q * vec3(0.0, 1.0, 0.0), vec3(-1.0, 0.0, 0.0), EPS);

        assert_eq!(Quat::from_axis_angle(&Vec3::zero(), 1.0), Quat::identity());
    }

    #[test]
    fn test_composition_order() {
        let about_z = Quat::from_axis_angle(&vec3(0.0, 0.0, 1.0), PI_HALF);
        let about_x = Quat::from_axis_angle(&vec3(1.0, 0.0, 0.0), PI_HALF);
        // z first, then x: (1,0,0) -> (0,1,0) -> (0,0,1)
        let v = (about_x * about_z).rotate_vec3(&vec3(1.0, 0.0, 0.0));
        assert_vec3_close(v, vec3(0.0, 0.0, 1.0), EPS);
    }

    #[test]
    fn test_to_mat4_matches_rotation() {
        let axis = vec3(1.0, 2.0, -0.5);
        let q = Quat::from_axis_angle(&axis, 0.8);
        let m = q.to_mat4();
        let expected = Mat4::rotation(&axis, 0.8);
        for c in 0..4 {
            for r in 0..4 {
                assert!((m[c][r] - expected[c][r]).abs() < EPS, "[{c}][{r}]");
            }
        }

        let p = vec3(0.3, -0.7, 1.1);
        let via_matrix = m * vec4(p[0], p[1], p[2], 1.0);
        assert_vec3_close(
            q.rotate_vec3(&p),
            vec3(via_matrix[0], via_matrix[1], via_matrix[2]),
            EPS,
        );
    }

    #[test]
    fn test_to_mat3_is_upper_block_of_to_mat4() {
        let q = sample().normalize();
        let m3 = q.to_mat3();
        let m4 = q.to_mat4();
        for c in 0..3 {
            for r in 0..3 {
                assert_eq!(m3[c][r], m4[c][r]);
            }
        }
        assert_eq!(m4[3], vec4(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_mat4_round_trip_every_branch() {
        // Large trace, then each diagonal term dominating in turn.
        let cases = [
            (vec3(1.0, 1.0, 1.0), 0.3),
            (vec3(1.0, 0.1, 0.0), PI - 0.1),
            (vec3(0.1, 1.0, 0.0), PI - 0.1),
            (vec3(0.0, 0.1, 1.0), PI - 0.1),
            (vec3(0.0, 0.0, 1.0), PI),
        ];
        for (axis, angle) in cases {
            let q = Quat::from_axis_angle(&axis, angle);
            let back = Quat::from_mat4(&q.to_mat4());
            let same = if back.dot(&q) < 0.0 { -back } else { back };
            assert_quat_close(same, q, EPS);
        }
    }
}
