//! Fixed-size vectors.
//!
//! [`Vector<T, N>`] is a transparent wrapper over `[T; N]`: exactly `N`
//! scalars, no padding. A [`Vec4`] can therefore be read with a single
//! unaligned 128-bit load, which is what the dispatched [`dot4`] does.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::math;
use crate::scalar::Scalar;
use crate::simd::dispatch::{current_level, kernel_level};
use crate::simd::CapabilityLevel;

#[cfg(simd_neon)]
use crate::simd::neon;
#[cfg(simd_x86)]
use crate::simd::sse2;

/// An `N`-component vector of `T`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>(pub [T; N]);

pub type Vec2 = Vector<f32, 2>;
pub type Vec3 = Vector<f32, 3>;
pub type Vec4 = Vector<f32, 4>;

pub type IVec2 = Vector<i32, 2>;
pub type IVec3 = Vector<i32, 3>;
pub type IVec4 = Vector<i32, 4>;

pub type UVec2 = Vector<u32, 2>;
pub type UVec3 = Vector<u32, 3>;
pub type UVec4 = Vector<u32, 4>;

const _: () = assert!(std::mem::size_of::<Vec2>() == 8);
const _: () = assert!(std::mem::size_of::<Vec3>() == 12);
const _: () = assert!(std::mem::size_of::<Vec4>() == 16);
const _: () = assert!(std::mem::align_of::<Vec4>() == std::mem::align_of::<f32>());

#[inline(always)]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vector([x, y])
}

#[inline(always)]
pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vector([x, y, z])
}

#[inline(always)]
pub fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vector([x, y, z, w])
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    #[inline(always)]
    pub const fn new(components: [T; N]) -> Self {
        Self(components)
    }

    /// Builds a vector from its component index.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self(std::array::from_fn(f))
    }

    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self([value; N])
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::zero())
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    /// Pointer to the first component. The `N` components are contiguous.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr()
    }

    /// Multiplies every component by `k`.
    #[inline]
    pub fn scale(&self, k: T) -> Self {
        Self::from_fn(|i| self.0[i] * k)
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&self, other: &Self) -> Self {
        Self::from_fn(|i| {
            if self.0[i] < other.0[i] {
                self.0[i]
            } else {
                other.0[i]
            }
        })
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&self, other: &Self) -> Self {
        Self::from_fn(|i| {
            if self.0[i] > other.0[i] {
                self.0[i]
            } else {
                other.0[i]
            }
        })
    }

    /// Dot product as a plain left-to-right loop. This is the reference the
    /// accelerated paths are checked against.
    #[inline]
    pub fn scalar_dot(&self, other: &Self) -> T {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    /// Dot product. For `N == 4` this goes through [`Scalar::dot4`], which
    /// for `f32` is the runtime-dispatched [`dot4`].
    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        if N == 4 {
            let a = Vector::<T, 4>::from_fn(|i| self.0[i]);
            let b = Vector::<T, 4>::from_fn(|i| other.0[i]);
            T::dot4(&a, &b)
        } else {
            self.scalar_dot(other)
        }
    }

    #[inline]
    pub fn length_squared(&self) -> T {
        self.dot(self)
    }
}

impl<const N: usize> Vector<f32, N> {
    #[inline]
    pub fn length(&self) -> f32 {
        math::sqrt(self.length_squared())
    }

    /// Unit vector in the same direction. The zero vector maps to itself.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::zero();
        }
        self.scale(1.0 / len)
    }
}

macro_rules! impl_accessors {
    ($n:literal => $($name:ident: $idx:literal),+) => {
        impl<T: Scalar> Vector<T, $n> {
            $(
                #[inline(always)]
                pub fn $name(&self) -> T {
                    self.0[$idx]
                }
            )+
        }
    };
}

impl_accessors!(2 => x: 0, y: 1);
impl_accessors!(3 => x: 0, y: 1, z: 2);
impl_accessors!(4 => x: 0, y: 1, z: 2, w: 3);

impl<T: Scalar> Vector<T, 3> {
    /// Right-handed cross product.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        Self([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }

    /// Reflection of `self` about the plane with normal `normal`:
    /// `v - n * 2(v.n)`. `normal` is expected to be unit length.
    #[inline]
    pub fn reflect(&self, normal: &Self) -> Self {
        let two = T::one() + T::one();
        *self - normal.scale(two * self.dot(normal))
    }
}

impl<T: Scalar> Vector<T, 4> {
    /// Cross product of the xyz parts. `w` of the result is always 1.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        Self([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
            T::one(),
        ])
    }

    /// Reflection over all four components.
    #[inline]
    pub fn reflect(&self, normal: &Self) -> Self {
        let two = T::one() + T::one();
        *self - normal.scale(two * self.dot(normal))
    }
}

/// Dot product of two [`Vec4`] on the active capability level.
#[inline]
pub fn dot4(a: &Vec4, b: &Vec4) -> f32 {
    dot4_with(current_level(), a, b)
}

/// Dot product of two [`Vec4`] on an explicit capability level.
///
/// A level the host cannot execute falls back to [`Vector::scalar_dot`].
#[inline]
pub fn dot4_with(level: CapabilityLevel, a: &Vec4, b: &Vec4) -> f32 {
    match kernel_level(level) {
        #[cfg(simd_x86)]
        CapabilityLevel::Sse2 | CapabilityLevel::Avx | CapabilityLevel::Avx2 => unsafe {
            sse2::kernels::dot4(a, b)
        },
        #[cfg(simd_neon)]
        CapabilityLevel::Neon => unsafe { neon::kernels::dot4(a, b) },
        _ => a.scalar_dot(b),
    }
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(components: [T; N]) -> Self {
        Self(components)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    fn from(v: Vector<T, N>) -> Self {
        v.0
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T: Scalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.0[i] + rhs.0[i])
    }
}

impl<T: Scalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.0[i] - rhs.0[i])
    }
}

impl<T: Scalar + Neg<Output = T>, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_fn(|i| -self.0[i])
    }
}

impl<T: Scalar, const N: usize> AddAssign for Vector<T, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar, const N: usize> SubAssign for Vector<T, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

// Scalar operands are implemented per element type: a blanket
// `impl<T> Mul<Vector<T, N>> for T` is not allowed for foreign `T`.
macro_rules! impl_scalar_ops {
    ($($t:ty),+) => {
        $(
            impl<const N: usize> Mul<$t> for Vector<$t, N> {
                type Output = Self;

                #[inline]
                fn mul(self, k: $t) -> Self {
                    self.scale(k)
                }
            }

            impl<const N: usize> Mul<Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                #[inline]
                fn mul(self, v: Vector<$t, N>) -> Vector<$t, N> {
                    v.scale(self)
                }
            }

            impl<const N: usize> Div<$t> for Vector<$t, N> {
                type Output = Self;

                #[inline]
                fn div(self, k: $t) -> Self {
                    Self::from_fn(|i| self.0[i] / k)
                }
            }

            impl<const N: usize> MulAssign<$t> for Vector<$t, N> {
                #[inline]
                fn mul_assign(&mut self, k: $t) {
                    *self = self.scale(k);
                }
            }

            impl<const N: usize> DivAssign<$t> for Vector<$t, N> {
                #[inline]
                fn div_assign(&mut self, k: $t) {
                    *self = *self / k;
                }
            }
        )+
    };
}

impl_scalar_ops!(f32, i32, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        assert_eq!(Vec3::zero(), vec3(0.0, 0.0, 0.0));
        assert_eq!(Vec4::default(), Vec4::zero());
        assert_eq!(Vec2::splat(1.5), vec2(1.5, 1.5));
        assert_eq!(IVec3::from_fn(|i| i as i32 * 2), IVec3::new([0, 2, 4]));
        assert_eq!(Vec3::from([1.0, 2.0, 3.0]), vec3(1.0, 2.0, 3.0));

        let v = vec4(1.0, 2.0, 3.0, 4.0);
        assert_eq!((v.x(), v.y(), v.z(), v.w()), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(<[f32; 4]>::from(v), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_index_mut() {
        let mut v = vec3(1.0, 2.0, 3.0);
        v[1] = 5.0;
        assert_eq!(v.as_array(), &[1.0, 5.0, 3.0]);
    }

    #[test]
    fn test_arithmetic() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(4.0, 5.0, 6.0);

        assert_eq!(a + b, vec3(5.0, 7.0, 9.0));
        assert_eq!(b - a, vec3(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, vec3(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, vec3(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, vec3(2.0, 2.5, 3.0));
        assert_eq!(-a, vec3(-1.0, -2.0, -3.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        c /= 4.0;
        assert_eq!(c, vec3(2.0, 2.5, 3.0));
    }

    #[test]
    fn test_integer_vectors() {
        let a = IVec2::new([3, -4]);
        assert_eq!(a * 2, IVec2::new([6, -8]));
        assert_eq!(2 * a, IVec2::new([6, -8]));
        assert_eq!(a.length_squared(), 25);
        assert_eq!(-a, IVec2::new([-3, 4]));

        let u = UVec3::new([1, 2, 3]);
        assert_eq!(u.dot(&UVec3::splat(2)), 12);
        assert_eq!(u / 2, UVec3::new([0, 1, 1]));
    }

    #[test]
    fn test_min_max() {
        let a = vec4(1.0, 5.0, -2.0, 0.0);
        let b = vec4(2.0, 3.0, -3.0, 0.0);
        assert_eq!(a.min(&b), vec4(1.0, 3.0, -3.0, 0.0));
        assert_eq!(a.max(&b), vec4(2.0, 5.0, -2.0, 0.0));
    }

    #[test]
    fn test_dot_and_cross() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(4.0, 5.0, 6.0);
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(a.cross(&b), vec3(-3.0, 6.0, -3.0));
        assert_eq!(b.cross(&a), vec3(3.0, -6.0, 3.0));
    }

    #[test]
    fn test_vec4_cross_sets_w_to_one() {
        let a = vec4(1.0, 0.0, 0.0, 7.0);
        let b = vec4(0.0, 1.0, 0.0, -3.0);
        assert_eq!(a.cross(&b), vec4(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_reflect() {
        let v = vec3(1.0, -1.0, 0.0);
        let n = vec3(0.0, 1.0, 0.0);
        assert_eq!(v.reflect(&n), vec3(1.0, 1.0, 0.0));

        let v = vec4(1.0, -1.0, 0.0, 0.0);
        let n = vec4(0.0, 1.0, 0.0, 0.0);
        assert_eq!(v.reflect(&n), vec4(1.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_length_and_normalize() {
        let v = vec3(3.0, 4.0, 0.0);
        assert!((v.length() - 5.0).abs() < 5e-2);

        let n = vec2(0.0, -2.0).normalize();
        assert!((n.y() + 1.0).abs() < 1e-2);
        assert!((n.length() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
        assert_eq!(Vec3::zero().normalize(), Vec3::zero());
        assert_eq!(Vec4::zero().normalize(), Vec4::zero());
    }

    #[test]
    fn test_dot4_with_every_level_matches_scalar() {
        let a = vec4(1.0, 2.0, 3.0, 4.0);
        let b = vec4(5.0, 6.0, 7.0, 8.0);
        for level in CapabilityLevel::ALL {
            assert_eq!(dot4_with(level, &a, &b), 70.0, "level {level}");
        }
    }

    #[test]
    fn test_dot_on_vec4_agrees_with_scalar_dot() {
        let a = vec4(0.1, -0.2, 0.3, -0.4);
        let b = vec4(1.5, 2.5, -3.5, 4.5);
        assert!((a.dot(&b) - a.scalar_dot(&b)).abs() < 1e-6);
    }
}
