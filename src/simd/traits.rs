//! Lane-group abstraction shared by the ISA kernels.

/// A hardware register holding `LANES` packed `f32` values.
///
/// Implementations wrap one register type (`__m128`, `__m256`,
/// `float32x4_t`). Loads, broadcasts and reductions differ per register and
/// live on the types themselves. All methods are `unsafe` because they
/// compile to instructions the running CPU may not have: callers must only
/// use them from code that has verified (or been compiled for) the matching
/// target feature.
pub trait SimdVec: Copy {
    /// Number of `f32` lanes in the register.
    const LANES: usize;

    /// Stores every lane to a possibly unaligned pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `LANES` consecutive `f32` values and
    /// the CPU must support the register's instruction set.
    unsafe fn store_at(&self, ptr: *mut f32);

    /// Lane-wise addition.
    ///
    /// # Safety
    ///
    /// The CPU must support the register's instruction set.
    unsafe fn add(self, rhs: Self) -> Self;

    /// Lane-wise multiplication.
    ///
    /// # Safety
    ///
    /// The CPU must support the register's instruction set.
    unsafe fn mul(self, rhs: Self) -> Self;
}

/// `(c0*s0 + c1*s1) + (c2*s2 + c3*s3)`, the column-combination step shared
/// by every matrix kernel.
///
/// The pairing is fixed so that all SIMD backends round identically.
///
/// # Safety
///
/// The CPU must support `V`'s instruction set.
#[inline(always)]
pub unsafe fn combine_columns<V: SimdVec>(columns: &[V; 4], weights: &[V; 4]) -> V {
    let lo = columns[0].mul(weights[0]).add(columns[1].mul(weights[1]));
    let hi = columns[2].mul(weights[2]).add(columns[3].mul(weights[3]));
    lo.add(hi)
}
