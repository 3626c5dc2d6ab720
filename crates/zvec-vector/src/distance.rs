//! Slice kernels shared by every vector type.
//!
//! - **Inner product**: `f32` accumulation, returned as the wire-level dot product
//! - **Euclidean (L2) distance**: straight-line distance between two points
//! - **Norms**: L1 and L2, accumulated in `f64`
//! - **Cosine**: single pass over both slices, accumulated in `f64`
//!
//! All loops process four lanes at a time so release builds auto-vectorize them.
//! Callers validate dimensions; the kernels only `debug_assert` them.

/// Compute inner product (dot product) of two slices.
///
/// Returns a · b = sum(a[i] * b[i])
///
/// # Example
///
/// ```
/// use zvec_vector::inner_product;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// assert!((inner_product(&a, &b) - 32.0).abs() < 0.001);
/// ```
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f32;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        sum += a[base] * b[base]
            + a[base + 1] * b[base + 1]
            + a[base + 2] * b[base + 2]
            + a[base + 3] * b[base + 3];
    }

    for i in (chunks * 4)..a.len() {
        sum += a[i] * b[i];
    }

    sum
}

/// Compute Euclidean (L2) distance between two slices.
///
/// ```
/// use zvec_vector::euclidean_distance;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// assert!((euclidean_distance(&a, &b) - 5.196).abs() < 0.01); // sqrt(27)
/// ```
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    euclidean_distance_squared(a, b).sqrt()
}

/// Squared Euclidean distance, skipping the sqrt when only ordering matters.
#[inline]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f64;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        let d0 = (a[base] - b[base]) as f64;
        let d1 = (a[base + 1] - b[base + 1]) as f64;
        let d2 = (a[base + 2] - b[base + 2]) as f64;
        let d3 = (a[base + 3] - b[base + 3]) as f64;
        sum += d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
    }

    for i in (chunks * 4)..a.len() {
        let d = (a[i] - b[i]) as f64;
        sum += d * d;
    }

    sum
}

/// L2 (Euclidean) norm of a slice.
#[inline]
pub fn l2_norm(a: &[f32]) -> f64 {
    let mut sum = 0.0f64;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        let (x0, x1, x2, x3) = (
            a[base] as f64,
            a[base + 1] as f64,
            a[base + 2] as f64,
            a[base + 3] as f64,
        );
        sum += x0 * x0 + x1 * x1 + x2 * x2 + x3 * x3;
    }

    for &x in &a[chunks * 4..] {
        let x = x as f64;
        sum += x * x;
    }

    sum.sqrt()
}

/// L1 (Manhattan) norm of a slice.
#[inline]
pub fn l1_norm(a: &[f32]) -> f64 {
    a.iter().map(|&x| (x as f64).abs()).sum()
}

/// Compute dot product and squared norms in a single pass.
///
/// Returns (dot, norm_a_squared, norm_b_squared)
#[inline]
pub(crate) fn dot_and_norms(a: &[f32], b: &[f32]) -> (f64, f64, f64) {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    (dot, norm_a, norm_b)
}

/// Cosine similarity of two slices, or `None` when either norm is exactly zero.
///
/// The result is clamped to [-1, 1] to absorb floating point drift.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    let (dot, norm_a, norm_b) = dot_and_norms(a, b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
