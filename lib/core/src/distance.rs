// Euclidean distance kernels over standardized feature vectors.
// Feature counts are small (tens of columns), so the kernels stay scalar and
// rely on two accumulators over 4-wide chunks to let the compiler vectorize.

/// Squared L2 distance between two equally sized slices.
///
/// Returns `f32::INFINITY` on a length mismatch; callers validate dimensions
/// before reaching this point.
#[inline]
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    let mut sum0 = 0.0f32;
    let mut sum1 = 0.0f32;

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_rest = a_chunks.remainder();
    let b_rest = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        let d0 = x[0] - y[0];
        let d1 = x[1] - y[1];
        let d2 = x[2] - y[2];
        let d3 = x[3] - y[3];

        sum0 += d0 * d0 + d1 * d1;
        sum1 += d2 * d2 + d3 * d3;
    }

    for (x, y) in a_rest.iter().zip(b_rest) {
        let d = x - y;
        sum0 += d * d;
    }

    sum0 + sum1
}

/// L2 (Euclidean) distance.
#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    l2_distance_squared(a, b).sqrt()
}

/// Per-dimension squared differences, in dimension order.
///
/// The entries sum to [`l2_distance_squared`].
pub fn squared_differences(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .collect()
}
