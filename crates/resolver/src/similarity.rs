//! Vector similarity helpers.

/// Cosine similarity `dot(a, b) / (|a| |b|)`, in [-1, 1].
///
/// A zero-magnitude vector has no direction, so its similarity to anything
/// is 0. Vectors must have equal length; callers check dimensions first.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // Rounding can push |cos| a hair past 1
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Mean of the `n` largest values, or `None` if there are no values.
///
/// With fewer than `n` values, all of them are averaged.
pub fn top_n_mean(mut values: Vec<f32>, n: usize) -> Option<f32> {
    if values.is_empty() || n == 0 {
        return None;
    }
    values.sort_by(|a, b| b.total_cmp(a));
    values.truncate(n);
    Some(values.iter().sum::<f32>() / values.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_and_opposite() {
        let a = [0.3, -0.2, 0.9];
        let b = [-0.3, 0.2, -0.9];

        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let sim = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_top_n_mean() {
        let values = vec![0.1, 0.9, 0.5, 0.7, 0.3];

        assert!((top_n_mean(values.clone(), 2).unwrap() - 0.8).abs() < 1e-6);
        // Fewer values than n: average everything
        assert!((top_n_mean(values, 10).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(top_n_mean(vec![], 5), None);
    }
}
