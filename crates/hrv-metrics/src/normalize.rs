//! Min/Max Normalization

/// Rescale `values` into [0, 1]; a constant series maps to all ones
pub fn normalize_min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let range = max - min;

    if range == 0.0 {
        return vec![1.0; values.len()];
    }

    values.iter().map(|&v| (v - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let out = normalize_min_max(&[2.0, 4.0, 3.0]);
        assert_eq!(out, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_constant_and_empty() {
        assert_eq!(normalize_min_max(&[5.0; 3]), vec![1.0; 3]);
        assert!(normalize_min_max(&[]).is_empty());
    }
}
