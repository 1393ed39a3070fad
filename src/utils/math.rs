//! Math utility functions

/// Softmax function
pub fn softmax(x: &[f32]) -> Vec<f32> {
    let max_val = x.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Vec<f32> = x.iter().map(|v| (v - max_val).exp()).collect();
    let sum: f32 = exp_vals.iter().sum();
    exp_vals.iter().map(|v| v / sum).collect()
}

/// Argmax - index of the maximum value. Ties resolve to the lowest index.
pub fn argmax(x: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &val) in x.iter().enumerate() {
        if val > best_val {
            best_val = val;
            best_idx = idx;
        }
    }
    best_idx
}

/// Convert a [0, 1] confidence to a percentage rounded to two decimals.
pub fn percent_rounded(confidence: f32) -> f64 {
    (confidence as f64 * 100.0 * 100.0).round() / 100.0
}

/// Format a [0, 1] confidence as a percentage string with two decimals.
pub fn format_percent(confidence: f32) -> String {
    format!("{:.2}%", confidence as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let x = vec![1.0, 2.0, 3.0];
        let result = softmax(&x);
        let sum: f32 = result.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_preserves_order() {
        let result = softmax(&[0.2, 1.7]);
        assert!(result[1] > result[0]);
        assert!(result.iter().all(|p| *p > 0.0 && *p < 1.0));
    }

    #[test]
    fn test_softmax_large_logits_are_stable() {
        let result = softmax(&[1000.0, -1000.0]);
        assert!((result[0] - 1.0).abs() < 1e-6);
        assert!(result[1] >= 0.0);
    }

    #[test]
    fn test_argmax() {
        let x = vec![1.0, 5.0, 3.0, 2.0];
        assert_eq!(argmax(&x), 1);
    }

    #[test]
    fn test_argmax_tie_takes_lowest_index() {
        let x = vec![2.0, 7.0, 7.0, 1.0];
        assert_eq!(argmax(&x), 1);
    }

    #[test]
    fn test_percent_rounded() {
        assert_eq!(percent_rounded(0.9734), 97.34);
        assert_eq!(percent_rounded(0.973456), 97.35);
        assert_eq!(percent_rounded(0.5), 50.0);
        assert_eq!(percent_rounded(1.0), 100.0);
        assert_eq!(percent_rounded(0.0), 0.0);
    }

    #[test]
    fn test_format_percent_two_decimals() {
        assert_eq!(format_percent(0.9734), "97.34%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(0.5), "50.00%");
    }
}
