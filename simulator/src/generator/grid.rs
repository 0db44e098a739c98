/// `count` points spaced evenly in log10 between `start` and `stop` inclusive.
pub fn log_spaced(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![start];
    }
    let (low, high) = (start.log10(), stop.log10());
    let step = (high - low) / (count - 1) as f64;
    (0..count)
        .map(|i| 10f64.powf(low + step * i as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_spaced_hits_decades() {
        let grid = log_spaced(1e-8, 1e-1, 8);
        assert_eq!(grid.len(), 8);
        for (i, &value) in grid.iter().enumerate() {
            let expected = 10f64.powi(i as i32 - 8);
            assert!(((value - expected) / expected).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_counts() {
        assert!(log_spaced(1e-3, 1e-1, 0).is_empty());
        assert_eq!(log_spaced(1e-3, 1e-1, 1), vec![1e-3]);
    }
}
