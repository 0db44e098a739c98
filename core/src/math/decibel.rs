pub struct DecibelHelper;

impl DecibelHelper {
    pub fn to_linear(db: f64) -> f64 {
        10f64.powf(db / 10.0)
    }

    pub fn from_linear(ratio: f64) -> f64 {
        10.0 * ratio.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_db_is_unity() {
        assert_eq!(DecibelHelper::to_linear(0.0), 1.0);
        assert_eq!(DecibelHelper::from_linear(1.0), 0.0);
    }

    #[test]
    fn coherent_gain_of_128_pulses() {
        let gain = DecibelHelper::from_linear(128.0);
        assert!((gain - 21.0721).abs() < 1e-4);
        assert!((DecibelHelper::to_linear(gain) - 128.0).abs() < 1e-9);
    }
}
