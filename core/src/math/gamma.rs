use std::f64::consts::PI;

/// Lanczos coefficients for g = 7, n = 9.
const LANCZOS_G: f64 = 7.0;
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Gamma-family helpers used by the detection statistics.
pub struct GammaHelper;

impl GammaHelper {
    /// Natural log of the gamma function for `x > 0`.
    pub fn ln_gamma(x: f64) -> f64 {
        if x < 0.5 {
            // Reflection keeps the Lanczos sum in its accurate range.
            return (PI / (PI * x).sin()).ln() - Self::ln_gamma(1.0 - x);
        }
        let x = x - 1.0;
        let t = x + LANCZOS_G + 0.5;
        let series = LANCZOS
            .iter()
            .enumerate()
            .skip(1)
            .fold(LANCZOS[0], |acc, (i, &c)| acc + c / (x + i as f64));
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
    }

    /// `ln(k!)`.
    pub fn ln_factorial(k: usize) -> f64 {
        if k < 2 {
            0.0
        } else {
            Self::ln_gamma(k as f64 + 1.0)
        }
    }

    /// Log of the Poisson probability mass `P[X = k]` for `X ~ Poisson(mean)`.
    pub fn ln_poisson_pmf(k: usize, mean: f64) -> f64 {
        if mean <= 0.0 {
            return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
        }
        -mean + k as f64 * mean.ln() - Self::ln_factorial(k)
    }

    /// `P[X <= k]` for `X ~ Poisson(mean)`.
    ///
    /// Equals the regularised upper incomplete gamma `Q(k + 1, mean)`.
    pub fn poisson_cdf(k: usize, mean: f64) -> f64 {
        (0..=k)
            .map(|j| Self::ln_poisson_pmf(j, mean).exp())
            .sum::<f64>()
            .min(1.0)
    }
}
