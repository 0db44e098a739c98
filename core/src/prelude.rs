/// Common error type for detection queries and SNR inversion.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("domain error: {0}")]
    Domain(String),
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
    #[error(
        "bracket [{lower_db} dB, {upper_db} dB] gives Pd in [{pd_lower}, {pd_upper}], \
         which does not contain target {target}"
    )]
    Bracket {
        lower_db: f64,
        upper_db: f64,
        pd_lower: f64,
        pd_upper: f64,
        target: f64,
    },
    #[error("no convergence after {iterations} iterations (best {best_snr_db} dB, residual {residual})")]
    Convergence {
        iterations: usize,
        best_snr_db: f64,
        residual: f64,
    },
}

pub type RocResult<T> = Result<T, DetectionError>;

/// A Pd curve over single-pulse SNR with every other parameter held fixed.
///
/// Implementations must be non-decreasing in `snr_db`; the SNR solver relies
/// on it to bisect.
pub trait DetectionResponse {
    fn probability(&self, snr_db: f64) -> f64;
}

/// One side of a vectorized evaluation.
///
/// A scalar broadcasts against a sequence; two sequences must have the same
/// length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Scalar(f64),
    Sequence(&'a [f64]),
}

impl<'a> Operand<'a> {
    /// Element `index` after broadcasting; `None` past the end of a sequence.
    pub fn at(&self, index: usize) -> Option<f64> {
        match self {
            Operand::Scalar(value) => Some(*value),
            Operand::Sequence(values) => values.get(index).copied(),
        }
    }

    /// Output length when `self` is paired with `other`.
    pub fn broadcast_len(&self, other: &Operand<'_>) -> RocResult<usize> {
        match (self, other) {
            (Operand::Scalar(_), Operand::Scalar(_)) => Ok(1),
            (Operand::Scalar(_), Operand::Sequence(values))
            | (Operand::Sequence(values), Operand::Scalar(_)) => Ok(values.len()),
            (Operand::Sequence(lhs), Operand::Sequence(rhs)) => {
                if lhs.len() == rhs.len() {
                    Ok(lhs.len())
                } else {
                    Err(DetectionError::Domain(format!(
                        "cannot broadcast sequences of length {} and {}",
                        lhs.len(),
                        rhs.len()
                    )))
                }
            }
        }
    }
}

impl<'a> From<f64> for Operand<'a> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(values: &'a [f64]) -> Self {
        Operand::Sequence(values)
    }
}

impl<'a> From<&'a Vec<f64>> for Operand<'a> {
    fn from(values: &'a Vec<f64>) -> Self {
        Operand::Sequence(values.as_slice())
    }
}

pub(crate) fn check_probability(name: &str, value: f64) -> RocResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(DetectionError::Domain(format!(
            "{} must lie in (0, 1), got {}",
            name, value
        )))
    }
}

pub(crate) fn check_pulses(pulses: usize) -> RocResult<()> {
    if pulses >= 1 {
        Ok(())
    } else {
        Err(DetectionError::Domain(
            "pulse count must be at least 1".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_pairs_broadcast_to_single_value() {
        let len = Operand::Scalar(0.1).broadcast_len(&Operand::Scalar(3.0));
        assert_eq!(len, Ok(1));
    }

    #[test]
    fn scalar_takes_sequence_length() {
        let snr = [0.0, 1.0, 2.0];
        let len = Operand::from(1e-4).broadcast_len(&Operand::from(&snr[..]));
        assert_eq!(len, Ok(3));
        assert_eq!(Operand::Scalar(0.5).at(2), Some(0.5));
    }

    #[test]
    fn sequence_index_past_end_is_none() {
        let snr = [0.0, 1.0];
        let operand = Operand::from(&snr[..]);
        assert_eq!(operand.at(1), Some(1.0));
        assert_eq!(operand.at(2), None);
    }

    #[test]
    fn mismatched_sequences_are_rejected() {
        let pfa = [1e-4, 1e-3];
        let snr = [0.0, 1.0, 2.0];
        let err = Operand::from(&pfa[..])
            .broadcast_len(&Operand::from(&snr[..]))
            .unwrap_err();
        assert!(matches!(err, DetectionError::Domain(_)));
    }

    #[test]
    fn probability_bounds_are_exclusive() {
        assert!(check_probability("pfa", 0.0).is_err());
        assert!(check_probability("pfa", 1.0).is_err());
        assert!(check_probability("pfa", f64::NAN).is_err());
        assert!(check_probability("pfa", 1e-8).is_ok());
    }
}
