use crate::interface::model::DetectionModel;
use crate::math::decibel::DecibelHelper;
use crate::prelude::{
    check_probability, check_pulses, DetectionError, DetectionResponse, Operand, RocResult,
};
use crate::processing::mixture::Mixture;
use crate::processing::threshold::NoiseThreshold;
use rayon::prelude::*;

/// Pd over single-pulse SNR (dB) for a fixed false-alarm rate, pulse count
/// and target model.
///
/// Construction solves the detection threshold once; every later
/// evaluation only sums the model's mixing weights against the cached noise
/// tail.
#[derive(Debug, Clone)]
pub struct DetectionCurve {
    model: DetectionModel,
    pulses: usize,
    noise: NoiseThreshold,
}

impl DetectionCurve {
    pub fn new(pfa: f64, pulses: usize, model: DetectionModel) -> RocResult<Self> {
        check_probability("pfa", pfa)?;
        check_pulses(pulses)?;
        let noise = NoiseThreshold::new(pfa, model.detector_samples(pulses))?;
        Ok(Self {
            model,
            pulses,
            noise,
        })
    }

    pub fn model(&self) -> DetectionModel {
        self.model
    }

    pub fn pulses(&self) -> usize {
        self.pulses
    }

    pub fn pfa(&self) -> f64 {
        self.noise.pfa()
    }

    pub fn threshold(&self) -> f64 {
        self.noise.threshold()
    }

    pub fn pd(&self, snr_db: f64) -> RocResult<f64> {
        check_snr(snr_db)?;
        Ok(self.probability(snr_db))
    }
}

impl DetectionResponse for DetectionCurve {
    fn probability(&self, snr_db: f64) -> f64 {
        let snr = DecibelHelper::to_linear(snr_db);
        let mixture = Mixture::for_model(self.model, self.pulses, snr);
        self.noise.detection_probability(&mixture)
    }
}

fn check_snr(snr_db: f64) -> RocResult<()> {
    if snr_db.is_finite() {
        Ok(())
    } else {
        Err(DetectionError::Domain(format!(
            "snr must be finite, got {}",
            snr_db
        )))
    }
}

/// Pd for one query. `snr_db` is the single-pulse SNR in dB.
pub fn evaluate(pfa: f64, snr_db: f64, pulses: usize, model: DetectionModel) -> RocResult<f64> {
    check_snr(snr_db)?;
    DetectionCurve::new(pfa, pulses, model)?.pd(snr_db)
}

/// Same as [`evaluate`] with the model given by its label, e.g. `"Swerling 1"`.
pub fn roc_pd(pfa: f64, snr_db: f64, pulses: usize, model: &str) -> RocResult<f64> {
    evaluate(pfa, snr_db, pulses, model.parse()?)
}

/// Pd at each SNR of `snr_db`, sharing one threshold.
pub fn evaluate_over_snr(
    pfa: f64,
    snr_db: &[f64],
    pulses: usize,
    model: DetectionModel,
) -> RocResult<Vec<f64>> {
    let curve = DetectionCurve::new(pfa, pulses, model)?;
    snr_db.iter().try_for_each(|&snr| check_snr(snr))?;
    Ok(snr_db
        .par_iter()
        .map(|&snr| curve.probability(snr))
        .collect())
}

/// Pd at each false-alarm probability of `pfa`.
pub fn evaluate_over_pfa(
    pfa: &[f64],
    snr_db: f64,
    pulses: usize,
    model: DetectionModel,
) -> RocResult<Vec<f64>> {
    check_snr(snr_db)?;
    check_pulses(pulses)?;
    pfa.par_iter()
        .map(|&p| evaluate(p, snr_db, pulses, model))
        .collect()
}

/// Vectorized Pd with explicit broadcasting between `pfa` and `snr_db`.
///
/// Scalar with scalar yields one value, a scalar is repeated against a
/// sequence, and two sequences are paired element by element (lengths must
/// agree).
pub fn evaluate_broadcast(
    pfa: Operand<'_>,
    snr_db: Operand<'_>,
    pulses: usize,
    model: DetectionModel,
) -> RocResult<Vec<f64>> {
    pfa.broadcast_len(&snr_db)?;
    match (pfa, snr_db) {
        (Operand::Scalar(p), Operand::Scalar(snr)) => Ok(vec![evaluate(p, snr, pulses, model)?]),
        (Operand::Scalar(p), Operand::Sequence(snr)) => evaluate_over_snr(p, snr, pulses, model),
        (Operand::Sequence(p), Operand::Scalar(snr)) => evaluate_over_pfa(p, snr, pulses, model),
        (Operand::Sequence(p), Operand::Sequence(snr)) => {
            check_pulses(pulses)?;
            p.par_iter()
                .zip(snr.par_iter())
                .map(|(&p, &snr)| evaluate(p, snr, pulses, model))
                .collect()
        }
    }
}
