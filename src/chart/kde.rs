use std::f64::consts::PI;

use super::{Bandwidth, Error, KdeInd};
use crate::defaults;
use crate::utils::linspace;

/// Gaussian kernel density estimate of one dimensional data
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit the estimate.
    ///
    /// The kernel standard deviation is the sample standard deviation of
    /// `points` times the factor given by `method`.
    pub fn new(points: Vec<f64>, method: Bandwidth) -> Result<Self, Error> {
        let n = points.len();
        if n < 2 {
            return Err(Error::InvalidParam(format!(
                "density estimation needs at least 2 values, got {}",
                n
            )));
        }
        let nf = n as f64;
        let mean = points.iter().sum::<f64>() / nf;
        let var = points.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (nf - 1.0);
        if !var.is_finite() || var <= 0.0 {
            return Err(Error::InvalidParam(
                "density estimation needs values with a non-zero variance".into(),
            ));
        }
        let factor = match method {
            Bandwidth::Scott => nf.powf(-0.2),
            Bandwidth::Silverman => (nf * 0.75).powf(-0.2),
            Bandwidth::Factor(f) if f > 0.0 && f.is_finite() => f,
            Bandwidth::Factor(f) => {
                return Err(Error::InvalidParam(format!(
                    "bandwidth factor must be positive, got {}",
                    f
                )));
            }
        };
        Ok(Self {
            points,
            bandwidth: var.sqrt() * factor,
        })
    }

    /// Standard deviation of the kernel
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Estimated density at `x`
    pub fn density(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.points.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        self.points
            .iter()
            .map(|p| {
                let u = (x - p) / self.bandwidth;
                (-0.5 * u * u).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Estimated density at each point of `xs`
    pub fn evaluate(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.density(x)).collect()
    }
}

/// Evaluation grid of density estimates.
///
/// Without explicit values, the grid spans the data range extended by half
/// of it on each side.
pub(crate) fn grid(values: &[f64], ind: Option<&KdeInd>) -> Result<Vec<f64>, Error> {
    let num = match ind {
        Some(KdeInd::Values(xs)) => return Ok(xs.clone()),
        Some(KdeInd::Points(0)) => {
            return Err(Error::InvalidParam(
                "number of density points must be positive".into(),
            ));
        }
        Some(KdeInd::Points(n)) => *n,
        None => defaults::KDE_POINTS,
    };
    let (min, max) = values
        .iter()
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
        .ok_or(Error::NoNumericData)?;
    let range = max - min;
    Ok(linspace(min - 0.5 * range, max + 0.5 * range, num))
}
