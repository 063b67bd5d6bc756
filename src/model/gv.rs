//! Global variance model.

use serde::{Deserialize, Serialize};

use super::MeanVari;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("GV mean has {mean} entries, inverse covariance has {inverse_covariance}")]
pub struct GvLengthError {
    pub mean: usize,
    pub inverse_covariance: usize,
}

/// Diagonal Gaussian over the utterance-wide variance of each static coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GlobalVarianceModelData")]
pub struct GlobalVarianceModel {
    mean: Box<[f64]>,
    inverse_covariance: Box<[f64]>,
}

#[derive(Deserialize)]
struct GlobalVarianceModelData {
    mean: Vec<f64>,
    inverse_covariance: Vec<f64>,
}

impl TryFrom<GlobalVarianceModelData> for GlobalVarianceModel {
    type Error = GvLengthError;

    fn try_from(data: GlobalVarianceModelData) -> Result<Self, Self::Error> {
        Self::try_new(data.mean, data.inverse_covariance)
    }
}

impl GlobalVarianceModel {
    /// Create from per-dimension means and inverse covariances.
    ///
    /// ## Panics
    ///
    /// If the two slices differ in length.
    pub fn new(mean: Vec<f64>, inverse_covariance: Vec<f64>) -> Self {
        match Self::try_new(mean, inverse_covariance) {
            Ok(model) => model,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(mean: Vec<f64>, inverse_covariance: Vec<f64>) -> Result<Self, GvLengthError> {
        if mean.len() != inverse_covariance.len() {
            return Err(GvLengthError {
                mean: mean.len(),
                inverse_covariance: inverse_covariance.len(),
            });
        }
        Ok(Self {
            mean: mean.into(),
            inverse_covariance: inverse_covariance.into(),
        })
    }

    /// Create from per-dimension mean and variance, as stored in voice files.
    pub fn from_mean_vari(params: &[MeanVari]) -> Self {
        let (mean, inverse_covariance) = params
            .iter()
            .map(|p| {
                let MeanVari(mean, ivar) = p.with_ivar();
                (mean, ivar)
            })
            .unzip();
        Self::new(mean, inverse_covariance)
    }

    /// Number of static dimensions covered.
    pub fn len(&self) -> usize {
        self.mean.len()
    }
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Target variance and its inverse covariance for `dimension`.
    pub fn get(&self, dimension: usize) -> Option<(f64, f64)> {
        Some((
            *self.mean.get(dimension)?,
            *self.inverse_covariance.get(dimension)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobalVarianceModel, GvLengthError};
    use crate::model::MeanVari;

    #[test]
    fn deserialize() {
        let gv: GlobalVarianceModel =
            serde_json::from_str(r#"{ "mean": [0.5, 1.0], "inverse_covariance": [2.0, 4.0] }"#)
                .unwrap();
        assert_eq!(gv, GlobalVarianceModel::new(vec![0.5, 1.0], vec![2.0, 4.0]));

        let mismatched = serde_json::from_str::<GlobalVarianceModel>(
            r#"{ "mean": [0.5, 1.0], "inverse_covariance": [2.0] }"#,
        );
        assert!(mismatched.is_err());
        assert_eq!(
            GlobalVarianceModel::try_new(vec![0.5, 1.0], vec![2.0]),
            Err(GvLengthError {
                mean: 2,
                inverse_covariance: 1
            })
        );
    }

    #[test]
    fn from_mean_vari() {
        let gv = GlobalVarianceModel::from_mean_vari(&[MeanVari(0.5, 0.25), MeanVari(2.0, 1e30)]);
        assert_eq!(gv.len(), 2);
        assert_eq!(gv.get(0), Some((0.5, 4.0)));
        assert_eq!(gv.get(1), Some((2.0, 0.0)));
        assert_eq!(gv.get(2), None);
    }
}
