//! Design matrix construction.
//!
//! Observations are presented to the optimizer as an n×(p+1) augmented matrix
//! with the intercept column of 1s in column 0, so that coefficient index 0 is
//! always the intercept. Derivative code relies on that layout.

use nalgebra::{DMatrix, DVector};

use crate::domain::Observation;

/// Construction-time input defects.
///
/// These indicate a contract violation by the data-ingestion collaborator and
/// propagate to the caller immediately; they are never folded into the
/// convergence state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    /// The observation sequence was empty.
    EmptyInput,
    /// A feature vector had a different length than the first row's.
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::EmptyInput => write!(f, "empty observation sequence"),
            DesignError::DimensionMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} feature(s), expected {expected}"
            ),
        }
    }
}

impl std::error::Error for DesignError {}

/// The augmented feature matrix and the response vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    /// n×(p+1) matrix; column 0 is the intercept column of 1s.
    pub x: DMatrix<f64>,
    /// Response vector of length n.
    pub y: DVector<f64>,
}

impl Design {
    /// Number of observations.
    pub fn n(&self) -> usize {
        self.x.nrows()
    }

    /// Number of predictors (excluding the intercept).
    pub fn p(&self) -> usize {
        self.x.ncols() - 1
    }
}

/// Build the design matrix and response vector from raw observations.
pub fn build(observations: &[Observation]) -> Result<Design, DesignError> {
    let Some(first) = observations.first() else {
        return Err(DesignError::EmptyInput);
    };
    let p = first.features.len();
    let n = observations.len();

    let mut x = DMatrix::<f64>::zeros(n, p + 1);
    let mut y = DVector::<f64>::zeros(n);

    for (i, obs) in observations.iter().enumerate() {
        if obs.features.len() != p {
            return Err(DesignError::DimensionMismatch {
                row: i,
                expected: p,
                found: obs.features.len(),
            });
        }
        x[(i, 0)] = 1.0;
        for (j, &v) in obs.features.iter().enumerate() {
            x[(i, j + 1)] = v;
        }
        y[i] = obs.response;
    }

    Ok(Design { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_prepends_intercept_column() {
        let obs = vec![
            Observation::new(vec![2.0, 3.0], 1.0),
            Observation::new(vec![4.0, 5.0], 2.0),
        ];
        let design = build(&obs).unwrap();

        assert_eq!(design.n(), 2);
        assert_eq!(design.p(), 2);
        assert_eq!(design.x[(0, 0)], 1.0);
        assert_eq!(design.x[(1, 0)], 1.0);
        assert_eq!(design.x[(0, 1)], 2.0);
        assert_eq!(design.x[(1, 2)], 5.0);
        assert_eq!(design.y[1], 2.0);
    }

    #[test]
    fn build_rejects_empty_input() {
        assert_eq!(build(&[]), Err(DesignError::EmptyInput));
    }

    #[test]
    fn build_rejects_ragged_rows() {
        let obs = vec![
            Observation::new(vec![1.0, 2.0], 0.0),
            Observation::new(vec![1.0], 0.0),
        ];
        assert_eq!(
            build(&obs),
            Err(DesignError::DimensionMismatch {
                row: 1,
                expected: 2,
                found: 1,
            })
        );
    }
}
