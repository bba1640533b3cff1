//! Fisher Z test of vanishing partial correlation on continuous data.

use ndarray::Array2;
use statrs::distribution::{ContinuousCDF, Normal};

use blanket_core::errors::IndTestError;
use blanket_core::types::collections::FxHashMap;

use super::linalg::invert;
use super::{check_alpha, IndependenceResult, IndependenceTest};
use crate::data::ContinuousDataSet;
use crate::graph::Node;

#[derive(Debug, Clone)]
pub struct FisherZTest {
    variables: Vec<Node>,
    index: FxHashMap<String, usize>,
    covariance: Array2<f64>,
    sample_size: usize,
    alpha: f64,
    normal: Normal,
}

impl FisherZTest {
    pub fn from_dataset(data: &ContinuousDataSet, alpha: f64) -> Result<Self, IndTestError> {
        let covariance = data.covariance_matrix()?;
        Self::from_covariance(data.variables().to_vec(), covariance, data.num_rows(), alpha)
    }

    pub fn from_covariance(
        variables: Vec<Node>,
        covariance: Array2<f64>,
        sample_size: usize,
        alpha: f64,
    ) -> Result<Self, IndTestError> {
        check_alpha(alpha)?;
        if covariance.nrows() != variables.len() || covariance.ncols() != variables.len() {
            return Err(IndTestError::DimensionMismatch {
                expected: variables.len(),
                found: covariance.nrows(),
            });
        }
        let index = variables
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name().to_string(), i))
            .collect();
        Ok(Self {
            variables,
            index,
            covariance,
            sample_size,
            alpha,
            normal: Normal::standard(),
        })
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    fn column(&self, node: &Node) -> Result<usize, IndTestError> {
        self.index
            .get(node.name())
            .copied()
            .ok_or_else(|| IndTestError::UnknownVariable {
                name: node.name().to_string(),
            })
    }

    /// Partial correlation of `x` and `y` given `z`; `None` when the submatrix is singular.
    pub fn partial_correlation(&self, x: &Node, y: &Node, z: &[Node]) -> Result<Option<f64>, IndTestError> {
        let mut cols = vec![self.column(x)?, self.column(y)?];
        for node in z {
            cols.push(self.column(node)?);
        }
        let k = cols.len();
        let sub = Array2::from_shape_fn((k, k), |(i, j)| self.covariance[[cols[i], cols[j]]]);
        let Some(precision) = invert(&sub) else {
            return Ok(None);
        };
        let denom = (precision[[0, 0]] * precision[[1, 1]]).sqrt();
        let r = -precision[[0, 1]] / denom;
        Ok(r.is_finite().then_some(r))
    }
}

impl IndependenceTest for FisherZTest {
    fn check(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, IndTestError> {
        let Some(r) = self.partial_correlation(x, y, z)? else {
            return Ok(IndependenceResult::undetermined());
        };
        let dof = self.sample_size as f64 - z.len() as f64 - 3.0;
        if dof <= 0.0 || r.abs() >= 1.0 {
            return Ok(IndependenceResult::undetermined());
        }
        let fisher_z = 0.5 * dof.sqrt() * ((1.0 + r) / (1.0 - r)).ln();
        let p_value = 2.0 * (1.0 - self.normal.cdf(fisher_z.abs()));
        Ok(IndependenceResult::from_p_value(p_value, fisher_z, self.alpha))
    }

    fn variables(&self) -> &[Node] {
        &self.variables
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &str {
        "Fisher Z"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn vars(names: &[&str]) -> Vec<Node> {
        names.iter().map(|n| Node::new(*n)).collect()
    }

    #[test]
    fn chain_partial_correlation_vanishes() {
        // A -> B -> C with unit coefficients and unit noise.
        let cov = array![[1.0, 1.0, 1.0], [1.0, 2.0, 2.0], [1.0, 2.0, 3.0]];
        let test = FisherZTest::from_covariance(vars(&["A", "B", "C"]), cov, 500, 0.05).unwrap();
        let (a, b, c) = (Node::new("A"), Node::new("B"), Node::new("C"));
        assert!(test.check(&a, &c, &[]).unwrap().is_dependent());
        let given_b = test.check(&a, &c, &[b]).unwrap();
        assert!(given_b.is_independent());
        assert!((given_b.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singular_conditioning_is_undetermined() {
        let cov = array![[1.0, 0.5, 0.5], [0.5, 1.0, 1.0], [0.5, 1.0, 1.0]];
        let test = FisherZTest::from_covariance(vars(&["A", "B", "C"]), cov, 100, 0.05).unwrap();
        let result = test.check(&Node::new("A"), &Node::new("B"), &[Node::new("C")]).unwrap();
        assert!(result.is_undetermined());
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn too_few_samples_is_undetermined() {
        let cov = array![[1.0, 0.3], [0.3, 1.0]];
        let test = FisherZTest::from_covariance(vars(&["A", "B"]), cov, 3, 0.05).unwrap();
        assert!(test.check(&Node::new("A"), &Node::new("B"), &[]).unwrap().is_undetermined());
    }

    #[test]
    fn rejects_bad_alpha_and_unknown_variables() {
        let cov = array![[1.0]];
        assert!(FisherZTest::from_covariance(vars(&["A"]), cov.clone(), 10, 0.0).is_err());
        let test = FisherZTest::from_covariance(vars(&["A"]), cov, 10, 0.05).unwrap();
        assert!(matches!(
            test.check(&Node::new("A"), &Node::new("Z"), &[]),
            Err(IndTestError::UnknownVariable { .. })
        ));
    }
}
