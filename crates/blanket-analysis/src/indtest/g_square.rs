//! Stratified G-square (likelihood ratio) test on categorical data.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use blanket_core::errors::IndTestError;
use blanket_core::types::collections::FxHashMap;

use super::{check_alpha, IndependenceResult, IndependenceTest};
use crate::data::DiscreteDataSet;
use crate::graph::Node;

#[derive(Debug, Clone)]
pub struct GSquareTest {
    data: DiscreteDataSet,
    alpha: f64,
}

/// Accumulated statistic and degrees of freedom over all strata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GSquareStatistic {
    pub g_square: f64,
    pub degrees_of_freedom: usize,
}

impl GSquareTest {
    pub fn new(data: DiscreteDataSet, alpha: f64) -> Result<Self, IndTestError> {
        check_alpha(alpha)?;
        if data.num_rows() == 0 {
            return Err(IndTestError::InsufficientData {
                message: "G-square needs at least one row".to_string(),
            });
        }
        Ok(Self { data, alpha })
    }

    fn column(&self, node: &Node) -> Result<usize, IndTestError> {
        self.data
            .column_of(node.name())
            .ok_or_else(|| IndTestError::UnknownVariable {
                name: node.name().to_string(),
            })
    }

    /// Sums `2 * obs * ln(obs * n / (row * col))` over every stratum of `z`. Each stratum
    /// contributes `(non-empty rows - 1) * (non-empty columns - 1)` degrees of freedom.
    pub fn statistic(&self, x: &Node, y: &Node, z: &[Node]) -> Result<GSquareStatistic, IndTestError> {
        let xi = self.column(x)?;
        let yi = self.column(y)?;
        let zi: Vec<usize> = z.iter().map(|n| self.column(n)).collect::<Result<_, _>>()?;
        let cx = self.data.num_categories(xi);
        let cy = self.data.num_categories(yi);

        let mut strata: FxHashMap<Vec<usize>, Vec<f64>> = FxHashMap::default();
        for row in 0..self.data.num_rows() {
            let key: Vec<usize> = zi.iter().map(|&c| self.data.value(row, c)).collect();
            let cell = self.data.value(row, xi) * cy + self.data.value(row, yi);
            strata.entry(key).or_insert_with(|| vec![0.0; cx * cy])[cell] += 1.0;
        }

        let mut g_square = 0.0;
        let mut degrees_of_freedom = 0usize;
        for table in strata.values() {
            let total: f64 = table.iter().sum();
            let row_sums: Vec<f64> = (0..cx).map(|i| (0..cy).map(|j| table[i * cy + j]).sum()).collect();
            let col_sums: Vec<f64> = (0..cy).map(|j| (0..cx).map(|i| table[i * cy + j]).sum()).collect();
            for i in 0..cx {
                for j in 0..cy {
                    let observed = table[i * cy + j];
                    if observed > 0.0 {
                        let expected = row_sums[i] * col_sums[j] / total;
                        g_square += 2.0 * observed * (observed / expected).ln();
                    }
                }
            }
            let rows = row_sums.iter().filter(|&&s| s > 0.0).count();
            let cols = col_sums.iter().filter(|&&s| s > 0.0).count();
            degrees_of_freedom += rows.saturating_sub(1) * cols.saturating_sub(1);
        }
        Ok(GSquareStatistic {
            g_square,
            degrees_of_freedom,
        })
    }
}

impl IndependenceTest for GSquareTest {
    fn check(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, IndTestError> {
        let stat = self.statistic(x, y, z)?;
        if stat.degrees_of_freedom == 0 {
            return Ok(IndependenceResult::independent(1.0, stat.g_square));
        }
        let p_value = match ChiSquared::new(stat.degrees_of_freedom as f64) {
            Ok(chi) => 1.0 - chi.cdf(stat.g_square.max(0.0)),
            Err(_) => return Ok(IndependenceResult::undetermined()),
        };
        Ok(IndependenceResult::from_p_value(p_value, stat.g_square, self.alpha))
    }

    fn variables(&self) -> &[Node] {
        self.data.variables()
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &str {
        "G Square"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn dataset(rows: &[[usize; 3]]) -> DiscreteDataSet {
        let flat: Vec<usize> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), 3), flat).unwrap();
        DiscreteDataSet::new(vec![Node::new("A"), Node::new("B"), Node::new("C")], data, vec![2, 2, 2]).unwrap()
    }

    #[test]
    fn copies_are_dependent() {
        let rows: Vec<[usize; 3]> = (0..40).map(|i| [i % 2, i % 2, (i / 2) % 2]).collect();
        let test = GSquareTest::new(dataset(&rows), 0.05).unwrap();
        let (a, b, c) = (Node::new("A"), Node::new("B"), Node::new("C"));
        assert!(test.check(&a, &b, &[]).unwrap().is_dependent());
        assert!(test.check(&a, &c, &[]).unwrap().is_independent());
    }

    #[test]
    fn constant_column_has_no_degrees_of_freedom() {
        let rows: Vec<[usize; 3]> = (0..20).map(|i| [i % 2, 0, 1]).collect();
        let test = GSquareTest::new(dataset(&rows), 0.05).unwrap();
        let result = test.check(&Node::new("A"), &Node::new("B"), &[]).unwrap();
        assert!(result.is_independent());
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn wide_conditioning_set_keeps_strata_apart() {
        let num_vars = 40;
        let nodes: Vec<Node> = (0..num_vars).map(|i| Node::new(format!("V{i}"))).collect();
        let rows = 200;
        let data = Array2::from_shape_fn((rows, num_vars), |(r, c)| match c {
            0 | 1 => r % 4,
            _ => ((r / 4) % 2 + c) % 4,
        });
        let test = GSquareTest::new(DiscreteDataSet::new(nodes.clone(), data, vec![4; num_vars]).unwrap(), 0.05).unwrap();

        let z = &nodes[2..38];
        let stat = test.statistic(&nodes[0], &nodes[1], z).unwrap();
        assert_eq!(stat.degrees_of_freedom, 18);
        assert!(test.check(&nodes[0], &nodes[1], z).unwrap().is_dependent());
    }
}
