//! Column-named sample matrices.

use ndarray::{Array2, ArrayView1, Axis};

use blanket_core::errors::IndTestError;
use blanket_core::types::collections::FxHashMap;

use crate::graph::Node;

fn column_index(variables: &[Node]) -> FxHashMap<String, usize> {
    variables
        .iter()
        .enumerate()
        .map(|(i, v)| (v.name().to_string(), i))
        .collect()
}

/// `n x p` real-valued sample; column `j` belongs to `variables[j]`.
#[derive(Debug, Clone)]
pub struct ContinuousDataSet {
    variables: Vec<Node>,
    data: Array2<f64>,
    index: FxHashMap<String, usize>,
}

impl ContinuousDataSet {
    pub fn new(variables: Vec<Node>, data: Array2<f64>) -> Result<Self, IndTestError> {
        if data.ncols() != variables.len() {
            return Err(IndTestError::DimensionMismatch {
                expected: variables.len(),
                found: data.ncols(),
            });
        }
        let index = column_index(&variables);
        Ok(Self { variables, data, index })
    }

    pub fn variables(&self) -> &[Node] {
        &self.variables
    }

    pub fn num_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column(&self, j: usize) -> ArrayView1<'_, f64> {
        self.data.column(j)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Unbiased sample covariance matrix (`n - 1` denominator).
    pub fn covariance_matrix(&self) -> Result<Array2<f64>, IndTestError> {
        let n = self.num_rows();
        if n < 2 {
            return Err(IndTestError::InsufficientData {
                message: format!("covariance needs at least 2 rows, got {n}"),
            });
        }
        let means = self.data.mean_axis(Axis(0)).ok_or_else(|| IndTestError::InsufficientData {
            message: "empty sample".to_string(),
        })?;
        let centered = &self.data - &means;
        Ok(centered.t().dot(&centered) / (n as f64 - 1.0))
    }
}

/// `n x p` categorical sample; entries are category indices below `categories[j]`.
#[derive(Debug, Clone)]
pub struct DiscreteDataSet {
    variables: Vec<Node>,
    data: Array2<usize>,
    categories: Vec<usize>,
    index: FxHashMap<String, usize>,
}

impl DiscreteDataSet {
    pub fn new(variables: Vec<Node>, data: Array2<usize>, categories: Vec<usize>) -> Result<Self, IndTestError> {
        if data.ncols() != variables.len() {
            return Err(IndTestError::DimensionMismatch {
                expected: variables.len(),
                found: data.ncols(),
            });
        }
        if categories.len() != variables.len() {
            return Err(IndTestError::DimensionMismatch {
                expected: variables.len(),
                found: categories.len(),
            });
        }
        for (j, column) in data.columns().into_iter().enumerate() {
            if let Some(&bad) = column.iter().find(|&&v| v >= categories[j]) {
                return Err(IndTestError::InsufficientData {
                    message: format!(
                        "value {bad} in column {} exceeds its {} categories",
                        variables[j].name(),
                        categories[j]
                    ),
                });
            }
        }
        let index = column_index(&variables);
        Ok(Self {
            variables,
            data,
            categories,
            index,
        })
    }

    pub fn variables(&self) -> &[Node] {
        &self.variables
    }

    pub fn num_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn num_categories(&self, j: usize) -> usize {
        self.categories[j]
    }

    pub fn value(&self, row: usize, column: usize) -> usize {
        self.data[[row, column]]
    }

    pub fn data(&self) -> &Array2<usize> {
        &self.data
    }
}
