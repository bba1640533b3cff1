//! Mixed-radix counting over a dimension vector.

/// Yields every vector `v` with `0 <= v[i] < dims[i]`, last position varying fastest.
///
/// An empty dimension vector yields one empty combination; any zero dimension yields none.
#[derive(Debug, Clone)]
pub struct CombinationIterator {
    dims: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl CombinationIterator {
    pub fn new(dims: &[usize]) -> Self {
        let current = if dims.iter().all(|&d| d > 0) {
            Some(vec![0; dims.len()])
        } else {
            None
        };
        Self {
            dims: dims.to_vec(),
            current,
        }
    }

    /// Number of combinations the iterator yields in total.
    pub fn total(&self) -> usize {
        self.dims.iter().product()
    }
}

impl Iterator for CombinationIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.take()?;
        let mut next = out.clone();
        let mut i = next.len();
        while i > 0 {
            i -= 1;
            next[i] += 1;
            if next[i] < self.dims[i] {
                self.current = Some(next);
                break;
            }
            next[i] = 0;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_yields_nothing() {
        assert_eq!(CombinationIterator::new(&[3, 0, 2]).count(), 0);
    }

    #[test]
    fn empty_dims_yield_one_empty_combination() {
        let all: Vec<_> = CombinationIterator::new(&[]).collect();
        assert_eq!(all, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn last_position_varies_fastest() {
        let all: Vec<_> = CombinationIterator::new(&[2, 2]).collect();
        assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
    }
}
