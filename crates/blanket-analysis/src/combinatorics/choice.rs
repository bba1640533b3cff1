//! Lexicographic k-subsets of `0..n`.

/// Yields every `k`-subset of `0..n` as ascending index vectors, in lexicographic order.
///
/// `k == 0` yields the empty subset once; `k > n` yields nothing.
#[derive(Debug, Clone)]
pub struct ChoiceGenerator {
    n: usize,
    k: usize,
    current: Option<Vec<usize>>,
}

impl ChoiceGenerator {
    pub fn new(n: usize, k: usize) -> Self {
        let current = if k <= n { Some((0..k).collect()) } else { None };
        Self { n, k, current }
    }

    fn advance(&self, prev: &[usize]) -> Option<Vec<usize>> {
        let mut next = prev.to_vec();
        let mut i = self.k;
        while i > 0 {
            i -= 1;
            if next[i] < self.n - self.k + i {
                next[i] += 1;
                for j in i + 1..self.k {
                    next[j] = next[j - 1] + 1;
                }
                return Some(next);
            }
        }
        None
    }
}

impl Iterator for ChoiceGenerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.take()?;
        self.current = self.advance(&out);
        Some(out)
    }
}

/// Yields every subset of `0..n` with size `0..=depth`, smaller sizes first.
#[derive(Debug, Clone)]
pub struct DepthChoiceGenerator {
    n: usize,
    max_size: usize,
    size: usize,
    inner: ChoiceGenerator,
}

impl DepthChoiceGenerator {
    pub fn new(n: usize, depth: usize) -> Self {
        Self {
            n,
            max_size: depth.min(n),
            size: 0,
            inner: ChoiceGenerator::new(n, 0),
        }
    }
}

impl Iterator for DepthChoiceGenerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(choice) = self.inner.next() {
                return Some(choice);
            }
            if self.size >= self.max_size {
                return None;
            }
            self.size += 1;
            self.inner = ChoiceGenerator::new(self.n, self.size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_choose_three() {
        let all: Vec<Vec<usize>> = ChoiceGenerator::new(5, 3).collect();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], vec![0, 1, 2]);
        assert_eq!(all[1], vec![0, 1, 3]);
        assert_eq!(all[9], vec![2, 3, 4]);
    }

    #[test]
    fn edge_sizes() {
        assert_eq!(ChoiceGenerator::new(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(ChoiceGenerator::new(0, 0).count(), 1);
        assert_eq!(ChoiceGenerator::new(2, 3).count(), 0);
        assert_eq!(ChoiceGenerator::new(4, 4).count(), 1);
    }

    #[test]
    fn depth_choice_counts_all_small_subsets() {
        // 1 + 4 + 6
        assert_eq!(DepthChoiceGenerator::new(4, 2).count(), 11);
        assert_eq!(DepthChoiceGenerator::new(4, 10).count(), 16);
        let first_two: Vec<_> = DepthChoiceGenerator::new(3, 1).take(2).collect();
        assert_eq!(first_two, vec![vec![], vec![0]]);
    }
}
