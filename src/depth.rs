#[allow(unused_imports)]
use crate::Avl;

// an AVL tree of 10^9 entries is only 44 levels deep, 64 leaves headroom.
const MAX_DEPTH: usize = 64;

/// Depth calculates minimum, maximum, average and percentile of leaf-node
/// depths in the [`Avl`] tree. Collected by [`Avl::validate`].
#[derive(Clone, Debug)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    depths: [u64; MAX_DEPTH],
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        self.samples += 1;
        self.total += depth;
        if self.samples == 1 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
        self.depths[depth.min(MAX_DEPTH - 1)] += 1;
    }

    /// Return number of leaf-nodes sampled in [`Avl`] instance.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Return minimum depth of leaf-node in [`Avl`] instance.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Return maximum depth of leaf-node in [`Avl`] instance. Same as
    /// the tree's height.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average depth of leaf-nodes, zero when nothing was
    /// sampled.
    pub fn mean(&self) -> usize {
        self.total.checked_div(self.samples).unwrap_or(0)
    }

    /// Return depth as tuple of percentiles, each tuple provides
    /// (percentile, depth). Returned percentiles from 90, 91 .. 100
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut percentiles: Vec<(u8, usize)> = vec![];
        if self.samples == 0 {
            return percentiles;
        }
        let (mut acc, mut prev_perc) = (0_u64, 90_u8);
        let iter = self.depths.iter().enumerate().filter(|(_, &n)| n > 0);
        for (depth, n) in iter {
            acc += *n;
            let perc = ((acc as f64 / self.samples as f64) * 100_f64) as u8;
            if perc >= prev_perc {
                percentiles.push((perc, depth));
                prev_perc = perc;
            }
        }
        percentiles
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth {
            samples: 0,
            min: 0,
            max: 0,
            total: 0,
            depths: [0; MAX_DEPTH],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_depth() {
        let mut depth = Depth::new();
        assert_eq!(depth.mean(), 0);
        assert!(depth.percentiles().is_empty());

        for d in [2, 3, 3, 3].iter() {
            depth.sample(*d);
        }
        assert_eq!(depth.samples(), 4);
        assert_eq!(depth.min(), 2);
        assert_eq!(depth.max(), 3);
        assert_eq!(depth.mean(), 2);
        assert_eq!(depth.percentiles(), vec![(100, 3)]);
    }
}
