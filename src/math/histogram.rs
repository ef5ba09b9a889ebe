/// Equal-width histogram normalised to a probability density.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges; empty when there was no finite sample.
    pub edges: Vec<f64>,
    pub density: Vec<f64>,
    pub samples: usize,
}

impl Histogram {
    /// Bins span `[min, max]` of the finite samples (widened by 0.5 on each
    /// side when every sample is equal). The last bin includes its right edge.
    pub fn density(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self {
                edges: Vec::new(),
                density: Vec::new(),
                samples: 0,
            };
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in &finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let n = finite.len() as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let density = counts.iter().map(|&c| c as f64 / (n * width)).collect();
        Self {
            edges,
            density,
            samples: finite.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.density.iter())
            .map(|(e, &d)| (e[0], e[1], d))
    }

    /// Smallest and largest strictly positive density.
    pub fn positive_range(&self) -> Option<(f64, f64)> {
        let positive = self.density.iter().copied().filter(|d| *d > 0.0);
        let (mut lo, mut hi) = (f64::INFINITY, 0.0f64);
        for d in positive {
            lo = lo.min(d);
            hi = hi.max(d);
        }
        if hi > 0.0 { Some((lo, hi)) } else { None }
    }
}
