//! Fixed-bin histogram accumulation for the feature extractor.

/// A fixed-bin histogram over normalized [0, 1] samples.
#[derive(Debug, Clone)]
pub(crate) struct Histogram {
    bins: Vec<f32>,
}

impl Histogram {
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0.0; bin_count],
        }
    }

    /// Build a histogram by mapping every value through `sample`.
    pub fn accumulate<F>(bin_count: usize, pixel_count: usize, sample: F) -> Self
    where
        F: Fn(usize) -> f32,
    {
        let mut hist = Self::new(bin_count);
        for i in 0..pixel_count {
            hist.add(sample(i));
        }
        hist
    }

    /// Count one sample, clamping into [0, 1].
    pub fn add(&mut self, value: f32) {
        let n = self.bins.len();
        let v = value.clamp(0.0, 1.0);
        let bin = ((v * n as f32) as usize).min(n - 1);
        self.bins[bin] += 1.0;
    }

    /// Total mass across all bins.
    pub fn total(&self) -> f32 {
        self.bins.iter().sum()
    }

    /// Weighted mean and variance of bin centers, where bin `i` represents
    /// the value `i * scale`. Returns `None` on zero total mass.
    ///
    /// Luminance-style histograms pass `scale = 1 / (bins - 1)`; the hue
    /// histogram divides by the bin count instead.
    pub fn stats(&self, scale: f32) -> Option<(f32, f32)> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }

        let mut mean = 0.0f32;
        for (i, &count) in self.bins.iter().enumerate() {
            mean += i as f32 * scale * count;
        }
        mean /= total;

        let mut variance = 0.0f32;
        for (i, &count) in self.bins.iter().enumerate() {
            let d = i as f32 * scale - mean;
            variance += d * d * count;
        }
        variance /= total;

        Some((mean, variance))
    }

    #[cfg(test)]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }
}
