use std::{fmt, hint::black_box, time::Instant};

/// Aggregated timings of one benchmark configuration, in nanoseconds
/// per iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
}

impl Summary {
    /// Summarizes a set of samples. Returns [`None`] when there are none.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / count;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Self {
            mean,
            stddev: variance.sqrt(),
            min,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>14.1}{:>14.1}{:>14.3}", self.mean, self.min, self.stddev)
    }
}

/// Times `samples` runs of `iterations` calls to `f` after a short
/// warmup.
pub fn measure<E>(
    samples: usize,
    iterations: usize,
    mut f: impl FnMut() -> Result<(), E>,
) -> Result<Option<Summary>, E> {
    for _ in 0..(iterations / 100).max(1) {
        black_box(f()?);
    }

    let mut timings = Vec::with_capacity(samples);
    for _ in 0..samples {
        let start = Instant::now();
        for _ in 0..iterations {
            black_box(f()?);
        }
        let elapsed = start.elapsed();

        timings.push(elapsed.as_nanos() as f64 / iterations.max(1) as f64);
    }

    Ok(Summary::from_samples(&timings))
}
