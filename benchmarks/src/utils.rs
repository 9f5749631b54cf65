use std::time::{Duration, Instant};

/// Accumulating stopwatch.
#[derive(Debug, Default)]
pub struct Timer {
    start: Option<Instant>,
    total: Duration,
    laps: Vec<Duration>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Stop the running lap and return its duration. Zero if not running.
    pub fn stop(&mut self) -> Duration {
        match self.start.take() {
            Some(start) => {
                let elapsed = start.elapsed();
                self.total += elapsed;
                self.laps.push(elapsed);
                elapsed
            }
            None => Duration::ZERO,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    pub fn stats(&self) -> Option<RunStats> {
        RunStats::from_durations(&self.laps)
    }
}

/// Run `f` once and return its result with the elapsed time.
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Summary of repeated timings, in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub runs: usize,
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
}

impl RunStats {
    /// `None` for an empty sample.
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        let mut times: Vec<f64> = durations
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect();
        times.sort_by(f64::total_cmp);

        let n = times.len();
        let mean = times.iter().sum::<f64>() / n as f64;
        let variance = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };

        Some(Self {
            runs: n,
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
        })
    }
}
