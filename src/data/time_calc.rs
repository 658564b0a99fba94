use std::time::Duration;

/// Per-stage latency accumulator.
///
/// Stage `i` collects one duration per recorded call; averages divide by the
/// number of calls recorded for that stage.
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    duration: Vec<Duration>,
    counts: Vec<u32>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    /// Number of calls recorded for the first stage.
    pub fn n(&self) -> usize {
        self.counts.first().copied().unwrap_or(0) as usize
    }

    /// Average time of one full call across all stages.
    pub fn avg(&self) -> Duration {
        match self.n() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    pub fn avg_i(&self, i: usize) -> Option<Duration> {
        match (self.duration.get(i), self.counts.get(i)) {
            (Some(d), Some(&n)) if n > 0 => Some(*d / n),
            _ => None,
        }
    }

    pub fn ts(&self) -> &Vec<Duration> {
        &self.duration
    }

    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        while self.duration.len() <= i {
            self.duration.push(Duration::ZERO);
            self.counts.push(0);
        }
        self.duration[i] += x;
        self.counts[i] += 1;
    }

    pub fn clear(&mut self) {
        self.duration = Default::default();
        self.counts = Default::default();
    }
}
