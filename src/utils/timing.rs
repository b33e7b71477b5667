use std::time::{Duration, Instant};

/// Wall-clock timer for the phases of one initialization run.
///
/// `start` is taken when the timer is created; `begin_phase` restarts the
/// phase clock without touching the total.
#[derive(Debug)]
pub struct PhaseTimer {
    start_time: Instant,
    phase_start: Option<Instant>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start: None,
        }
    }

    pub fn begin_phase(&mut self) {
        self.phase_start = Some(Instant::now());
    }

    /// Elapsed time of the current phase, `None` if no phase was started.
    pub fn phase_elapsed(&self) -> Option<Duration> {
        self.phase_start.map(|start| start.elapsed())
    }

    pub fn total_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_elapsed(&self, phase: &str, elapsed: Duration) {
        tracing::info!(
            phase = phase,
            elapsed_ms = elapsed.as_millis() as u64,
            "⏱️ {} took {:.3} seconds",
            phase,
            elapsed.as_secs_f64()
        );
    }

    pub fn log_total(&self) {
        let total = self.total_elapsed();
        tracing::info!(
            elapsed_ms = total.as_millis() as u64,
            "⏱️ Total time taken: {:.3} seconds",
            total.as_secs_f64()
        );
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_not_started() {
        let timer = PhaseTimer::new();
        assert!(timer.phase_elapsed().is_none());
    }

    #[test]
    fn test_phase_is_within_total() {
        let mut timer = PhaseTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        timer.begin_phase();
        let phase = timer.phase_elapsed().unwrap();
        assert!(phase <= timer.total_elapsed());
        assert!(timer.total_elapsed() >= Duration::from_millis(5));
    }
}
