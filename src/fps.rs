//! Frame-time tracking over a 60-sample ring.

/// Rolling FPS estimate from frame timestamps (milliseconds).
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Record one frame timestamp and refresh the estimate.
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % 60;

        // Oldest-to-newest span covers 60 frames.
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (60000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_hz_stream_reads_sixty() {
        let mut counter = FpsCounter::new();
        for i in 0..120 {
            counter.record(i as f64 * (1000.0 / 60.0));
        }
        assert!((59..=61).contains(&counter.fps()));
    }

    #[test]
    fn test_no_estimate_before_ring_fills() {
        let mut counter = FpsCounter::new();
        counter.record(16.0);
        assert_eq!(counter.fps(), 0);
    }
}
