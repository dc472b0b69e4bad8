use std::collections::VecDeque;

/// One committed reading of the speed sampler.
#[derive(Debug, Clone, Copy)]
pub struct SpeedReading {
    /// Average over the sample window, in race-track units per second.
    pub avg_speed: f64,
    /// Requested pace-marker shift; 0.0 while the average stays at or below the speed
    /// threshold, negative (leftward) above it.
    pub pace_shift: f64,
}

/// SpeedSampler turns distance deltas over time deltas into an averaged velocity. It is
/// polled on a recurring schedule while the race runs; a new sample is only committed once
/// more than the debounce interval has passed since the last check. Raw speeds that are
/// non-finite or negative (clock anomalies) are discarded without entering the window.
#[derive(Debug)]
pub struct SpeedSampler {
    window: VecDeque<f64>,
    max_samples: usize,
    debounce_s: f64,
    speed_threshold: f64,
    feedback_gain: f64,
    last_check_time: f64,
    last_check_distance: f64,
}

impl SpeedSampler {
    pub fn new(
        max_samples: usize,
        debounce_s: f64,
        speed_threshold: f64,
        feedback_gain: f64,
    ) -> SpeedSampler {
        SpeedSampler {
            window: VecDeque::with_capacity(max_samples),
            max_samples,
            debounce_s,
            speed_threshold,
            feedback_gain,
            last_check_time: 0.0,
            last_check_distance: 0.0,
        }
    }

    /// reset clears the window and rebases the sampler on the current time and distance.
    /// Called on every race start so a restarted race never sees stale samples.
    pub fn reset(&mut self, now_s: f64, distance: f64) {
        self.window.clear();
        self.last_check_time = now_s;
        self.last_check_distance = distance;
    }

    /// sample commits a new speed measurement if the debounce interval has passed. The
    /// check time and distance are rebased even when the raw speed is discarded, so one
    /// bad clock reading cannot poison the following sample.
    pub fn sample(&mut self, now_s: f64, distance: f64) -> Option<SpeedReading> {
        let delta_time = now_s - self.last_check_time;
        if delta_time <= self.debounce_s {
            return None;
        }

        let raw_speed = (distance - self.last_check_distance) / delta_time;

        let reading = if raw_speed.is_finite() && raw_speed >= 0.0 {
            self.window.push_back(raw_speed);
            if self.window.len() > self.max_samples {
                self.window.pop_front();
            }

            let avg_speed = self.avg_speed();
            let pace_shift = if avg_speed > self.speed_threshold {
                -(avg_speed - self.speed_threshold) * self.feedback_gain
            } else {
                0.0
            };

            Some(SpeedReading {
                avg_speed,
                pace_shift,
            })
        } else {
            None
        };

        self.last_check_time = now_s;
        self.last_check_distance = distance;

        reading
    }

    /// avg_speed returns the average over the current window, 0.0 while it is empty.
    pub fn avg_speed(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}
