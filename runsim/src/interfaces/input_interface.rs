use crate::core::race::{Key, Race};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

/// KeySource is the input collaborator of the race state machine: it yields the next
/// key-down event due at the given race time, or None while no press is pending. The
/// driver loop drains a source once per timestep.
pub trait KeySource {
    fn next_key(&mut self, race: &Race, now_s: f64) -> Option<Key>;

    /// True once the source can never yield another key; lets the driver loop fail early
    /// instead of spinning on a dried-up script.
    fn exhausted(&self) -> bool {
        false
    }
}

/// One recorded key press of a replay script.
/// * `t_s` - (s) Press time relative to the race start
/// * `key` - Pressed key, first character is used
#[derive(Debug, Deserialize, Clone)]
pub struct KeyPress {
    pub t_s: f64,
    pub key: String,
}

/// ScriptSource replays a recorded key script, sorted by press time.
pub struct ScriptSource {
    presses: Vec<KeyPress>,
    idx: usize,
}

impl ScriptSource {
    pub fn new(mut presses: Vec<KeyPress>) -> ScriptSource {
        presses.sort_by(|a, b| a.t_s.partial_cmp(&b.t_s).unwrap());
        ScriptSource { presses, idx: 0 }
    }
}

impl KeySource for ScriptSource {
    fn next_key(&mut self, _race: &Race, now_s: f64) -> Option<Key> {
        if self.idx < self.presses.len() && self.presses[self.idx].t_s <= now_s {
            let key = self.presses[self.idx]
                .key
                .chars()
                .next()
                .map(Key::from_char)
                .unwrap_or(Key::Other);
            self.idx += 1;
            Some(key)
        } else {
            None
        }
    }

    fn exhausted(&self) -> bool {
        self.idx >= self.presses.len()
    }
}

/// AutoPacer synthesizes presses for unattended runs: it alternates the two movement keys
/// at the given cadence with normally distributed jitter, presses the jump key while
/// blocked by a hurdle and the breathe key once the marker drifts below `breathe_below`.
pub struct AutoPacer<R: Rng> {
    cadence_hz: f64,
    jitter_sd_s: f64,
    breathe_below: f64,
    next_press_t: f64,
    last_step: Key,
    rng: R,
}

impl<R: Rng> AutoPacer<R> {
    pub fn new(cadence_hz: f64, jitter_sd_s: f64, breathe_below: f64, rng: R) -> AutoPacer<R> {
        AutoPacer {
            cadence_hz,
            jitter_sd_s,
            breathe_below,
            next_press_t: 0.0,
            last_step: Key::StepDown,
            rng,
        }
    }
}

impl AutoPacer<StdRng> {
    /// with_entropy builds a pacer on a freshly seeded rng; the seeded constructor is used
    /// where reproducibility matters.
    pub fn with_entropy(cadence_hz: f64, jitter_sd_s: f64, breathe_below: f64) -> AutoPacer<StdRng> {
        AutoPacer::new(cadence_hz, jitter_sd_s, breathe_below, StdRng::from_entropy())
    }
}

impl<R: Rng> KeySource for AutoPacer<R> {
    fn next_key(&mut self, race: &Race, now_s: f64) -> Option<Key> {
        if now_s < self.next_press_t {
            return None;
        }

        let key = if race.near_hurdle().is_some() {
            Key::Jump
        } else if race.pace.position() < self.breathe_below {
            Key::Breathe
        } else {
            self.last_step = match self.last_step {
                Key::StepUp => Key::StepDown,
                _ => Key::StepUp,
            };
            self.last_step
        };

        let jitter = if self.jitter_sd_s > 0.0 {
            Normal::new(0.0, self.jitter_sd_s)
                .unwrap()
                .sample(&mut self.rng)
        } else {
            0.0
        };
        // keep a minimum gap between presses even with extreme jitter
        self.next_press_t = now_s + (1.0 / self.cadence_hz + jitter).max(0.02);

        Some(key)
    }
}
