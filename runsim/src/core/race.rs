use crate::core::hurdles::{generate_hurdles, next_hurdle_in_window};
use crate::core::pace::PaceMarker;
use crate::core::speed::{SpeedReading, SpeedSampler};
use crate::post::leaderboard::ScoreEntry;
use helpers::general::{format_finish_time, ValidationError};
use rand::Rng;
use serde::Deserialize;

/// * `finish_line` - (units) Distance at which the race ends
/// * `step_gain` - (units) Distance gained per accepted alternating step
/// * `jump_gain` - (units) Distance gained per hurdle jump
/// * `hurdle_window` - (units) How far below a hurdle the runner counts as blocked
/// * `red_pace_modifier` - (-) Step multiplier while the marker sits in a red zone
/// * `breathe_gain` - (-) Marker shift per breathe key press
/// * `marker_initial` - (-) Marker position on race start
/// * `marker_neutral_zone` - (-) Lower and upper bound of the neutral breathing zone
/// * `speed_threshold` - (units/s) Average speed above which the marker is pushed left
/// * `speed_feedback_gain` - (-) Marker shift per unit of excess average speed
/// * `speed_window` - (-) Number of measurements in the speed averaging window
/// * `speed_debounce` - (s) Minimum interval between two committed speed samples
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RacePars {
    pub finish_line: f64,
    pub step_gain: f64,
    pub jump_gain: f64,
    pub hurdle_window: f64,
    pub red_pace_modifier: f64,
    pub breathe_gain: f64,
    pub marker_initial: f64,
    pub marker_neutral_zone: [f64; 2],
    pub speed_threshold: f64,
    pub speed_feedback_gain: f64,
    pub speed_window: usize,
    pub speed_debounce: f64,
}

impl Default for RacePars {
    fn default() -> Self {
        RacePars {
            finish_line: 100.0,
            step_gain: 0.7,
            jump_gain: 1.0,
            hurdle_window: 1.0,
            red_pace_modifier: 0.5,
            breathe_gain: 3.0,
            marker_initial: 50.0,
            marker_neutral_zone: [30.0, 70.0],
            speed_threshold: 3.0,
            speed_feedback_gain: 0.5,
            speed_window: 20,
            speed_debounce: 0.1,
        }
    }
}

/// Keyboard input understood by the race state machine. Letter keys are matched
/// case-insensitively. Keys the machine does not know still take part in the alternation
/// bookkeeping, so they are kept as `Other` instead of being dropped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    StepUp,
    StepDown,
    Jump,
    Breathe,
    Other,
}

impl Key {
    pub fn from_char(c: char) -> Key {
        match c.to_ascii_lowercase() {
            'w' => Key::StepUp,
            's' => Key::StepDown,
            'j' => Key::Jump,
            'b' => Key::Breathe,
            _ => Key::Other,
        }
    }

    /// alternates_with is true for a true alternation: this key and the previously stored
    /// key are the two movement keys in opposite order.
    fn alternates_with(self, last: Option<Key>) -> bool {
        matches!(
            (self, last),
            (Key::StepUp, Some(Key::StepDown)) | (Key::StepDown, Some(Key::StepUp))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Idle,
    Running,
    Finished,
}

impl Default for RacePhase {
    fn default() -> Self {
        RacePhase::Idle
    }
}

/// Race is the state machine of one race session: it consumes key-down events, advances
/// the distance, applies hurdle-clearance and pacing rules and detects completion. All
/// mutable race state lives in this value, so several sessions can exist side by side and
/// a restart is a plain reset.
#[derive(Debug)]
pub struct Race {
    pub pars: RacePars,
    pub phase: RacePhase,
    pub participant: String,
    pub distance: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub last_key: Option<Key>,
    pub last_press_time: f64,
    pub jump_ready: bool,
    pub hurdles: Vec<f64>,
    pub pace: PaceMarker,
    sampler: SpeedSampler,
    pub print_events: bool,
}

impl Race {
    pub fn new(pars: &RacePars) -> Race {
        Race {
            pars: pars.clone(),
            phase: RacePhase::Idle,
            participant: String::new(),
            distance: 0.0,
            start_time: 0.0,
            end_time: 0.0,
            last_key: None,
            last_press_time: 0.0,
            jump_ready: false,
            hurdles: Vec::new(),
            pace: PaceMarker::new(
                pars.marker_initial,
                pars.marker_neutral_zone,
                pars.red_pace_modifier,
            ),
            sampler: SpeedSampler::new(
                pars.speed_window,
                pars.speed_debounce,
                pars.speed_threshold,
                pars.speed_feedback_gain,
            ),
            print_events: false,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // STATE TRANSITIONS ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// start performs the Idle -> Running transition: validates the participant identifier,
    /// resets all race state, regenerates the hurdles and records the start timestamp.
    pub fn start<R: Rng>(
        &mut self,
        participant: &str,
        now_s: f64,
        rng: &mut R,
    ) -> Result<(), ValidationError> {
        let participant = participant.trim();
        if participant.is_empty() {
            return Err(ValidationError(
                "Please select your participant before starting!".to_owned(),
            ));
        }

        self.phase = RacePhase::Running;
        self.participant = participant.to_owned();
        self.distance = 0.0;
        self.start_time = now_s;
        self.end_time = now_s;
        self.last_key = None;
        self.last_press_time = now_s;
        self.jump_ready = false;
        self.hurdles = generate_hurdles(rng);
        self.pace.reset();
        self.sampler.reset(now_s, 0.0);

        if self.print_events {
            println!(
                "INFO: {} is off, {} hurdles on the track",
                self.participant,
                self.hurdles.len()
            );
        }

        Ok(())
    }

    /// reset returns the race to Idle without recording a result (the restart control).
    pub fn reset(&mut self) {
        self.phase = RacePhase::Idle;
        self.participant.clear();
        self.distance = 0.0;
        self.last_key = None;
        self.jump_ready = false;
        self.hurdles.clear();
        self.pace.reset();
        self.sampler.reset(0.0, 0.0);
    }

    // ---------------------------------------------------------------------------------------------
    // EVENT HANDLING ------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// handle_key consumes one key-down event while running. Within one event the
    /// hurdle-clearance check, the alternation/movement check and the breathe check run in
    /// that fixed order against a single consistent snapshot of state. Returns the score
    /// entry when this event crosses the finish line.
    pub fn handle_key(&mut self, key: Key, now_s: f64) -> Option<ScoreEntry> {
        if self.phase != RacePhase::Running {
            return None;
        }

        // hurdle-clearance check: while blocked, only the jump key gets through; a
        // swallowed event leaves last_key untouched
        if self.near_hurdle().is_some() {
            self.jump_ready = true;
            if key == Key::Jump {
                self.distance += self.pars.jump_gain;
            } else {
                return None;
            }
        }

        let mut entry = None;

        // alternation/movement check
        if key.alternates_with(self.last_key) {
            // blocked until the hurdle is cleared with a jump first
            if !(self.near_hurdle().is_some() && !self.jump_ready) {
                self.distance += self.pars.step_gain * self.pace.pace_modifier();
                self.jump_ready = false;

                // no clamping: the overshoot past the finish line is kept as-is
                if self.distance >= self.pars.finish_line {
                    entry = Some(self.finish(now_s));
                }
            }
        }

        // breathe check, independent of the movement branches
        if key == Key::Breathe {
            self.pace.shift(self.pars.breathe_gain);
        }

        self.last_key = Some(key);
        self.last_press_time = now_s;

        entry
    }

    fn finish(&mut self, now_s: f64) -> ScoreEntry {
        self.phase = RacePhase::Finished;
        self.end_time = now_s;
        let time_s = self.end_time - self.start_time;

        if self.print_events {
            println!(
                "INFO: {} crossed the finish line at {:.1} units after {}",
                self.participant,
                self.distance,
                format_finish_time(time_s)
            );
        }

        ScoreEntry {
            participant: self.participant.clone(),
            time_s,
        }
    }

    /// poll_speed runs one sampler check and applies a requested marker feedback shift.
    /// Returns the committed reading for display purposes. Inactive outside of Running,
    /// which is what stops the recurring sampling when a race ends.
    pub fn poll_speed(&mut self, now_s: f64) -> Option<SpeedReading> {
        if self.phase != RacePhase::Running {
            return None;
        }

        let reading = self.sampler.sample(now_s, self.distance)?;
        if reading.pace_shift != 0.0 {
            self.pace.shift(reading.pace_shift);
        }
        Some(reading)
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// near_hurdle returns the blocking hurdle position if the runner is within the hurdle
    /// window below one.
    pub fn near_hurdle(&self) -> Option<f64> {
        next_hurdle_in_window(&self.hurdles, self.distance, self.pars.hurdle_window)
    }

    pub fn avg_speed(&self) -> f64 {
        self.sampler.avg_speed()
    }

    /// elapsed_s returns the running race time, the final time once finished, 0.0 in Idle.
    pub fn elapsed_s(&self, now_s: f64) -> f64 {
        match self.phase {
            RacePhase::Idle => 0.0,
            RacePhase::Running => now_s - self.start_time,
            RacePhase::Finished => self.end_time - self.start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started_race() -> Race {
        let mut race = Race::new(&RacePars::default());
        let mut rng = StdRng::seed_from_u64(42);
        race.start("Testland", 0.0, &mut rng).unwrap();
        race
    }

    /// Alternate the two movement keys n times, first StepUp, starting at t0 and spacing
    /// the presses by dt.
    fn alternate(race: &mut Race, n: usize, t0: f64, dt: f64) -> Option<ScoreEntry> {
        let mut entry = None;
        for i in 0..n {
            let key = if i % 2 == 0 { Key::StepUp } else { Key::StepDown };
            if let Some(e) = race.handle_key(key, t0 + i as f64 * dt) {
                entry = Some(e);
            }
        }
        entry
    }

    #[test]
    fn empty_participant_fails_validation() {
        let mut race = Race::new(&RacePars::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(race.start("  ", 0.0, &mut rng).is_err());
        assert_eq!(race.phase, RacePhase::Idle);
    }

    #[test]
    fn fifty_alternations_cover_thirty_five_units() {
        let mut race = started_race();
        race.hurdles.clear();

        // first press has no predecessor, so 51 presses yield 50 accepted alternations
        assert!(alternate(&mut race, 51, 0.1, 0.1).is_none());

        assert_relative_eq!(race.distance, 35.0, epsilon = 1e-9);
        assert_eq!(race.phase, RacePhase::Running);
    }

    #[test]
    fn repeated_keys_do_not_move_the_runner() {
        let mut race = started_race();
        race.hurdles.clear();

        race.handle_key(Key::StepUp, 0.1);
        race.handle_key(Key::StepUp, 0.2);
        race.handle_key(Key::StepUp, 0.3);
        assert_relative_eq!(race.distance, 0.0);

        // the repeat still updated last_key, so a StepDown now alternates
        race.handle_key(Key::StepDown, 0.4);
        assert_relative_eq!(race.distance, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn unknown_keys_break_the_alternation_chain() {
        let mut race = started_race();
        race.hurdles.clear();

        race.handle_key(Key::StepUp, 0.1);
        race.handle_key(Key::Other, 0.2);
        race.handle_key(Key::StepDown, 0.3);
        assert_relative_eq!(race.distance, 0.0);
    }

    #[test]
    fn hurdle_blocks_movement_until_the_jump_clears_it() {
        let mut race = started_race();
        race.hurdles = vec![50.0];
        race.distance = 49.5;
        race.last_key = Some(Key::StepDown);

        // a movement key near the hurdle is swallowed without touching last_key
        race.handle_key(Key::StepUp, 0.1);
        assert_relative_eq!(race.distance, 49.5);
        assert!(race.jump_ready);
        assert_eq!(race.last_key, Some(Key::StepDown));

        // the breathe key is swallowed as well
        let marker_before = race.pace.position();
        race.handle_key(Key::Breathe, 0.2);
        assert_relative_eq!(race.pace.position(), marker_before);

        // the jump clears the hurdle with a fixed credit
        race.handle_key(Key::Jump, 0.3);
        assert_relative_eq!(race.distance, 50.5, epsilon = 1e-9);
        assert_eq!(race.last_key, Some(Key::Jump));
        assert_eq!(race.near_hurdle(), None);

        // the jump key itself never alternates, so the chain restarts
        race.handle_key(Key::StepUp, 0.4);
        assert_relative_eq!(race.distance, 50.5, epsilon = 1e-9);
        race.handle_key(Key::StepDown, 0.5);
        assert_relative_eq!(race.distance, 51.2, epsilon = 1e-9);
    }

    #[test]
    fn red_zone_halves_the_step_gain() {
        let mut race = started_race();
        race.hurdles.clear();
        race.pace.shift(-25.0); // 50 -> 25, below the neutral band

        race.handle_key(Key::StepUp, 0.1);
        race.handle_key(Key::StepDown, 0.2);
        assert_relative_eq!(race.distance, 0.35, epsilon = 1e-9);
    }

    #[test]
    fn breathing_shifts_the_marker_without_consuming_a_step() {
        let mut race = started_race();
        race.hurdles.clear();

        race.handle_key(Key::StepUp, 0.1);
        race.handle_key(Key::Breathe, 0.2);
        assert_relative_eq!(race.pace.position(), 53.0);
        assert_relative_eq!(race.distance, 0.0);

        // breathe updated last_key, so the chain restarts here as well
        race.handle_key(Key::StepDown, 0.3);
        assert_relative_eq!(race.distance, 0.0);
        race.handle_key(Key::StepUp, 0.4);
        assert_relative_eq!(race.distance, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn finish_keeps_the_overshoot_and_records_the_elapsed_time() {
        let mut race = started_race();
        race.hurdles.clear();
        race.distance = 99.7;
        race.last_key = Some(Key::StepDown);

        let entry = race.handle_key(Key::StepUp, 12.5).expect("race must finish");

        assert_eq!(race.phase, RacePhase::Finished);
        assert_relative_eq!(race.distance, 100.4, epsilon = 1e-9);
        assert_eq!(entry.participant, "Testland");
        assert_relative_eq!(entry.time_s, 12.5, epsilon = 1e-9);
        assert_relative_eq!(race.elapsed_s(99.0), 12.5, epsilon = 1e-9);

        // a finished race ignores further input
        race.handle_key(Key::StepDown, 13.0);
        assert_relative_eq!(race.distance, 100.4, epsilon = 1e-9);
    }

    #[test]
    fn poll_speed_feeds_the_marker_and_stops_after_the_finish() {
        let mut race = started_race();
        race.hurdles.clear();

        // sprint: 5 units/s sustained moves the marker left by 1.0 per reading
        race.distance = 5.0;
        let reading = race.poll_speed(1.0).unwrap();
        assert_relative_eq!(reading.avg_speed, 5.0);
        assert_relative_eq!(race.pace.position(), 49.0);

        race.distance = 99.7;
        race.last_key = Some(Key::StepDown);
        race.handle_key(Key::StepUp, 2.0);
        assert_eq!(race.phase, RacePhase::Finished);
        assert!(race.poll_speed(3.0).is_none());
    }

    #[test]
    fn restart_regenerates_the_hurdles_and_resets_the_marker() {
        let mut race = started_race();
        race.pace.shift(20.0);
        race.distance = 40.0;

        race.reset();
        assert_eq!(race.phase, RacePhase::Idle);
        assert!(race.hurdles.is_empty());
        assert_relative_eq!(race.distance, 0.0);
        assert_relative_eq!(race.pace.position(), 50.0);

        let mut rng = StdRng::seed_from_u64(7);
        race.start("Runnaria", 5.0, &mut rng).unwrap();
        assert_eq!(race.phase, RacePhase::Running);
        assert!(!race.hurdles.is_empty());
        assert_relative_eq!(race.start_time, 5.0);
    }
}
