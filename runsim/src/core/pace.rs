/// Breathing zones of the pace marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceZone {
    /// Marker left the neutral band, movement is penalized.
    Red,
    Neutral,
}

/// PaceMarker holds the breathing balance of the runner as a bounded value in [0, 100].
/// Explicit breathe actions shift it right, sustained speed shifts it left (requested by
/// the speed sampler). The marker has no scheduling of its own, it only reacts to shifts.
#[derive(Debug, Clone)]
pub struct PaceMarker {
    position: f64,
    initial_position: f64,
    neutral_zone: [f64; 2],
    red_modifier: f64,
}

impl PaceMarker {
    pub fn new(initial_position: f64, neutral_zone: [f64; 2], red_modifier: f64) -> PaceMarker {
        PaceMarker {
            position: initial_position,
            initial_position,
            neutral_zone,
            red_modifier,
        }
    }

    /// reset returns the marker to its neutral starting position (done on every race start).
    pub fn reset(&mut self) {
        self.position = self.initial_position;
    }

    /// shift moves the marker by delta and clamps it to [0, 100].
    pub fn shift(&mut self, delta: f64) {
        self.position = (self.position + delta).clamp(0.0, 100.0);
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// zone returns Red outside the neutral band; the band boundaries themselves still
    /// count as neutral.
    pub fn zone(&self) -> PaceZone {
        if self.position < self.neutral_zone[0] || self.position > self.neutral_zone[1] {
            PaceZone::Red
        } else {
            PaceZone::Neutral
        }
    }

    /// pace_modifier returns the step multiplier applied by the race state machine.
    pub fn pace_modifier(&self) -> f64 {
        match self.zone() {
            PaceZone::Red => self.red_modifier,
            PaceZone::Neutral => 1.0,
        }
    }
}
