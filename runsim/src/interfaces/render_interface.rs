use crate::post::leaderboard::ScoreEntry;

pub const MAX_RENDER_UPDATE_FREQUENCY: f64 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// RunnerView is the per-frame view of the runner for the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct RunnerView {
    pub participant: String,
    pub emblem: String,
    pub color: RgbColor,
    pub distance: f64,
    pub avg_speed: f64,
    pub marker_position: f64,
}

/// RenderState is one snapshot sent to the presentation layer. The hurdle positions do not
/// change during a race but are included in every snapshot so the sink stays stateless.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub runner: RunnerView,
    pub hurdles: Vec<f64>,
    pub finish_line: f64,
    pub elapsed_display: String,
    pub finished: bool,

    // final result payload (sent once when the race finishes)
    pub final_result: Option<ScoreEntry>,
}
