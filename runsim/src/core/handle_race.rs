use crate::core::clock::SystemClock;
use crate::core::race::Race;
use crate::interfaces::input_interface::KeySource;
use crate::interfaces::render_interface::{
    RenderState, RgbColor, RunnerView, MAX_RENDER_UPDATE_FREQUENCY,
};
use crate::post::leaderboard::ScoreEntry;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use css_color_parser;
use flume::Sender;
use helpers::general::{format_finish_time, format_race_clock};
use std::thread::sleep;
use std::time::Duration;

/// handle_race runs one complete race for the given participant, driven by the inserted
/// key source, and returns the score entry for the leaderboard. If a sender is inserted
/// the race runs in real time and render states are sent at most at
/// MAX_RENDER_UPDATE_FREQUENCY; otherwise the timeline is purely simulated.
pub fn handle_race(
    sim_pars: &SimPars,
    participant: &str,
    keys: &mut dyn KeySource,
    timestep_size: f64,
    print_debug: bool,
    tx: Option<&Sender<RenderState>>,
    realtime_factor: f64,
) -> anyhow::Result<ScoreEntry> {
    let participant_pars = sim_pars
        .participant_pars_all
        .get(participant)
        .with_context(|| format!("Unknown participant {}!", participant))?;

    let tmp_color = participant_pars
        .color
        .parse::<css_color_parser::Color>()
        .context("Could not parse hex color!")?;
    let color = RgbColor {
        r: tmp_color.r,
        g: tmp_color.g,
        b: tmp_color.b,
    };

    let mut race = Race::new(&sim_pars.race_pars);
    race.print_events = print_debug;
    race.start(participant, 0.0, &mut rand::thread_rng())?;

    // check if sender was inserted -> in that case run the race in real time
    let sim_realtime = tx.is_some();
    let mut t = 0.0;
    let mut entry: Option<ScoreEntry> = None;

    if !sim_realtime {
        let mut t_debug_print = 0.0;

        while entry.is_none() {
            t += timestep_size;

            while let Some(key) = keys.next_key(&race, t) {
                if let Some(e) = race.handle_key(key, t) {
                    entry = Some(e);
                    break;
                }
            }
            race.poll_speed(t);

            if entry.is_none() && keys.exhausted() {
                anyhow::bail!("Key source ran dry before the finish line!");
            }

            if print_debug && t > t_debug_print + 0.9999 {
                println!(
                    "INFO: Simulating... race clock {}, distance {:.1} units, marker at {:.1}",
                    format_race_clock(race.elapsed_s(t)),
                    race.distance,
                    race.pace.position()
                );
                t_debug_print = t;
            }
        }
    } else {
        let tx = tx.unwrap();
        let clock = SystemClock::new();
        let mut t_render_update = 0.0;

        while entry.is_none() {
            let t_loop_start = clock.now_s();
            t += timestep_size;

            while let Some(key) = keys.next_key(&race, t) {
                if let Some(e) = race.handle_key(key, t) {
                    entry = Some(e);
                    break;
                }
            }
            race.poll_speed(t);

            if entry.is_none() && keys.exhausted() {
                anyhow::bail!("Key source ran dry before the finish line!");
            }

            if t > t_render_update + 1.0 / MAX_RENDER_UPDATE_FREQUENCY - 0.001 {
                let render_state = RenderState {
                    runner: RunnerView {
                        participant: participant_pars.name.to_owned(),
                        emblem: participant_pars.emblem.to_owned(),
                        color: color.clone(),
                        distance: race.distance,
                        avg_speed: race.avg_speed(),
                        marker_position: race.pace.position(),
                    },
                    hurdles: race.hurdles.to_owned(),
                    finish_line: sim_pars.race_pars.finish_line,
                    elapsed_display: format_race_clock(race.elapsed_s(t)),
                    finished: false,
                    final_result: None,
                };

                tx.send(render_state)
                    .context("Failed to send render state to the presentation layer!")?;
                t_render_update = t;
            }

            // sleep until the timestep is finished in real time as well (calculation in ms)
            let t_sleep = (timestep_size * 1000.0 / realtime_factor) as i64
                - ((clock.now_s() - t_loop_start) * 1000.0) as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                println!("WARNING: Could not keep up with real-time!")
            }
        }

        // after the real-time loop finishes, send the final result once
        let final_entry = entry.clone().unwrap();
        let final_state = RenderState {
            runner: RunnerView {
                participant: participant_pars.name.to_owned(),
                emblem: participant_pars.emblem.to_owned(),
                color,
                distance: race.distance,
                avg_speed: race.avg_speed(),
                marker_position: race.pace.position(),
            },
            hurdles: race.hurdles.to_owned(),
            finish_line: sim_pars.race_pars.finish_line,
            elapsed_display: format_finish_time(final_entry.time_s),
            finished: true,
            final_result: Some(final_entry),
        };
        tx.send(final_state)
            .context("Failed to send final race result to the presentation layer!")?;
    }

    Ok(entry.unwrap())
}
