use clap::Parser;
use helpers::general::format_finish_time;
use runsim::core::handle_race::handle_race;
use runsim::interfaces::input_interface::{AutoPacer, KeyPress, KeySource, ScriptSource};
use runsim::interfaces::render_interface::RenderState;
use runsim::post::leaderboard::Leaderboard;
use runsim::pre::read_sim_pars::{read_key_script, read_sim_pars, SimPars};
use runsim::pre::sim_opts::SimOpts;
use std::io::Write;
use std::thread;
use std::time::Instant;

const PACER_JITTER_SD_S: f64 = 0.03;
const PACER_BREATHE_BELOW: f64 = 35.0;

/// make_key_source builds a fresh input source per run: a script replay if one was given,
/// otherwise an auto-pacer at the requested cadence.
fn make_key_source(script: &Option<Vec<KeyPress>>, cadence: f64) -> Box<dyn KeySource> {
    match script {
        Some(presses) => Box::new(ScriptSource::new(presses.clone())),
        None => Box::new(AutoPacer::with_entropy(
            cadence,
            PACER_JITTER_SD_S,
            PACER_BREATHE_BELOW,
        )),
    }
}

/// render_track_line draws one carriage-return terminal line for a render state: the track
/// with hurdles and the runner, followed by the live numbers.
fn render_track_line(state: &RenderState) -> String {
    const TRACK_CHARS: usize = 50;

    let mut track: Vec<char> = vec!['.'; TRACK_CHARS + 1];
    for &h in state.hurdles.iter() {
        let idx = ((h / state.finish_line) * TRACK_CHARS as f64) as usize;
        track[idx.min(TRACK_CHARS)] = '#';
    }
    let runner_idx = ((state.runner.distance / state.finish_line) * TRACK_CHARS as f64) as usize;
    track[runner_idx.min(TRACK_CHARS)] = '@';
    let track: String = track.into_iter().collect();

    let c = &state.runner.color;
    format!(
        "\x1b[38;2;{};{};{}m{}\x1b[0m {} | {:5.1} units | {:4.2} u/s | marker {:5.1} | {}",
        c.r,
        c.g,
        c.b,
        state.runner.participant,
        track,
        state.runner.distance,
        state.runner.avg_speed,
        state.runner.marker_position,
        state.elapsed_display
    )
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    // get simulation parameters
    let sim_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        println!("INFO: Reading simulation parameters from {:?}", parfile_path);
        read_sim_pars(parfile_path)?
    } else {
        println!("INFO: No parameter file provided, using the built-in exhibition setup");
        SimPars::default_exhibition()
    };

    // pick the participant (first registry entry by name if none was selected)
    let participant = match &sim_opts.participant {
        Some(name) => name.clone(),
        None => {
            let mut names: Vec<&String> = sim_pars.participant_pars_all.keys().collect();
            names.sort();
            names
                .first()
                .map(|n| (*n).clone())
                .ok_or_else(|| anyhow::anyhow!("Participant registry is empty!"))?
        }
    };

    // read the key script once, every run replays its own copy
    let script = match &sim_opts.keyscript_path {
        Some(keyscript_path) => {
            println!("INFO: Replaying key script from {:?}", keyscript_path);
            Some(read_key_script(keyscript_path)?)
        }
        None => None,
    };

    println!(
        "INFO: {} lines up with a timestep size of {:.3}s",
        participant, sim_opts.timestep_size
    );

    let mut leaderboard = Leaderboard::new();

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.live {
        // NON-LIVE CASE - run the races as fast as possible
        let t_start = Instant::now();

        for run in 0..sim_opts.no_sim_runs {
            let mut key_source = make_key_source(&script, sim_opts.cadence);
            let entry = handle_race(
                &sim_pars,
                &participant,
                key_source.as_mut(),
                sim_opts.timestep_size,
                sim_opts.debug,
                None,
                1.0,
            )?;

            println!(
                "INFO: Run {}: {} finished in {}",
                run + 1,
                entry.participant,
                format_finish_time(entry.time_s)
            );
            leaderboard.record(entry);
        }

        println!("INFO: Execution time: {}ms", t_start.elapsed().as_millis());
    } else {
        // LIVE CASE - real-time race with terminal rendering
        let (tx, rx) = flume::unbounded();

        let sim_pars_thread = sim_pars.clone();
        let sim_opts_thread = sim_opts.clone();
        let participant_thread = participant.clone();
        let script_thread = script.clone();

        let sim_handle = thread::spawn(move || {
            let mut key_source = make_key_source(&script_thread, sim_opts_thread.cadence);
            handle_race(
                &sim_pars_thread,
                &participant_thread,
                key_source.as_mut(),
                sim_opts_thread.timestep_size,
                false, // debug printing would tear the live line
                Some(&tx),
                sim_opts_thread.realtime_factor,
            )
        });

        // render loop ends once the simulation thread drops its sender
        for state in rx.iter() {
            if state.finished {
                println!("\r{}", render_track_line(&state));
            } else {
                print!("\r{}", render_track_line(&state));
                std::io::stdout().flush()?;
            }
        }

        let entry = sim_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))??;

        println!(
            "RESULT: {} finished in {}",
            entry.participant,
            format_finish_time(entry.time_s)
        );
        leaderboard.record(entry);
    }

    // POST-PROCESSING -----------------------------------------------------------------------------
    leaderboard.print_standings();

    Ok(())
}
