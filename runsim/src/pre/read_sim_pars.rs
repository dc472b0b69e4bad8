use crate::core::race::RacePars;
use crate::interfaces::input_interface::KeyPress;
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;

/// * `name` - Participant name shown on the leaderboard
/// * `emblem` - Path to the emblem image asset used by the presentation layer
/// * `color` - Emblem accent color as a CSS hex string, e.g. "#1e90ff"
#[derive(Debug, Deserialize, Clone)]
pub struct ParticipantPars {
    pub name: String,
    pub emblem: String,
    pub color: String,
}

/// SimPars is used to store all other parameter structs.
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    #[serde(default)]
    pub race_pars: RacePars,
    pub participant_pars_all: HashMap<String, ParticipantPars>,
}

impl SimPars {
    /// default_exhibition returns a built-in two-participant setup so the simulator can be
    /// run without a parameter file.
    pub fn default_exhibition() -> SimPars {
        let mut participant_pars_all = HashMap::new();
        participant_pars_all.insert(
            "Testland".to_owned(),
            ParticipantPars {
                name: "Testland".to_owned(),
                emblem: "pictures/flag_testland.png".to_owned(),
                color: "#1e90ff".to_owned(),
            },
        );
        participant_pars_all.insert(
            "Runnaria".to_owned(),
            ParticipantPars {
                name: "Runnaria".to_owned(),
                emblem: "pictures/flag_runnaria.png".to_owned(),
                color: "#ff4500".to_owned(),
            },
        );

        SimPars {
            race_pars: RacePars::default(),
            participant_pars_all,
        }
    }
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation
/// parameters struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

/// read_key_script reads a CSV replay file with the columns t_s,key into a key script.
pub fn read_key_script(filepath: &Path) -> anyhow::Result<Vec<KeyPress>> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open key script file {}!",
            filepath.display()
        ))?;

    let mut csv_reader = csv::Reader::from_reader(&fh);
    let mut presses: Vec<KeyPress> = vec![];

    for result in csv_reader.deserialize() {
        let press: KeyPress = result.context(format!(
            "Failed to parse key script file {}!",
            filepath.display()
        ))?;
        presses.push(press);
    }

    Ok(presses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn race_pars_fill_in_from_defaults() {
        let pars: SimPars = serde_json::from_str(
            r##"{
                "race_pars": {"step_gain": 0.8},
                "participant_pars_all": {
                    "Testland": {
                        "name": "Testland",
                        "emblem": "pictures/flag_testland.png",
                        "color": "#1e90ff"
                    }
                }
            }"##,
        )
        .unwrap();

        assert_relative_eq!(pars.race_pars.step_gain, 0.8);
        assert_relative_eq!(pars.race_pars.finish_line, 100.0);
        assert_eq!(pars.race_pars.speed_window, 20);
        assert_eq!(pars.participant_pars_all.len(), 1);
    }

    #[test]
    fn exhibition_setup_is_usable_as_is() {
        let pars = SimPars::default_exhibition();
        assert!(pars.participant_pars_all.contains_key("Testland"));
        assert!(pars.participant_pars_all.contains_key("Runnaria"));
    }
}
