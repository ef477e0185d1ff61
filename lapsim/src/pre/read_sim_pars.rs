use crate::core::driver::DriverPars;
use crate::core::race::RacePars;
use crate::core::retirement::RetirementPars;
use crate::core::segment::SimConstants;
use crate::core::track::TrackPars;
use crate::core::vehicle::VehiclePars;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs. The model constants and the retirement
/// parameters are optional in the parameter file and fall back to their defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimPars {
    pub race_pars: RacePars,
    pub track_pars: TrackPars,
    pub driver_pars_all: HashMap<u32, DriverPars>,
    pub vehicle_pars_all: HashMap<String, VehiclePars>,
    #[serde(default)]
    pub sim_consts: SimConstants,
    #[serde(default)]
    pub retirement_pars: RetirementPars,
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}
