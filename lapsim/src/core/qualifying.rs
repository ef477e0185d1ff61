use crate::core::driver::DriverPars;
use crate::core::lap::simulate_lap;
use crate::core::race::Weather;
use crate::core::segment::SimConstants;
use crate::core::track::Track;
use crate::core::vehicle::Vehicle;
use helpers::general::{argsort, SortOrder};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// * `pace_sensitivity` - (-) Relative lap time loss of a driver with qualifying pace 0.0 against a
/// driver with qualifying pace 1.0
/// * `variability` - (-) Half width of the uniformly distributed relative lap time scatter
/// * `wet_pace_share` - (-) Share of the wet weather aptitude in the qualifying performance on a
/// wet track
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct QualifyingPars {
    pub pace_sensitivity: f64,
    pub variability: f64,
    pub wet_pace_share: f64,
}

impl Default for QualifyingPars {
    fn default() -> Self {
        QualifyingPars {
            pace_sensitivity: 0.2,
            variability: 0.03,
            wet_pace_share: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualifyingEntry {
    pub position: u32,
    pub driver_no: u32,
    pub laptime: f64,
}

/// calc_qualifying_performance returns the one-lap performance of a driver in [0.0, 1.0]. On a
/// wet track it is blended with the wet weather aptitude.
pub fn calc_qualifying_performance(
    driver: &DriverPars,
    weather: Weather,
    qualifying_pars: &QualifyingPars,
) -> f64 {
    match weather {
        Weather::Wet => {
            driver.skills.qualifying_pace * (1.0 - qualifying_pars.wet_pace_share)
                + driver.skills.wet_performance * qualifying_pars.wet_pace_share
        }
        Weather::Dry | Weather::Mixed => driver.skills.qualifying_pace,
    }
}

/// simulate_qualifying determines the starting grid. Every driver drives a single lap on fresh
/// tires, the lap time is scaled by the qualifying performance and a uniform scatter. The result
/// is sorted by lap time, equal lap times keep the inserted order.
pub fn simulate_qualifying<R: Rng + ?Sized>(
    drivers: &[(&DriverPars, &Vehicle)],
    track: &Track,
    weather: Weather,
    sim_consts: &SimConstants,
    qualifying_pars: &QualifyingPars,
    rng: &mut R,
) -> Vec<QualifyingEntry> {
    let laptimes: Vec<f64> = drivers
        .iter()
        .map(|(driver, vehicle)| {
            let lap_result = simulate_lap(
                driver,
                vehicle,
                track,
                1,
                0.0,
                weather.calc_grip_factor(driver.skills.wet_performance),
                sim_consts,
                rng,
            );

            let performance = calc_qualifying_performance(driver, weather, qualifying_pars);
            let scatter = if qualifying_pars.variability > 0.0 {
                rng.gen_range(-qualifying_pars.variability..=qualifying_pars.variability)
            } else {
                0.0
            };

            lap_result.t_lap
                * (1.0 + qualifying_pars.pace_sensitivity * (1.0 - performance))
                * (1.0 + scatter)
        })
        .collect();

    argsort(&laptimes, SortOrder::Ascending)
        .iter()
        .enumerate()
        .map(|(i, &idx)| QualifyingEntry {
            position: i as u32 + 1,
            driver_no: drivers[idx].0.driver_no,
            laptime: laptimes[idx],
        })
        .collect()
}
