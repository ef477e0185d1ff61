use crate::core::driver::DriverPars;
use crate::core::lap::simulate_lap;
use crate::core::qualifying::{simulate_qualifying, QualifyingEntry, QualifyingPars};
use crate::core::retirement::{decide_retirement, RetirementPars};
use crate::core::segment::SimConstants;
use crate::core::state_handler::{State, StateHandler};
use crate::core::track::{Track, TrackPars};
use crate::core::vehicle::{Vehicle, VehiclePars};
use crate::post::race_result::{
    calc_points, ClassificationEntry, DriverInfo, LapRecord, RaceResult,
};
use anyhow::Context;
use helpers::general::{argsort, InputValueError, SortOrder};
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Dry,
    Mixed,
    Wet,
}

impl Default for Weather {
    fn default() -> Self {
        Weather::Dry
    }
}

impl Weather {
    /// calc_grip_factor returns the grip factor of the track condition for a driver with the
    /// inserted wet weather aptitude: base + (1 - base) * wet_performance * 0.5. The base factor is
    /// 1.0 (dry), 0.95 (mixed), or 0.9 (wet).
    pub fn calc_grip_factor(&self, wet_performance: f64) -> f64 {
        let base = match self {
            Weather::Dry => return 1.0,
            Weather::Mixed => 0.95,
            Weather::Wet => 0.9,
        };
        base + (1.0 - base) * wet_performance * 0.5
    }
}

/// * `season` - Season of the race
/// * `tot_no_laps` - Total number of laps in the race
/// * `participants` - Driver numbers of the participants (the respective driver parameters and the
/// vehicle parameters of their teams must be available), in starting grid order if no qualifying
/// is held
/// * `weather` - Track condition -> dry, mixed, wet
/// * `qualifying` - If set, the starting grid is determined by a qualifying session
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RacePars {
    pub season: u32,
    pub tot_no_laps: u32,
    pub participants: Vec<u32>,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub qualifying: Option<QualifyingPars>,
}

/// Competitor combines the immutable driver and vehicle parameters of a race participant with its
/// mutable race state.
#[derive(Debug)]
pub struct Competitor {
    pub driver: Rc<DriverPars>,
    pub vehicle: Rc<Vehicle>,
    pub p_grid: u32,
    pub sh: StateHandler,
    grip_factor: f64,
}

#[derive(Debug)]
pub struct Race {
    season: u32,
    pub tot_no_laps: u32,
    pub cur_lap: u32,
    pub weather: Weather,
    pub track: Track,
    sim_consts: SimConstants,
    seed: u64,
    rng: ChaCha8Rng,
    pub competitors: Vec<Competitor>,
    qualifying: Option<Vec<QualifyingEntry>>,
    lap_records: Vec<LapRecord>,
}

impl Race {
    /// The method creates a race from the inserted parameters. All references (participants and
    /// their teams) are resolved before anything else happens, such that an invalid configuration
    /// fails without creating any race state. If a qualifying is configured, it is held here and
    /// determines the starting grid. The retirement decision of each competitor is made here as
    /// well, once per race, in grid order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        race_pars: &RacePars,
        track_pars: &TrackPars,
        driver_pars_all: &HashMap<u32, DriverPars>,
        vehicle_pars_all: &HashMap<String, VehiclePars>,
        sim_consts: &SimConstants,
        retirement_pars: &RetirementPars,
        seed: u64,
    ) -> anyhow::Result<Race> {
        if track_pars.segments.is_empty() {
            return Err(InputValueError)
                .context(format!("Track {} contains no segments!", track_pars.name));
        }

        // resolve drivers and vehicles (vehicles are shared by the drivers of a team)
        let mut vehicles_list: HashMap<String, Rc<Vehicle>> =
            HashMap::with_capacity(vehicle_pars_all.len());
        let mut drivers_resolved: Vec<(Rc<DriverPars>, Rc<Vehicle>)> =
            Vec::with_capacity(race_pars.participants.len());
        let mut seen = HashSet::with_capacity(race_pars.participants.len());

        for driver_no in race_pars.participants.iter() {
            if !seen.insert(*driver_no) {
                return Err(InputValueError).context(format!(
                    "Driver {} is listed more than once in the participants!",
                    driver_no
                ));
            }

            let driver_pars = driver_pars_all.get(driver_no).ok_or(InputValueError).context(
                format!("Missing driver number {} in driver parameters!", driver_no),
            )?;

            let vehicle = match vehicles_list.get(&driver_pars.team) {
                Some(vehicle) => Rc::clone(vehicle),
                None => {
                    let vehicle_pars = vehicle_pars_all
                        .get(&driver_pars.team)
                        .ok_or(InputValueError)
                        .context(format!(
                            "Missing vehicle parameters for team {} (driver {})!",
                            driver_pars.team, driver_no
                        ))?;
                    let vehicle = Rc::new(Vehicle::new(vehicle_pars));
                    vehicles_list.insert(driver_pars.team.to_owned(), Rc::clone(&vehicle));
                    vehicle
                }
            };

            drivers_resolved.push((Rc::new(driver_pars.to_owned()), vehicle));
        }

        let track = Track::new(track_pars);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // hold qualifying and sort the drivers into the resulting starting grid
        let qualifying = race_pars.qualifying.as_ref().map(|qualifying_pars| {
            let drivers: Vec<(&DriverPars, &Vehicle)> = drivers_resolved
                .iter()
                .map(|(driver, vehicle)| (driver.as_ref(), vehicle.as_ref()))
                .collect();

            simulate_qualifying(
                &drivers,
                &track,
                race_pars.weather,
                sim_consts,
                qualifying_pars,
                &mut rng,
            )
        });

        if let Some(qualifying) = qualifying.as_ref() {
            let grid: HashMap<u32, u32> = qualifying
                .iter()
                .map(|entry| (entry.driver_no, entry.position))
                .collect();
            drivers_resolved.sort_by_key(|(driver, _)| grid.get(&driver.driver_no).copied());

            if let Some(pole) = qualifying.first() {
                debug!(
                    "Driver {} takes pole position with a lap time of {:.3}s",
                    pole.driver_no, pole.laptime
                );
            }
        }

        // determine retirements and create competitors
        let mut competitors = Vec::with_capacity(drivers_resolved.len());

        for (i, (driver, vehicle)) in drivers_resolved.into_iter().enumerate() {
            let p_grid = i as u32 + 1;
            let retirement =
                decide_retirement(&driver, race_pars.tot_no_laps, retirement_pars, &mut rng);

            if let Some(retirement) = retirement {
                debug!(
                    "Driver {} is scheduled to retire in lap {} ({})",
                    driver.driver_no, retirement.lap, retirement.cause
                );
            }

            competitors.push(Competitor {
                grip_factor: race_pars
                    .weather
                    .calc_grip_factor(driver.skills.wet_performance),
                driver,
                vehicle,
                p_grid,
                sh: StateHandler::new(p_grid, race_pars.tot_no_laps, retirement),
            });
        }

        Ok(Race {
            season: race_pars.season,
            tot_no_laps: race_pars.tot_no_laps,
            cur_lap: 0,
            weather: race_pars.weather,
            track,
            sim_consts: sim_consts.to_owned(),
            seed,
            rng,
            lap_records: Vec::with_capacity(competitors.len() * race_pars.tot_no_laps as usize),
            competitors,
            qualifying,
        })
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method simulates the next lap of the whole field. Execution order:
    /// 1. Increment the lap counter.
    /// 2. Check for state transitions: competitors whose retirement lap is reached retire before
    /// driving it, all other active competitors get the tire wear of the new lap.
    /// 3. Simulate the lap of every active competitor (grid order) and add it to its race time.
    /// 4. Rank all competitors that did not retire by their race time. Competitors with equal race
    /// times keep their previous relative order.
    /// 5. Store a lap record for every competitor.
    /// Calls after the final lap are ignored.
    pub fn simulate_lap(&mut self) {
        if self.get_race_finished() {
            return;
        }

        self.cur_lap += 1;
        let lap = self.cur_lap;

        // handle state transitions
        for competitor in self.competitors.iter_mut() {
            if competitor.sh.check_state_transition(lap) {
                debug!(
                    "Driver {} retired at the start of lap {} (last position {})",
                    competitor.driver.driver_no,
                    lap,
                    competitor.sh.get_last_position()
                );
            }
        }

        // simulate laps of the active competitors
        for competitor in self.competitors.iter_mut() {
            if !matches!(competitor.sh.get_state(), State::Active) {
                continue;
            }

            let lap_result = simulate_lap(
                &competitor.driver,
                &competitor.vehicle,
                &self.track,
                lap,
                competitor.sh.get_wear(),
                competitor.grip_factor,
                &self.sim_consts,
                &mut self.rng,
            );

            competitor.sh.complete_lap(lap_result.t_lap);
        }

        // update positions
        self.update_positions();

        if let Some(leader) = self
            .competitors
            .iter()
            .find(|competitor| competitor.sh.get_position() == Some(1))
        {
            debug!(
                "Lap {}/{}: leader is driver {} with a race time of {:.3}s",
                lap,
                self.tot_no_laps,
                leader.driver.driver_no,
                leader.sh.get_racetime()
            );
        }

        // store lap records
        for competitor in self.competitors.iter() {
            let laptime = if matches!(competitor.sh.get_state(), State::Retired) {
                None
            } else {
                competitor.sh.get_last_laptime()
            };

            self.lap_records.push(LapRecord {
                lap,
                driver_no: competitor.driver.driver_no,
                laptime,
                racetime: competitor.sh.get_racetime(),
                position: competitor.sh.get_position(),
                status: competitor.sh.get_state(),
                wear: competitor.sh.get_wear(),
            });
        }
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// update_positions re-ranks all competitors that did not retire by ascending race time. The
    /// competitors are pre-sorted by their previous position, the stable argsort then preserves
    /// the previous relative order in case of exactly equal race times.
    fn update_positions(&mut self) {
        let mut idxs_ranked: Vec<usize> = (0..self.competitors.len())
            .filter(|&i| self.competitors[i].sh.is_ranked())
            .collect();
        idxs_ranked.sort_by_key(|&i| self.competitors[i].sh.get_last_position());

        let racetimes: Vec<f64> = idxs_ranked
            .iter()
            .map(|&i| self.competitors[i].sh.get_racetime())
            .collect();

        for (position, &idx_sorted) in argsort(&racetimes, SortOrder::Ascending)
            .iter()
            .enumerate()
        {
            self.competitors[idxs_ranked[idx_sorted]]
                .sh
                .set_position(position as u32 + 1);
        }
    }

    /// get_race_finished checks if all laps of the race were simulated.
    pub fn get_race_finished(&self) -> bool {
        self.cur_lap >= self.tot_no_laps
    }

    /// get_classification returns the current classification: ranked competitors ordered by their
    /// position, followed by the retired competitors ordered by completed laps (descending) and
    /// grid position.
    pub fn get_classification(&self) -> Vec<ClassificationEntry> {
        let mut idxs_ranked: Vec<usize> = (0..self.competitors.len())
            .filter(|&i| self.competitors[i].sh.is_ranked())
            .collect();
        idxs_ranked.sort_by_key(|&i| self.competitors[i].sh.get_last_position());

        let mut idxs_retired: Vec<usize> = (0..self.competitors.len())
            .filter(|&i| !self.competitors[i].sh.is_ranked())
            .collect();
        idxs_retired.sort_by(|&a, &b| {
            let (comp_a, comp_b) = (&self.competitors[a], &self.competitors[b]);
            comp_b
                .sh
                .get_compl_laps()
                .cmp(&comp_a.sh.get_compl_laps())
                .then(comp_a.p_grid.cmp(&comp_b.p_grid))
        });

        let t_winner = idxs_ranked
            .first()
            .map(|&i| self.competitors[i].sh.get_racetime());

        idxs_ranked
            .iter()
            .chain(idxs_retired.iter())
            .enumerate()
            .map(|(rank, &i)| {
                let competitor = &self.competitors[i];
                let ranked = competitor.sh.is_ranked();

                ClassificationEntry {
                    rank: rank as u32 + 1,
                    driver_no: competitor.driver.driver_no,
                    name: competitor.driver.name.to_owned(),
                    team: competitor.driver.team.to_owned(),
                    status: competitor.sh.get_state(),
                    position: competitor.sh.get_position(),
                    laps_completed: competitor.sh.get_compl_laps(),
                    racetime: competitor.sh.get_racetime(),
                    points: calc_points(competitor.sh.get_position()),
                    gap: if ranked {
                        t_winner.map(|t_winner| competitor.sh.get_racetime() - t_winner)
                    } else {
                        None
                    },
                    retirement: if ranked {
                        None
                    } else {
                        competitor.sh.get_retirement()
                    },
                    last_position: competitor.sh.get_last_position(),
                    grid_position: competitor.p_grid,
                }
            })
            .collect()
    }

    /// get_race_result returns a race result struct of the race.
    pub fn get_race_result(&self) -> RaceResult {
        RaceResult {
            track_name: self.track.name.to_owned(),
            season: self.season,
            tot_no_laps: self.tot_no_laps,
            seed: self.seed,
            drivers: self
                .competitors
                .iter()
                .map(|competitor| DriverInfo {
                    driver_no: competitor.driver.driver_no,
                    name: competitor.driver.name.to_owned(),
                    team: competitor.driver.team.to_owned(),
                    grid_position: competitor.p_grid,
                    skills: competitor.driver.skills.to_owned(),
                    career: competitor.driver.career.to_owned(),
                })
                .collect(),
            qualifying: self.qualifying.to_owned(),
            lap_records: self.lap_records.to_owned(),
            classification: self.get_classification(),
        }
    }
}
