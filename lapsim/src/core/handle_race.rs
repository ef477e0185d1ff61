use crate::core::race::Race;
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::SimPars;
use log::info;

/// handle_race creates and simulates a race on the basis of the inserted parameters, and returns
/// the results for post-processing. The inserted seed determines all random draws of the race
/// (retirements and lap time perturbations), i.e. equal seeds lead to equal results.
pub fn handle_race(sim_pars: &SimPars, seed: u64) -> anyhow::Result<RaceResult> {
    // create the race
    let mut race = Race::new(
        &sim_pars.race_pars,
        &sim_pars.track_pars,
        &sim_pars.driver_pars_all,
        &sim_pars.vehicle_pars_all,
        &sim_pars.sim_consts,
        &sim_pars.retirement_pars,
        seed,
    )?;

    info!(
        "Starting race at {} ({} laps of {:.0}m, {} competitors, {:?} conditions, seed {})",
        race.track.name,
        race.tot_no_laps,
        race.track.length,
        race.competitors.len(),
        race.weather,
        seed
    );

    // simulate the race -> execute lap steps until the final lap is completed
    while !race.get_race_finished() {
        race.simulate_lap();
    }

    let race_result = race.get_race_result();

    match race_result.get_winner() {
        Some(winner) => info!(
            "Race finished, winner is driver {} ({}) with a race time of {:.3}s",
            winner.driver_no, winner.name, winner.racetime
        ),
        None => info!("Race finished without any classified finisher"),
    }

    Ok(race_result)
}
