use clap::Parser;
use lapsim::core::handle_race::handle_race;
use lapsim::post::multi_run_stats::MultiRunStats;
use lapsim::post::race_result::RaceResult;
use lapsim::pre::check_sim_opts_pars::check_sim_opts_pars;
use lapsim::pre::read_sim_pars::read_sim_pars;
use lapsim::pre::sim_opts::SimOpts;
use log::info;
use rayon::prelude::*;
use std::cmp::min;
use std::time::Instant;

// set maximum number of concurrently running jobs in case of running more than a single simulation
const MAX_NO_CONCURRENT_JOBS: u32 = 200;

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments, RUST_LOG overrides the log level
    let sim_opts: SimOpts = SimOpts::parse();
    let log_level = if sim_opts.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // read simulation parameters and check them together with the simulation options
    let sim_pars = read_sim_pars(sim_opts.parfile_path.as_path())?;
    check_sim_opts_pars(&sim_opts, &sim_pars)?;

    // run i uses the seed base_seed + i
    let base_seed = sim_opts.seed.unwrap_or_else(rand::random::<u64>);

    info!(
        "Simulating {} {} over {} laps ({} run(s), base seed {})",
        sim_pars.track_pars.name,
        sim_pars.race_pars.season,
        sim_pars.race_pars.tot_no_laps,
        sim_opts.no_sim_runs,
        base_seed
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();
    let mut race_results: Vec<RaceResult> = Vec::with_capacity(sim_opts.no_sim_runs as usize);

    if sim_opts.no_sim_runs == 1 {
        // SINGLE THREAD ---------------------------------------------------------------------------
        race_results.push(handle_race(&sim_pars, base_seed)?);
    } else {
        // MULTIPLE THREADS ------------------------------------------------------------------------
        let mut no_races_done = 0;

        while no_races_done < sim_opts.no_sim_runs {
            // calculate number of simulation runs to execute in current loop
            let tmp_no_sim_runs = min(sim_opts.no_sim_runs - no_races_done, MAX_NO_CONCURRENT_JOBS);

            // simulate the races and save the results (in seed order)
            let tmp_race_results = (no_races_done..no_races_done + tmp_no_sim_runs)
                .into_par_iter()
                .map(|i| handle_race(&sim_pars, base_seed.wrapping_add(i as u64)))
                .collect::<anyhow::Result<Vec<RaceResult>>>()?;
            race_results.extend(tmp_race_results);

            no_races_done += tmp_no_sim_runs;
        }
    }

    info!(
        "Execution time (total): {}ms",
        t_start.elapsed().as_millis()
    );

    // POST-PROCESSING -----------------------------------------------------------------------------
    if race_results.len() == 1 {
        let race_result = &race_results[0];
        race_result.print_starting_grid();
        race_result.print_classification();

        if sim_opts.laptimes {
            race_result.print_lap_and_race_times()?;
        }

        if let Some(csv_path) = sim_opts.csv_path.as_ref() {
            race_result.write_lap_records_csv(csv_path.as_path())?;
            info!("Lap records written to {}", csv_path.display());
        }
    } else {
        MultiRunStats::from_results(&race_results).print();
    }

    Ok(())
}
