pub mod core;
pub mod post;
pub mod pre;





#[cfg(test)]
mod retirement_tests {
    use crate::core::retirement::{decide_retirement, DnfCause, RetirementPars};
    use crate::test_pars::create_driver_pars;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_calc_lap_weights() {
        let retirement_pars = RetirementPars::default();
        assert!(retirement_pars.calc_lap_weights(1).is_empty());
        assert_eq!(retirement_pars.calc_lap_weights(2), vec![3.0]);
        assert_eq!(retirement_pars.calc_lap_weights(3), vec![3.0, 2.0]);
        assert_eq!(
            retirement_pars.calc_lap_weights(5),
            vec![3.0, 1.0, 1.0, 2.0]
        );
    }
    #[test]
    fn test_decide_retirement_never() {
        let driver = create_driver_pars(1, 0.5, Some(0.0));
        let retirement_pars = RetirementPars::default();

        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert!(decide_retirement(&driver, 20, &retirement_pars, &mut rng).is_none());
        }
    }
    #[test]
    fn test_decide_retirement_always() {
        let driver = create_driver_pars(1, 0.5, Some(1.0));
        let retirement_pars = RetirementPars::default();

        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let retirement = decide_retirement(&driver, 20, &retirement_pars, &mut rng).unwrap();
            assert!(retirement.lap >= 1 && retirement.lap < 20);
            assert!(retirement_pars.causes.contains(&retirement.cause));
        }
    }
    #[test]
    fn test_decide_retirement_single_lap_race() {
        let driver = create_driver_pars(1, 0.5, Some(1.0));
        let retirement_pars = RetirementPars::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(decide_retirement(&driver, 1, &retirement_pars, &mut rng).is_none());
    }
    #[test]
    fn test_decide_retirement_default_rate_and_cause() {
        let driver = create_driver_pars(1, 0.5, None);
        let retirement_pars = RetirementPars {
            default_dnf_rate: 1.0,
            causes: vec![],
            ..RetirementPars::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let retirement = decide_retirement(&driver, 2, &retirement_pars, &mut rng).unwrap();
        assert_eq!(retirement.lap, 1);
        assert_eq!(retirement.cause, DnfCause::Technical);
    }
}


#[cfg(test)]
mod race_tests {
    use crate::core::handle_race::handle_race;
    use crate::core::race::{Race, Weather};
    use crate::core::state_handler::State;
    use crate::pre::read_sim_pars::SimPars;
    use crate::test_pars::create_sim_pars;
    use approx::assert_ulps_eq;

    fn create_race(sim_pars: &SimPars, seed: u64) -> anyhow::Result<Race> {
        Race::new(
            &sim_pars.race_pars,
            &sim_pars.track_pars,
            &sim_pars.driver_pars_all,
            &sim_pars.vehicle_pars_all,
            &sim_pars.sim_consts,
            &sim_pars.retirement_pars,
            seed,
        )
    }

    #[test]
    fn test_weather_grip_factor() {
        assert_ulps_eq!(Weather::Dry.calc_grip_factor(0.0), 1.0);
        assert_ulps_eq!(Weather::Wet.calc_grip_factor(0.0), 0.9);
        assert_ulps_eq!(Weather::Wet.calc_grip_factor(1.0), 0.95);
        assert_ulps_eq!(Weather::Mixed.calc_grip_factor(0.0), 0.95);
    }
    #[test]
    fn test_race_new_errors() {
        let mut sim_pars = create_sim_pars(2, 5, 0.5, Some(0.0));
        sim_pars.race_pars.participants = vec![1, 2, 1];
        assert!(create_race(&sim_pars, 0).is_err());

        let mut sim_pars = create_sim_pars(2, 5, 0.5, Some(0.0));
        sim_pars.race_pars.participants = vec![1, 3];
        assert!(create_race(&sim_pars, 0).is_err());

        let mut sim_pars = create_sim_pars(2, 5, 0.5, Some(0.0));
        sim_pars.vehicle_pars_all.clear();
        assert!(create_race(&sim_pars, 0).is_err());

        let mut sim_pars = create_sim_pars(2, 5, 0.5, Some(0.0));
        sim_pars.track_pars.segments.clear();
        assert!(create_race(&sim_pars, 0).is_err());
    }
    #[test]
    fn test_simulate_lap_after_finish() {
        let sim_pars = create_sim_pars(3, 2, 0.5, Some(0.0));
        let mut race = create_race(&sim_pars, 0).unwrap();

        while !race.get_race_finished() {
            race.simulate_lap();
        }
        let race_result_1 = race.get_race_result();
        race.simulate_lap();
        let race_result_2 = race.get_race_result();

        assert_eq!(race.cur_lap, 2);
        assert_eq!(race_result_1.lap_records, race_result_2.lap_records);
        assert!(race
            .competitors
            .iter()
            .all(|competitor| competitor.sh.get_state() == State::Finished));
    }
    #[test]
    fn test_positions_permutation() {
        let sim_pars = create_sim_pars(6, 12, 0.9, Some(0.5));

        for seed in 0..10 {
            let race_result = handle_race(&sim_pars, seed).unwrap();

            for lap in 1..13 {
                let records: Vec<_> = race_result
                    .lap_records
                    .iter()
                    .filter(|record| record.lap == lap)
                    .collect();
                assert_eq!(records.len(), 6);

                let mut positions: Vec<u32> =
                    records.iter().filter_map(|record| record.position).collect();
                positions.sort_unstable();
                let no_ranked = records
                    .iter()
                    .filter(|record| record.status != State::Retired)
                    .count() as u32;
                assert_eq!(positions, (1..no_ranked + 1).collect::<Vec<u32>>());
            }
        }
    }
    #[test]
    fn test_wear_monotone() {
        let sim_pars = create_sim_pars(3, 15, 0.9, Some(0.3));
        let race_result = handle_race(&sim_pars, 11).unwrap();

        for driver in race_result.drivers.iter() {
            let records = race_result.get_lap_records_driver(driver.driver_no);
            assert_eq!(records.len(), 15);

            for pair in records.windows(2) {
                assert!(pair[1].wear >= pair[0].wear);
            }
            assert!(records.iter().all(|record| (0.0..=1.0).contains(&record.wear)));
        }
    }
    #[test]
    fn test_retirement_dnf_rate_one() {
        let sim_pars = create_sim_pars(3, 10, 0.5, Some(1.0));
        let race_result = handle_race(&sim_pars, 3).unwrap();

        assert!(race_result.get_winner().is_none());

        for entry in race_result.classification.iter() {
            assert_eq!(entry.status, State::Retired);
            assert_eq!(entry.position, None);
            assert_eq!(entry.gap, None);

            let retirement = entry.retirement.unwrap();
            assert!(retirement.lap >= 1 && retirement.lap < 10);
            assert_eq!(entry.laps_completed, retirement.lap - 1);

            for record in race_result.get_lap_records_driver(entry.driver_no) {
                if record.lap >= retirement.lap {
                    assert_eq!(record.laptime, None);
                    assert_eq!(record.position, None);
                    assert_eq!(record.status, State::Retired);
                } else {
                    assert!(record.laptime.is_some());
                    assert_eq!(record.status, State::Active);
                }
            }
        }
    }
    #[test]
    fn test_classification_order() {
        let sim_pars = create_sim_pars(8, 10, 0.9, Some(0.5));

        for seed in 0..10 {
            let race_result = handle_race(&sim_pars, seed).unwrap();
            let classification = &race_result.classification;
            assert_eq!(classification.len(), 8);

            let no_finishers = classification
                .iter()
                .filter(|entry| entry.status == State::Finished)
                .count();

            for (i, entry) in classification.iter().enumerate() {
                assert_eq!(entry.rank, i as u32 + 1);

                if i < no_finishers {
                    assert_eq!(entry.position, Some(i as u32 + 1));
                    assert_eq!(entry.laps_completed, 10);
                    assert!(entry.gap.unwrap() >= 0.0);
                } else {
                    assert_eq!(entry.status, State::Retired);
                }
            }

            for pair in classification[no_finishers..].windows(2) {
                assert!(
                    pair[0].laps_completed > pair[1].laps_completed
                        || (pair[0].laps_completed == pair[1].laps_completed
                            && pair[0].grid_position < pair[1].grid_position)
                );
            }
        }
    }
    #[test]
    fn test_two_competitors_gap() {
        let sim_pars = create_sim_pars(2, 10, 0.9, Some(0.0));
        let race_result = handle_race(&sim_pars, 5).unwrap();
        let classification = &race_result.classification;

        assert_eq!(classification[0].gap, Some(0.0));
        let gap = classification[1].gap.unwrap();
        assert!(gap > 0.0);

        // segment base times are equal for identical drivers, every segment time is scattered by
        // at most clip * sd around it
        let sim_consts = &sim_pars.sim_consts;
        let skills = &sim_pars.driver_pars_all[&1].skills;
        let sd_max = (sim_consts.sd_straight * skills.risk)
            .max(sim_consts.sd_corner * skills.risk * (1.0 - skills.consistency));
        let scatter_max = sim_consts.perturbation_clip * sd_max;
        assert!(gap <= 2.0 * scatter_max / (1.0 - scatter_max) * classification[0].racetime);
    }
    #[test]
    fn test_two_competitors_zero_risk() {
        let mut sim_pars = create_sim_pars(2, 10, 0.0, Some(0.0));
        sim_pars.race_pars.participants = vec![2, 1];
        let race_result = handle_race(&sim_pars, 5).unwrap();
        let classification = &race_result.classification;

        assert_eq!(classification[1].gap, Some(0.0));
        assert_eq!(classification[0].driver_no, 2);
        assert_eq!(classification[1].driver_no, 1);
        assert_eq!(classification[0].grid_position, 1);
    }
    #[test]
    fn test_deterministic_seed() {
        let sim_pars = create_sim_pars(5, 8, 0.9, Some(0.4));
        let race_result_1 = handle_race(&sim_pars, 1234).unwrap();
        let race_result_2 = handle_race(&sim_pars, 1234).unwrap();
        let race_result_3 = handle_race(&sim_pars, 1235).unwrap();

        assert_eq!(race_result_1.lap_records, race_result_2.lap_records);
        assert_eq!(race_result_1.classification, race_result_2.classification);
        assert_ne!(race_result_1.lap_records, race_result_3.lap_records);
    }
    #[test]
    fn test_pars_not_mutated() {
        let sim_pars = create_sim_pars(4, 6, 0.9, Some(0.5));
        let sim_pars_copy = sim_pars.clone();
        handle_race(&sim_pars, 9).unwrap();

        assert_eq!(sim_pars.driver_pars_all, sim_pars_copy.driver_pars_all);
        assert_eq!(sim_pars.vehicle_pars_all, sim_pars_copy.vehicle_pars_all);
        assert_eq!(
            sim_pars.track_pars.segments,
            sim_pars_copy.track_pars.segments
        );
        assert_eq!(sim_pars.sim_consts, sim_pars_copy.sim_consts);
        assert_eq!(sim_pars.retirement_pars, sim_pars_copy.retirement_pars);
    }
    #[test]
    fn test_wet_race_slower() {
        let sim_pars_dry = create_sim_pars(1, 5, 0.0, Some(0.0));
        let mut sim_pars_wet = sim_pars_dry.clone();
        sim_pars_wet.race_pars.weather = Weather::Wet;

        let race_result_dry = handle_race(&sim_pars_dry, 0).unwrap();
        let race_result_wet = handle_race(&sim_pars_wet, 0).unwrap();
        assert!(
            race_result_wet.classification[0].racetime
                > race_result_dry.classification[0].racetime
        );
    }
}



#[cfg(test)]
mod check_sim_opts_pars_tests {
    use crate::core::qualifying::QualifyingPars;
    use crate::core::track::{SegmentKind, SegmentPars};
    use crate::pre::check_sim_opts_pars::{check_sim_opts_pars, check_sim_pars};
    use crate::pre::sim_opts::SimOpts;
    use crate::test_pars::create_sim_pars;
    use std::path::PathBuf;

    fn create_sim_opts() -> SimOpts {
        SimOpts {
            debug: false,
            laptimes: false,
            no_sim_runs: 1,
            parfile_path: PathBuf::from("pars.json"),
            seed: None,
            csv_path: None,
        }
    }

    #[test]
    fn test_valid() {
        let sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        assert!(check_sim_opts_pars(&create_sim_opts(), &sim_pars).is_ok());
    }
    #[test]
    fn test_invalid_opts() {
        let sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));

        let mut sim_opts = create_sim_opts();
        sim_opts.no_sim_runs = 0;
        assert!(check_sim_opts_pars(&sim_opts, &sim_pars).is_err());

        let mut sim_opts = create_sim_opts();
        sim_opts.no_sim_runs = 10;
        sim_opts.csv_path = Some(PathBuf::from("laps.csv"));
        assert!(check_sim_opts_pars(&sim_opts, &sim_pars).is_err());

        let mut sim_opts = create_sim_opts();
        sim_opts.no_sim_runs = 10;
        sim_opts.laptimes = true;
        assert!(check_sim_opts_pars(&sim_opts, &sim_pars).is_err());

        sim_opts.no_sim_runs = 1;
        assert!(check_sim_opts_pars(&sim_opts, &sim_pars).is_ok());
    }
    #[test]
    fn test_invalid_race() {
        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.race_pars.tot_no_laps = 0;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.race_pars.participants.clear();
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.race_pars.participants.push(2);
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.race_pars.participants.push(99);
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.vehicle_pars_all.clear();
        assert!(check_sim_pars(&sim_pars).is_err());
    }
    #[test]
    fn test_qualifying_pars() {
        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.race_pars.qualifying = Some(QualifyingPars::default());
        assert!(check_sim_pars(&sim_pars).is_ok());

        sim_pars.race_pars.qualifying = Some(QualifyingPars {
            variability: 0.5,
            ..QualifyingPars::default()
        });
        assert!(check_sim_pars(&sim_pars).is_err());

        sim_pars.race_pars.qualifying = Some(QualifyingPars {
            wet_pace_share: 1.5,
            ..QualifyingPars::default()
        });
        assert!(check_sim_pars(&sim_pars).is_err());

        sim_pars.race_pars.qualifying = Some(QualifyingPars {
            pace_sensitivity: f64::NAN,
            ..QualifyingPars::default()
        });
        assert!(check_sim_pars(&sim_pars).is_err());
    }
    #[test]
    fn test_invalid_driver() {
        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        if let Some(driver_pars) = sim_pars.driver_pars_all.get_mut(&3) {
            driver_pars.skills.cornering = 1.2;
        }
        assert!(check_sim_pars(&sim_pars).is_err());

        let sim_pars = create_sim_pars(4, 10, 0.5, Some(1.5));
        assert!(check_sim_pars(&sim_pars).is_err());

        let sim_pars = create_sim_pars(4, 10, -0.1, Some(0.1));
        assert!(check_sim_pars(&sim_pars).is_err());
    }
    #[test]
    fn test_invalid_track() {
        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.track_pars.segments.clear();
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.track_pars.segments[0].length = 0.0;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.track_pars.segments[1].radius = Some(-5.0);
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.track_pars.segments[0].radius = Some(50.0);
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.track_pars.segments.push(SegmentPars {
            kind: SegmentKind::Chicane,
            length: 80.0,
            radius: None,
            elevation: 0.0,
            difficulty: 1.5,
        });
        assert!(check_sim_pars(&sim_pars).is_err());
    }
    #[test]
    fn test_invalid_consts() {
        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.sim_consts.timestep_size = 0.0;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.sim_consts.v_floor = 100.0;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.vehicle_pars_all.get_mut("Ducati").unwrap().power = f64::NAN;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.vehicle_pars_all.get_mut("Ducati").unwrap().team = String::from("Honda");
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.sim_consts.fatigue_rate = -0.001;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.sim_consts.wear_sensitivity = f64::INFINITY;
        assert!(check_sim_pars(&sim_pars).is_err());
    }
    #[test]
    fn test_invalid_retirement_pars() {
        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.retirement_pars.w_first_lap = 0.0;
        sim_pars.retirement_pars.w_last_lap = 0.0;
        sim_pars.retirement_pars.w_other_laps = 0.0;
        assert!(check_sim_pars(&sim_pars).is_err());

        // a single lap race has no eligible retirement lap, weights are irrelevant
        sim_pars.race_pars.tot_no_laps = 1;
        assert!(check_sim_pars(&sim_pars).is_ok());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, Some(0.1));
        sim_pars.retirement_pars.w_other_laps = -1.0;
        assert!(check_sim_pars(&sim_pars).is_err());

        let mut sim_pars = create_sim_pars(4, 10, 0.5, None);
        sim_pars.retirement_pars.default_dnf_rate = 2.0;
        assert!(check_sim_pars(&sim_pars).is_err());
    }
}

#[cfg(test)]
mod read_sim_pars_tests {
    use crate::core::handle_race::handle_race;
    use crate::pre::check_sim_opts_pars::check_sim_pars;
    use crate::pre::read_sim_pars::read_sim_pars;
    use std::path::Path;

    #[test]
    fn test_read_parameter_file() {
        let filepath =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../input/parameters/pars_mugello.json");
        let sim_pars = read_sim_pars(filepath.as_path()).unwrap();

        assert!(check_sim_pars(&sim_pars).is_ok());
        assert_eq!(sim_pars.race_pars.participants.len(), 20);

        let race_result = handle_race(&sim_pars, 0).unwrap();
        assert_eq!(race_result.classification.len(), 20);
        assert_eq!(race_result.qualifying.as_ref().map(|entries| entries.len()), Some(20));
        assert_eq!(race_result.lap_records.len(), 20 * sim_pars.race_pars.tot_no_laps as usize);
    }
    #[test]
    fn test_read_missing_file() {
        assert!(read_sim_pars(Path::new("does/not/exist.json")).is_err());
    }
}
