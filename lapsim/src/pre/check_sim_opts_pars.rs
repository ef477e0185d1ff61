use crate::core::track::SegmentKind;
use crate::pre::read_sim_pars::SimPars;
use crate::pre::sim_opts::SimOpts;
use anyhow::Context;
use helpers::general::InputValueError;
use std::collections::HashSet;

/// check_sim_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not.
pub fn check_sim_opts_pars(sim_opts: &SimOpts, sim_pars: &SimPars) -> anyhow::Result<()> {
    // PART 1: SIMULATION OPTIONS
    if sim_opts.no_sim_runs < 1 {
        return Err(InputValueError).context(format!(
            "no_sim_runs must be at least equal to one, but is {}!",
            sim_opts.no_sim_runs
        ));
    }

    if sim_opts.csv_path.is_some() && sim_opts.no_sim_runs != 1 {
        return Err(InputValueError)
            .context("If csv_path is set, no_sim_runs must be equal to one!");
    }

    if sim_opts.laptimes && sim_opts.no_sim_runs != 1 {
        return Err(InputValueError)
            .context("If laptimes is set, no_sim_runs must be equal to one!");
    }

    // PART 2: SIMULATION PARAMETERS
    check_sim_pars(sim_pars)
}

/// check_sim_pars checks the simulation parameters on their own, i.e. independent of the command
/// line options.
pub fn check_sim_pars(sim_pars: &SimPars) -> anyhow::Result<()> {
    // RACE ----------------------------------------------------------------------------------------
    let race_pars = &sim_pars.race_pars;

    if race_pars.tot_no_laps < 1 {
        return Err(InputValueError).context("tot_no_laps must be at least equal to one!");
    }

    if race_pars.participants.is_empty() {
        return Err(InputValueError).context("There must be at least one participant!");
    }

    let mut seen = HashSet::with_capacity(race_pars.participants.len());

    for driver_no in race_pars.participants.iter() {
        if !seen.insert(driver_no) {
            return Err(InputValueError).context(format!(
                "Driver {} is listed more than once in the participants!",
                driver_no
            ));
        }

        let driver_pars = sim_pars
            .driver_pars_all
            .get(driver_no)
            .ok_or(InputValueError)
            .context(format!(
                "Participant {} is missing in the driver parameters!",
                driver_no
            ))?;

        if !sim_pars.vehicle_pars_all.contains_key(&driver_pars.team) {
            return Err(InputValueError).context(format!(
                "Team {} of driver {} has no vehicle parameters!",
                driver_pars.team, driver_no
            ));
        }
    }

    if let Some(qualifying_pars) = race_pars.qualifying.as_ref() {
        if !(qualifying_pars.pace_sensitivity.is_finite()
            && qualifying_pars.pace_sensitivity >= 0.0)
        {
            return Err(InputValueError)
                .context("Qualifying pace_sensitivity must be finite and non-negative!");
        }

        if !(0.0..0.5).contains(&qualifying_pars.variability) {
            return Err(InputValueError).context(format!(
                "Qualifying variability is {:.3}, which is not within the required range \
                [0.0, 0.5)!",
                qualifying_pars.variability
            ));
        }

        if !(0.0..=1.0).contains(&qualifying_pars.wet_pace_share) {
            return Err(InputValueError).context(format!(
                "Qualifying wet_pace_share is {:.3}, which is not within the required range \
                [0.0, 1.0]!",
                qualifying_pars.wet_pace_share
            ));
        }
    }

    // DRIVERS -------------------------------------------------------------------------------------
    for (driver_no, driver_pars) in sim_pars.driver_pars_all.iter() {
        if *driver_no != driver_pars.driver_no {
            return Err(InputValueError).context(format!(
                "Driver parameters stored under key {} belong to driver {}!",
                driver_no, driver_pars.driver_no
            ));
        }

        if let Some((name, val)) = driver_pars
            .skills
            .named_values()
            .iter()
            .find(|(_, val)| !(0.0..=1.0).contains(val))
        {
            return Err(InputValueError).context(format!(
                "Skill coefficient {} of driver {} is {:.3}, which is not within the required \
                range [0.0, 1.0]!",
                name, driver_no, val
            ));
        }

        if let Some(dnf_rate) = driver_pars.career.dnf_rate {
            if !(0.0..=1.0).contains(&dnf_rate) {
                return Err(InputValueError).context(format!(
                    "dnf_rate of driver {} is {:.3}, which is not within the required range \
                    [0.0, 1.0]!",
                    driver_no, dnf_rate
                ));
            }
        }
    }

    // VEHICLES ------------------------------------------------------------------------------------
    // zero mass or drag area is not rejected, the integration ceiling handles such vehicles
    for (team, vehicle_pars) in sim_pars.vehicle_pars_all.iter() {
        if *team != vehicle_pars.team {
            return Err(InputValueError).context(format!(
                "Vehicle parameters stored under key {} belong to team {}!",
                team, vehicle_pars.team
            ));
        }

        let vals = [
            ("power", vehicle_pars.power),
            ("mass", vehicle_pars.mass),
            ("drag_coeff", vehicle_pars.drag_coeff),
            ("frontal_area", vehicle_pars.frontal_area),
            ("downforce_coeff", vehicle_pars.downforce_coeff),
            ("tire_grip", vehicle_pars.tire_grip),
        ];

        if let Some((name, val)) = vals.iter().find(|(_, val)| !(val.is_finite() && *val >= 0.0))
        {
            return Err(InputValueError).context(format!(
                "Vehicle parameter {} of team {} is {}, but must be finite and non-negative!",
                name, team, val
            ));
        }
    }

    // TRACK ---------------------------------------------------------------------------------------
    if sim_pars.track_pars.segments.is_empty() {
        return Err(InputValueError).context(format!(
            "Track {} must contain at least one segment!",
            sim_pars.track_pars.name
        ));
    }

    for (i, segment) in sim_pars.track_pars.segments.iter().enumerate() {
        if !(segment.length.is_finite() && segment.length > 0.0) {
            return Err(InputValueError).context(format!(
                "Length of segment {} is {}, but must be finite and positive!",
                i + 1,
                segment.length
            ));
        }

        if !segment.elevation.is_finite() {
            return Err(InputValueError)
                .context(format!("Elevation of segment {} is not finite!", i + 1));
        }

        if !(0.0..=1.0).contains(&segment.difficulty) {
            return Err(InputValueError).context(format!(
                "Difficulty of segment {} is {:.3}, which is not within the required range \
                [0.0, 1.0]!",
                i + 1,
                segment.difficulty
            ));
        }

        match (segment.kind, segment.radius) {
            (SegmentKind::Straight, Some(_)) => {
                return Err(InputValueError)
                    .context(format!("Straight segment {} must not have a radius!", i + 1));
            }
            (_, Some(radius)) if !(radius.is_finite() && radius > 0.0) => {
                return Err(InputValueError).context(format!(
                    "Radius of segment {} is {}, but must be finite and positive!",
                    i + 1,
                    radius
                ));
            }
            _ => {}
        }
    }

    // MODEL CONSTANTS -----------------------------------------------------------------------------
    let sim_consts = &sim_pars.sim_consts;

    if !(sim_consts.timestep_size > 0.0 && sim_consts.timestep_size <= 1.0) {
        return Err(InputValueError).context(format!(
            "timestep_size is {}s, which is not within the required range (0.0, 1.0]s!",
            sim_consts.timestep_size
        ));
    }

    if !(sim_consts.t_segment_max.is_finite() && sim_consts.t_segment_max > 0.0) {
        return Err(InputValueError)
            .context("t_segment_max must be finite and positive!");
    }

    if !(sim_consts.v_floor > 0.0 && sim_consts.v_floor <= sim_consts.v_cap) {
        return Err(InputValueError).context(format!(
            "v_floor is {} m/s, but must be positive and not greater than v_cap ({} m/s)!",
            sim_consts.v_floor, sim_consts.v_cap
        ));
    }

    if let Some((name, val)) = [
        ("wear_sensitivity", sim_consts.wear_sensitivity),
        ("fatigue_rate", sim_consts.fatigue_rate),
    ]
    .iter()
    .find(|(_, val)| !(val.is_finite() && *val >= 0.0))
    {
        return Err(InputValueError).context(format!(
            "{} is {}, but must be finite and non-negative!",
            name, val
        ));
    }

    if !(sim_consts.perturbation_clip.is_finite() && sim_consts.perturbation_clip >= 0.0) {
        return Err(InputValueError)
            .context("perturbation_clip must be finite and non-negative!");
    }

    // RETIREMENTS ---------------------------------------------------------------------------------
    let retirement_pars = &sim_pars.retirement_pars;

    if !(0.0..=1.0).contains(&retirement_pars.default_dnf_rate) {
        return Err(InputValueError).context(format!(
            "default_dnf_rate is {:.3}, which is not within the required range [0.0, 1.0]!",
            retirement_pars.default_dnf_rate
        ));
    }

    let weights = [
        retirement_pars.w_first_lap,
        retirement_pars.w_last_lap,
        retirement_pars.w_other_laps,
    ];

    if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
        return Err(InputValueError)
            .context("Retirement lap weights must be finite and non-negative!");
    }

    if race_pars.tot_no_laps >= 2
        && retirement_pars
            .calc_lap_weights(race_pars.tot_no_laps)
            .iter()
            .sum::<f64>()
            <= 0.0
    {
        return Err(InputValueError)
            .context("Retirement lap weights of the eligible laps must not all be zero!");
    }

    Ok(())
}
