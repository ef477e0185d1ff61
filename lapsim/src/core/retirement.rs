use crate::core::driver::DriverPars;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DnfCause {
    Accident,
    Crash,
    Technical,
    Engine,
    Tires,
    Electronics,
    Collision,
}

impl fmt::Display for DnfCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            DnfCause::Accident => "Accident",
            DnfCause::Crash => "Crash",
            DnfCause::Technical => "Technical problem",
            DnfCause::Engine => "Engine failure",
            DnfCause::Tires => "Tires",
            DnfCause::Electronics => "Electronics",
            DnfCause::Collision => "Collision",
        };
        write!(f, "{}", label)
    }
}

/// * `default_dnf_rate` - Retirement probability of drivers without a DNF rate in their career
/// statistics
/// * `w_first_lap` - Sampling weight of lap 1 (start incidents)
/// * `w_last_lap` - Sampling weight of the last lap that can be a retirement lap (tot_no_laps - 1)
/// * `w_other_laps` - Sampling weight of every lap in between
/// * `causes` - Causes that can be assigned to a retirement (drawn uniformly)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RetirementPars {
    pub default_dnf_rate: f64,
    pub w_first_lap: f64,
    pub w_last_lap: f64,
    pub w_other_laps: f64,
    pub causes: Vec<DnfCause>,
}

impl Default for RetirementPars {
    fn default() -> Self {
        RetirementPars {
            default_dnf_rate: 0.1,
            w_first_lap: 3.0,
            w_last_lap: 2.0,
            w_other_laps: 1.0,
            causes: vec![
                DnfCause::Accident,
                DnfCause::Crash,
                DnfCause::Technical,
                DnfCause::Engine,
                DnfCause::Tires,
                DnfCause::Electronics,
                DnfCause::Collision,
            ],
        }
    }
}

impl RetirementPars {
    /// calc_lap_weights returns the sampling weights of the laps 1 to tot_no_laps - 1 (index 0
    /// belongs to lap 1). The list is empty if the race has less than two laps, since a driver
    /// cannot retire on completing the final lap. For two laps, lap 1 is both first and last
    /// eligible lap and gets the first lap weight.
    pub fn calc_lap_weights(&self, tot_no_laps: u32) -> Vec<f64> {
        if tot_no_laps < 2 {
            return vec![];
        }

        let no_laps = (tot_no_laps - 1) as usize;
        let mut weights = vec![self.w_other_laps; no_laps];
        weights[no_laps - 1] = self.w_last_lap;
        weights[0] = self.w_first_lap;
        weights
    }
}

/// Retirement is the outcome of a positive retirement decision: the driver does not complete lap
/// `lap` (and any lap after it).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Retirement {
    pub lap: u32,
    pub cause: DnfCause,
}

/// decide_retirement determines once before the race start whether and in which lap the inserted
/// driver retires. The retirement lap is drawn from the configured lap weights, i.e. it is always
/// within [1, tot_no_laps - 1]. None is returned if the driver finishes the race, if the race is
/// too short for a retirement, or if the lap weights cannot be sampled.
pub fn decide_retirement<R: Rng + ?Sized>(
    driver: &DriverPars,
    tot_no_laps: u32,
    retirement_pars: &RetirementPars,
    rng: &mut R,
) -> Option<Retirement> {
    let dnf_probability = driver
        .dnf_probability(retirement_pars.default_dnf_rate)
        .clamp(0.0, 1.0);

    // the probability draw is always executed such that the random sequence does not depend on
    // the race length
    let retires = rng.gen::<f64>() < dnf_probability;
    let lap_weights = retirement_pars.calc_lap_weights(tot_no_laps);

    if !retires || lap_weights.is_empty() {
        return None;
    }

    let lap_dist = WeightedIndex::new(&lap_weights).ok()?;
    let lap = lap_dist.sample(rng) as u32 + 1;

    let cause = if retirement_pars.causes.is_empty() {
        DnfCause::Technical
    } else {
        retirement_pars.causes[rng.gen_range(0..retirement_pars.causes.len())]
    };

    Some(Retirement { lap, cause })
}
