use crate::core::driver::DriverPars;
use crate::core::tireset::{calc_fatigue_factor, calc_tire_factor};
use crate::core::track::{SegmentKind, SegmentPars};
use crate::core::vehicle::Vehicle;
use log::warn;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Physical and model constants of the segment timing model. Every field falls back to its
/// default if it is missing in the parameter file.
///
/// * `air_density` - (kg/m^3) Air density
/// * `gravity` - (m/s^2) Gravitational acceleration
/// * `timestep_size` - (s) Integration step on straights
/// * `t_segment_max` - (s) Safety ceiling of the integration on straights
/// * `v_floor` - (m/s) Minimum velocity (never undercut by any segment)
/// * `v_cap` - (m/s) Maximum theoretical top speed
/// * `v_min_power` - (m/s) Velocity floor in the denominator of the power term
/// * `v_start` - (m/s) Velocity at the start of every lap
/// * `wear_sensitivity` - (-) Influence of tire wear on grip and traction
/// * `fatigue_rate` - (1/lap) Performance loss per lap for a fully inconsistent driver
/// * `downforce_v_scale` - (m^2/s^2) Velocity scale of the downforce multiplier
/// * `corner_exit_frac` - (-) Exit velocity in relation to the corner velocity
/// * `chicane_speed_frac` - (-) Chicane velocity bound in relation to the entry velocity
/// * `chicane_time_frac` - (-) Effective velocity in a chicane in relation to its velocity bound
/// * `chicane_exit_frac` - (-) Exit velocity in relation to the chicane velocity
/// * `difficulty_sensitivity` - (-) Time loss on a segment of difficulty 1.0 for a driver without
/// experience
/// * `sd_straight` - (-) Relative standard deviation of straight times for risk 1.0
/// * `sd_corner` - (-) Relative standard deviation of corner times for risk 1.0 and consistency
/// 0.0
/// * `perturbation_clip` - (-) Random perturbations are clipped to this number of standard
/// deviations
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimConstants {
    pub air_density: f64,
    pub gravity: f64,
    pub timestep_size: f64,
    pub t_segment_max: f64,
    pub v_floor: f64,
    pub v_cap: f64,
    pub v_min_power: f64,
    pub v_start: f64,
    pub wear_sensitivity: f64,
    pub fatigue_rate: f64,
    pub downforce_v_scale: f64,
    pub corner_exit_frac: f64,
    pub chicane_speed_frac: f64,
    pub chicane_time_frac: f64,
    pub chicane_exit_frac: f64,
    pub difficulty_sensitivity: f64,
    pub sd_straight: f64,
    pub sd_corner: f64,
    pub perturbation_clip: f64,
}

impl Default for SimConstants {
    fn default() -> Self {
        SimConstants {
            air_density: 1.2,
            gravity: 9.81,
            timestep_size: 0.01,
            t_segment_max: 30.0,
            v_floor: 5.0,
            v_cap: 95.0,
            v_min_power: 10.0,
            v_start: 50.0,
            wear_sensitivity: 0.1,
            fatigue_rate: 0.001,
            downforce_v_scale: 1000.0,
            corner_exit_frac: 0.9,
            chicane_speed_frac: 0.6,
            chicane_time_frac: 0.8,
            chicane_exit_frac: 0.7,
            difficulty_sensitivity: 0.1,
            sd_straight: 0.02,
            sd_corner: 0.03,
            perturbation_clip: 3.0,
        }
    }
}

// lower bound of the multiplicative perturbation such that segment times stay positive
const MIN_PERTURBATION_FACTOR: f64 = 0.5;

/// SegmentTraversal contains the outcome of crossing a single segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTraversal {
    pub t_segment: f64,
    pub v_exit: f64,
}

/// calc_segment_traversal returns the time required to cross the inserted segment and the
/// velocity at its exit. Tire wear and driver fatigue reduce traction and grip, grip_factor
/// considers the track condition (1.0 on a dry track). The time is perturbed by a zero-mean random
/// term drawn from rng.
#[allow(clippy::too_many_arguments)]
pub fn calc_segment_traversal<R: Rng + ?Sized>(
    driver: &DriverPars,
    vehicle: &Vehicle,
    segment: &SegmentPars,
    v_entry: f64,
    wear: f64,
    lap: u32,
    grip_factor: f64,
    sim_consts: &SimConstants,
    rng: &mut R,
) -> SegmentTraversal {
    let tire_factor = calc_tire_factor(
        wear,
        driver.skills.tire_management,
        sim_consts.wear_sensitivity,
    );
    let fatigue_factor =
        calc_fatigue_factor(lap, driver.skills.consistency, sim_consts.fatigue_rate);

    let traversal = match segment.kind {
        SegmentKind::Straight => calc_straight(
            driver,
            vehicle,
            segment,
            v_entry,
            tire_factor * fatigue_factor * grip_factor,
            sim_consts,
            rng,
        ),
        SegmentKind::Corner | SegmentKind::Chicane => calc_corner(
            driver,
            vehicle,
            segment,
            v_entry,
            tire_factor * fatigue_factor,
            grip_factor,
            sim_consts,
            rng,
        ),
    };

    SegmentTraversal {
        t_segment: traversal.t_segment.max(f64::MIN_POSITIVE),
        v_exit: traversal.v_exit.max(sim_consts.v_floor),
    }
}

/// calc_straight integrates the longitudinal motion on a straight with a fixed time step. The
/// net acceleration consists of the power-limited traction, the aerodynamic drag, and the slope
/// resistance. The velocity is kept within [v_floor, v_top]. The integration stops at the end of
/// the segment or when the safety ceiling is reached.
fn calc_straight<R: Rng + ?Sized>(
    driver: &DriverPars,
    vehicle: &Vehicle,
    segment: &SegmentPars,
    v_entry: f64,
    perf_factor: f64,
    sim_consts: &SimConstants,
    rng: &mut R,
) -> SegmentTraversal {
    let power = vehicle.power * driver.skills.acceleration * perf_factor;
    let v_top = vehicle
        .calc_v_top(power, sim_consts.air_density, sim_consts.v_cap)
        .max(sim_consts.v_floor);
    let a_slope = sim_consts.gravity * segment.elevation / segment.length;
    let dt = sim_consts.timestep_size;

    let mut v = v_entry.max(sim_consts.v_floor).min(v_top);
    let mut s = 0.0;
    let mut t = 0.0;

    while s < segment.length {
        let a_power = power / (vehicle.mass * v.max(sim_consts.v_min_power));
        let a_drag = 0.5 * sim_consts.air_density * vehicle.drag_area * v * v / vehicle.mass;

        // f64::max/min drop NaN, degenerate vehicles therefore end up at v_floor
        v = (v + (a_power - a_drag - a_slope) * dt)
            .max(sim_consts.v_floor)
            .min(v_top);
        s += v * dt;
        t += dt;

        if t > sim_consts.t_segment_max {
            warn!(
                "Integration on a {:.0}m straight reached the safety ceiling of {:.1}s \
                (driver {}), time is clamped",
                segment.length, sim_consts.t_segment_max, driver.driver_no
            );
            break;
        }
    }

    // remove the overshoot of the last integration step
    if s > segment.length {
        t -= (s - segment.length) / v;
    }

    let perturbation = sample_perturbation(
        sim_consts.sd_straight * driver.skills.risk,
        sim_consts.perturbation_clip,
        rng,
    );

    SegmentTraversal {
        t_segment: t * (1.0 + perturbation).max(MIN_PERTURBATION_FACTOR),
        v_exit: v,
    }
}

/// calc_corner determines a constant corner velocity. It is bounded by the available grip
/// (including a velocity dependent downforce multiplier) for corners with a radius, and by a fixed
/// fraction of the entry velocity for chicanes. The driver's braking efficiency limits how much of
/// the entry velocity can be carried into the segment.
#[allow(clippy::too_many_arguments)]
fn calc_corner<R: Rng + ?Sized>(
    driver: &DriverPars,
    vehicle: &Vehicle,
    segment: &SegmentPars,
    v_entry: f64,
    perf_factor: f64,
    grip_factor: f64,
    sim_consts: &SimConstants,
    rng: &mut R,
) -> SegmentTraversal {
    let grip = vehicle.tire_grip * driver.skills.cornering * perf_factor * grip_factor;
    let downforce_mult =
        1.0 + vehicle.downforce_coeff * v_entry.powi(2) / sim_consts.downforce_v_scale;

    let v_corner_max = match (segment.kind, segment.radius) {
        (SegmentKind::Corner, Some(radius)) => {
            (grip * downforce_mult * sim_consts.gravity * radius).sqrt()
        }
        _ => v_entry * sim_consts.chicane_speed_frac,
    };

    // a grip bound that cannot be evaluated leaves the corner at the velocity floor
    let v_corner_max = if v_corner_max.is_nan() {
        sim_consts.v_floor
    } else {
        v_corner_max.max(0.0)
    };

    let braking_eff = driver.skills.braking * perf_factor;
    let v_entry_adj = if braking_eff > 0.0 {
        v_entry.min(v_corner_max / braking_eff)
    } else {
        v_entry
    };
    let v_corner = v_corner_max.min(v_entry_adj).max(sim_consts.v_floor);

    let (t_base, v_exit) = if matches!(segment.kind, SegmentKind::Chicane) {
        (
            segment.length / (v_corner * sim_consts.chicane_time_frac),
            v_corner * sim_consts.chicane_exit_frac,
        )
    } else {
        (
            segment.length / v_corner,
            v_corner * sim_consts.corner_exit_frac,
        )
    };

    let difficulty_factor = 1.0
        + segment.difficulty
            * sim_consts.difficulty_sensitivity
            * (1.0 - driver.skills.experience);

    let perturbation = sample_perturbation(
        sim_consts.sd_corner * driver.skills.risk * (1.0 - driver.skills.consistency),
        sim_consts.perturbation_clip,
        rng,
    );

    SegmentTraversal {
        t_segment: t_base * difficulty_factor * (1.0 + perturbation).max(MIN_PERTURBATION_FACTOR),
        v_exit,
    }
}

/// sample_perturbation draws a zero-mean normally distributed value with standard deviation sd,
/// clipped symmetrically to clip standard deviations. No value is drawn if sd is not positive.
pub fn sample_perturbation<R: Rng + ?Sized>(sd: f64, clip: f64, rng: &mut R) -> f64 {
    if !(sd > 0.0) {
        return 0.0;
    }

    match Normal::new(0.0, sd) {
        Ok(normal) => {
            let bound = clip.abs() * sd;
            normal.sample(rng).max(-bound).min(bound)
        }
        Err(_) => 0.0,
    }
}
