use crate::core::driver::DriverPars;
use crate::core::segment::{calc_segment_traversal, SimConstants};
use crate::core::track::Track;
use crate::core::vehicle::Vehicle;
use rand::Rng;

/// LapResult contains the lap time as well as the time and exit velocity of every segment (in
/// driving order).
#[derive(Debug, Clone, PartialEq)]
pub struct LapResult {
    pub t_lap: f64,
    pub t_segments: Vec<f64>,
    pub v_exits: Vec<f64>,
}

/// simulate_lap drives a single lap: starting with v_start, the segments are traversed in track
/// order and the exit velocity of each segment is the entry velocity of the next one. Nothing is
/// kept between two calls apart from the state of rng.
#[allow(clippy::too_many_arguments)]
pub fn simulate_lap<R: Rng + ?Sized>(
    driver: &DriverPars,
    vehicle: &Vehicle,
    track: &Track,
    lap: u32,
    wear: f64,
    grip_factor: f64,
    sim_consts: &SimConstants,
    rng: &mut R,
) -> LapResult {
    let mut t_segments = Vec::with_capacity(track.segments.len());
    let mut v_exits = Vec::with_capacity(track.segments.len());
    let mut v_cur = sim_consts.v_start;

    for segment in track.segments.iter() {
        let traversal = calc_segment_traversal(
            driver,
            vehicle,
            segment,
            v_cur,
            wear,
            lap,
            grip_factor,
            sim_consts,
            rng,
        );

        t_segments.push(traversal.t_segment);
        v_exits.push(traversal.v_exit);
        v_cur = traversal.v_exit;
    }

    LapResult {
        t_lap: t_segments.iter().sum(),
        t_segments,
        v_exits,
    }
}
