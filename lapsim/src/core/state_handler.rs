use crate::core::retirement::Retirement;
use crate::core::tireset::Tireset;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Active,
    Finished,
    Retired,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            State::Active => "Running",
            State::Finished => "Finished",
            State::Retired => "Retired",
        };
        write!(f, "{}", label)
    }
}

/// The StateHandler contains the statemachine of a single competitor and keeps track of its race
/// progress (completed laps, race time, running position, tire wear).
///
/// Possible statemachine states:
/// * `Active` -> competitor is running, initial state
/// * `Finished` -> competitor completed the final lap (terminal)
/// * `Retired` -> competitor retired at the start of its retirement lap (terminal)
///
/// The retirement lap is fixed when the handler is created and is never re-evaluated. Once a
/// terminal state is reached, race time, position and wear are frozen.
#[derive(Debug, Clone)]
pub struct StateHandler {
    tot_no_laps: u32,
    retirement: Option<Retirement>,
    state: State,
    tireset: Tireset,
    compl_laps: u32,
    racetime: f64,
    last_laptime: Option<f64>,
    position: Option<u32>,
    last_position: u32,
}

impl StateHandler {
    pub fn new(p_grid: u32, tot_no_laps: u32, retirement: Option<Retirement>) -> StateHandler {
        StateHandler {
            tot_no_laps,
            retirement,
            state: State::Active,
            tireset: Tireset::new(),
            compl_laps: 0,
            racetime: 0.0,
            last_laptime: None,
            position: Some(p_grid),
            last_position: p_grid,
        }
    }

    /// check_state_transition is called at the start of every lap. It switches an active
    /// competitor into the Retired state if the inserted lap is its retirement lap, and updates
    /// the tire wear of active competitors otherwise. Returns true if the competitor retired in this
    /// call.
    pub fn check_state_transition(&mut self, lap: u32) -> bool {
        match self.state {
            State::Active => {
                if self.retirement.map_or(false, |retirement| retirement.lap == lap) {
                    self.state = State::Retired;
                    self.position = None;
                    self.last_laptime = None;
                    return true;
                }
                self.tireset.update_wear(lap, self.tot_no_laps);
                false
            }
            State::Finished | State::Retired => false,
        }
    }

    /// complete_lap adds the inserted lap time to the race time of an active competitor and
    /// switches it into the Finished state after the final lap. Calls in terminal states are
    /// ignored.
    pub fn complete_lap(&mut self, laptime: f64) {
        if !matches!(self.state, State::Active) {
            return;
        }

        self.compl_laps += 1;
        self.racetime += laptime;
        self.last_laptime = Some(laptime);

        if self.compl_laps >= self.tot_no_laps {
            self.state = State::Finished;
        }
    }

    /// set_position sets the running position after the ranking of a lap. Retired competitors keep
    /// no position.
    pub fn set_position(&mut self, position: u32) {
        if matches!(self.state, State::Retired) {
            return;
        }
        self.position = Some(position);
        self.last_position = position;
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    /// is_ranked returns true if the competitor takes part in the ranking (Active or Finished).
    pub fn is_ranked(&self) -> bool {
        !matches!(self.state, State::Retired)
    }

    pub fn get_retirement(&self) -> Option<Retirement> {
        self.retirement
    }

    pub fn get_wear(&self) -> f64 {
        self.tireset.get_wear()
    }

    pub fn get_compl_laps(&self) -> u32 {
        self.compl_laps
    }

    pub fn get_racetime(&self) -> f64 {
        self.racetime
    }

    pub fn get_last_laptime(&self) -> Option<f64> {
        self.last_laptime
    }

    pub fn get_position(&self) -> Option<u32> {
        self.position
    }

    /// get_last_position returns the last valid running position (the grid position if no lap was
    /// ranked yet).
    pub fn get_last_position(&self) -> u32 {
        self.last_position
    }
}
