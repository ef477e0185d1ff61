use serde::{Deserialize, Serialize};

/// All skill coefficients are normalized to [0.0, 1.0] (1.0 = perfect).
///
/// * `cornering` - Corner speed ability
/// * `braking` - Braking efficiency in front of corners
/// * `acceleration` - Ability to put the power down on straights
/// * `consistency` - Regularity, reduces fatigue and corner time scatter
/// * `tire_management` - Reduces the effect of tire wear
/// * `risk` - Risk appetite, scales the random time scatter
/// * `experience` - Reduces the time loss on difficult segments
/// * `wet_performance` - Aptitude on a wet or mixed track
/// * `qualifying_pace` - One-lap pace, decides the qualifying
/// * `race_pace` - Race pace (listed in the starting grid only)
/// * `overtaking` - Overtaking ability (listed in the starting grid only)
/// * `defending` - Ability to defend a position (listed in the starting grid only)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SkillPars {
    pub cornering: f64,
    pub braking: f64,
    pub acceleration: f64,
    pub consistency: f64,
    pub tire_management: f64,
    pub risk: f64,
    pub experience: f64,
    pub wet_performance: f64,
    pub qualifying_pace: f64,
    pub race_pace: f64,
    pub overtaking: f64,
    pub defending: f64,
}

impl SkillPars {
    /// The method returns all coefficients together with their names, e.g. for range checks.
    pub fn named_values(&self) -> [(&'static str, f64); 12] {
        [
            ("cornering", self.cornering),
            ("braking", self.braking),
            ("acceleration", self.acceleration),
            ("consistency", self.consistency),
            ("tire_management", self.tire_management),
            ("risk", self.risk),
            ("experience", self.experience),
            ("wet_performance", self.wet_performance),
            ("qualifying_pace", self.qualifying_pace),
            ("race_pace", self.race_pace),
            ("overtaking", self.overtaking),
            ("defending", self.defending),
        ]
    }
}

/// Career statistics are listed in the starting grid, only the DNF rate enters the simulation.
///
/// * `wins` - Career race wins
/// * `podiums` - Career podiums
/// * `poles` - Career pole positions
/// * `championship_points` - Career championship points
/// * `dnf_rate` - Observed share of races not finished in [0.0, 1.0] (the configured default is
/// used if not set)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct CareerStats {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub podiums: u32,
    #[serde(default)]
    pub poles: u32,
    #[serde(default)]
    pub championship_points: u32,
    #[serde(default)]
    pub dnf_rate: Option<f64>,
}

/// * `driver_no` - Stable competitor identifier (race number), e.g. 93
/// * `name` - Competitor name
/// * `team` - Team name, used to look up the vehicle parameters
/// * `skills` - Normalized skill coefficients
/// * `career` - Career statistics
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DriverPars {
    pub driver_no: u32,
    pub name: String,
    pub team: String,
    pub skills: SkillPars,
    #[serde(default)]
    pub career: CareerStats,
}

impl DriverPars {
    /// The method returns the probability that the competitor retires from a race, falling back
    /// to the inserted default if the career statistics contain no DNF rate.
    pub fn dnf_probability(&self, default: f64) -> f64 {
        self.career.dnf_rate.unwrap_or(default)
    }
}
