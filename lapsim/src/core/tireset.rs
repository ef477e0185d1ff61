/// calc_wear returns the normalized tire wear at the start of the inserted lap (1-based):
/// wear = (lap - 1) / tot_no_laps. The result is limited to [0.0, 1.0].
pub fn calc_wear(lap: u32, tot_no_laps: u32) -> f64 {
    if tot_no_laps == 0 || lap == 0 {
        return 0.0;
    }
    ((lap - 1) as f64 / tot_no_laps as f64).clamp(0.0, 1.0)
}

/// calc_fatigue_factor returns the performance factor caused by driver fatigue:
/// fatigue_factor = 1 - lap * fatigue_rate * (1 - consistency). The factor does not drop below
/// zero, i.e. a completely exhausted driver has no performance left.
pub fn calc_fatigue_factor(lap: u32, consistency: f64, fatigue_rate: f64) -> f64 {
    (1.0 - lap as f64 * fatigue_rate * (1.0 - consistency)).max(0.0)
}

#[derive(Debug, Clone, Default)]
pub struct Tireset {
    wear: f64,
}

impl Tireset {
    pub fn new() -> Tireset {
        Tireset { wear: 0.0 }
    }

    pub fn get_wear(&self) -> f64 {
        self.wear
    }

    /// update_wear sets the wear for the inserted lap. Wear never decreases within a race, i.e. a
    /// call for an earlier lap keeps the current value.
    pub fn update_wear(&mut self, lap: u32, tot_no_laps: u32) {
        self.wear = self.wear.max(calc_wear(lap, tot_no_laps));
    }
}

/// calc_tire_factor returns the performance factor caused by tire wear:
/// tire_factor = 1 - wear * (1 - tire_management) * wear_sensitivity, limited to >= 0.
pub fn calc_tire_factor(wear: f64, tire_management: f64, wear_sensitivity: f64) -> f64 {
    (1.0 - wear * (1.0 - tire_management) * wear_sensitivity).max(0.0)
}
