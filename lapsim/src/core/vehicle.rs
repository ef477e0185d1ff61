use serde::{Deserialize, Serialize};

/// * `team` - Team that operates the vehicle, e.g. Ducati
/// * `power` - (W) Engine power
/// * `mass` - (kg) Vehicle mass including the driver
/// * `drag_coeff` - (-) Aerodynamic drag coefficient
/// * `frontal_area` - (m^2) Frontal area
/// * `downforce_coeff` - (-) Aerodynamic downforce coefficient
/// * `tire_grip` - (-) Tire friction coefficient
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VehiclePars {
    pub team: String,
    pub power: f64,
    pub mass: f64,
    pub drag_coeff: f64,
    pub frontal_area: f64,
    pub downforce_coeff: f64,
    pub tire_grip: f64,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub power: f64,
    pub mass: f64,
    pub drag_area: f64,
    pub downforce_coeff: f64,
    pub tire_grip: f64,
}

impl Vehicle {
    pub fn new(vehicle_pars: &VehiclePars) -> Vehicle {
        Vehicle {
            power: vehicle_pars.power,
            mass: vehicle_pars.mass,
            drag_area: vehicle_pars.drag_coeff * vehicle_pars.frontal_area,
            downforce_coeff: vehicle_pars.downforce_coeff,
            tire_grip: vehicle_pars.tire_grip,
        }
    }

    /// The method returns the theoretical top speed (m/s) at which the inserted power is fully
    /// consumed by aerodynamic drag, capped to v_cap. A vanishing drag area results in v_cap.
    pub fn calc_v_top(&self, power: f64, air_density: f64, v_cap: f64) -> f64 {
        let v_top = (2.0 * power / (air_density * self.drag_area)).cbrt();

        if v_top.is_finite() {
            v_top.min(v_cap)
        } else {
            v_cap
        }
    }
}
