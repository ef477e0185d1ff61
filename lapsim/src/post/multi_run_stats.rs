use crate::post::race_result::{DriverInfo, RaceResult};
use helpers::general::{mean, std_dev};
use serde::{Deserialize, Serialize};

/// DriverStats aggregates the results of a single driver over several simulated races.
///
/// * `points` - Championship points scored over all races
/// * `mean_position` - Mean finishing position over the races the driver finished
/// * `mean_racetime` - (s) Mean race time over the races the driver finished
/// * `std_racetime` - (s) Sample standard deviation of the race time (at least two finishes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStats {
    pub driver_no: u32,
    pub name: String,
    pub team: String,
    pub no_races: u32,
    pub wins: u32,
    pub podiums: u32,
    pub retirements: u32,
    pub points: u32,
    pub mean_position: Option<f64>,
    pub mean_racetime: Option<f64>,
    pub std_racetime: Option<f64>,
}

impl DriverStats {
    pub fn get_win_rate(&self) -> f64 {
        if self.no_races == 0 {
            return 0.0;
        }
        self.wins as f64 / self.no_races as f64
    }

    pub fn get_mean_points(&self) -> f64 {
        if self.no_races == 0 {
            return 0.0;
        }
        self.points as f64 / self.no_races as f64
    }
}

/// MultiRunStats contains the per-driver statistics of a Monte Carlo evaluation, i.e. of several
/// races simulated with the same parameters but different seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRunStats {
    pub no_races: u32,
    pub drivers: Vec<DriverStats>,
}

impl MultiRunStats {
    /// from_results evaluates the inserted race results. The drivers are taken from the first race
    /// result (grid order) and sorted by number of wins (descending) and mean position afterwards.
    pub fn from_results(race_results: &[RaceResult]) -> MultiRunStats {
        let drivers_info: Vec<DriverInfo> = race_results
            .first()
            .map_or_else(Vec::new, |race_result| race_result.drivers.to_owned());

        let mut drivers: Vec<DriverStats> = drivers_info
            .iter()
            .map(|driver| calc_driver_stats(driver, race_results))
            .collect();

        // sort by wins (descending), drivers without finishes are placed last
        drivers.sort_by(|a, b| {
            b.wins.cmp(&a.wins).then_with(|| {
                let pos_a = a.mean_position.unwrap_or(f64::INFINITY);
                let pos_b = b.mean_position.unwrap_or(f64::INFINITY);
                pos_a
                    .partial_cmp(&pos_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        MultiRunStats {
            no_races: race_results.len() as u32,
            drivers,
        }
    }

    pub fn get_driver_stats(&self, driver_no: u32) -> Option<&DriverStats> {
        self.drivers
            .iter()
            .find(|driver_stats| driver_stats.driver_no == driver_no)
    }

    /// print prints the statistics to the console output.
    pub fn print(&self) {
        println!("RESULT: Statistics over {} simulated races", self.no_races);
        println!(
            "{:<5} {:<22} {:<22} {:>6} {:>6} {:>8} {:>5} {:>8} {:>9} {:>12} {:>9}",
            "no",
            "name",
            "team",
            "wins",
            "win%",
            "podiums",
            "DNFs",
            "mean pts",
            "mean pos",
            "mean time",
            "std time"
        );

        for driver_stats in self.drivers.iter() {
            println!(
                "#{:<4} {:<22} {:<22} {:>6} {:>5.1}% {:>8} {:>5} {:>8.2} {:>9} {:>12} {:>9}",
                driver_stats.driver_no,
                driver_stats.name,
                driver_stats.team,
                driver_stats.wins,
                driver_stats.get_win_rate() * 100.0,
                driver_stats.podiums,
                driver_stats.retirements,
                driver_stats.get_mean_points(),
                format_opt(driver_stats.mean_position, 2, ""),
                format_opt(driver_stats.mean_racetime, 3, "s"),
                format_opt(driver_stats.std_racetime, 3, "s"),
            );
        }
    }
}

fn calc_driver_stats(driver: &DriverInfo, race_results: &[RaceResult]) -> DriverStats {
    let mut wins = 0;
    let mut podiums = 0;
    let mut retirements = 0;
    let mut points = 0;
    let mut no_races = 0;
    let mut positions: Vec<f64> = Vec::with_capacity(race_results.len());
    let mut racetimes: Vec<f64> = Vec::with_capacity(race_results.len());

    for race_result in race_results.iter() {
        let entry = match race_result
            .classification
            .iter()
            .find(|entry| entry.driver_no == driver.driver_no)
        {
            Some(entry) => entry,
            None => continue,
        };
        no_races += 1;
        points += entry.points;

        match entry.position {
            Some(position) => {
                if position == 1 {
                    wins += 1;
                }
                if position <= 3 {
                    podiums += 1;
                }
                positions.push(position as f64);
                racetimes.push(entry.racetime);
            }
            None => retirements += 1,
        }
    }

    DriverStats {
        driver_no: driver.driver_no,
        name: driver.name.to_owned(),
        team: driver.team.to_owned(),
        no_races,
        wins,
        podiums,
        retirements,
        points,
        mean_position: mean(&positions),
        mean_racetime: mean(&racetimes),
        std_racetime: std_dev(&racetimes),
    }
}

fn format_opt(val: Option<f64>, decimals: usize, unit: &str) -> String {
    match val {
        Some(val) => format!("{:.*}{}", decimals, val, unit),
        None => String::from("---"),
    }
}
