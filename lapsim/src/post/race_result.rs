use crate::core::driver::{CareerStats, SkillPars};
use crate::core::qualifying::QualifyingEntry;
use crate::core::retirement::Retirement;
use crate::core::state_handler::State;
use anyhow::Context;
use helpers::general::{argmin, mean, std_dev};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

/// Championship points of finishing positions 1 to 15.
const POINTS_MAP: [u32; 15] = [25, 20, 16, 13, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1];

/// calc_points returns the championship points of a finishing position. Retired drivers (no
/// position) and drivers finishing behind the 15th position score nothing.
pub fn calc_points(position: Option<u32>) -> u32 {
    match position {
        Some(position) if position >= 1 => POINTS_MAP
            .get(position as usize - 1)
            .copied()
            .unwrap_or(0),
        _ => 0,
    }
}

/// DriverInfo is used to store the driver data required for post-processing the results.
///
/// * `grid_position` - Starting position
/// * `skills` - Skill coefficients, listed in the starting grid
/// * `career` - Career statistics, listed in the starting grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub driver_no: u32,
    pub name: String,
    pub team: String,
    pub grid_position: u32,
    pub skills: SkillPars,
    pub career: CareerStats,
}

/// LapRecord contains the state of a single driver at the end of a single lap. Retired drivers
/// keep appearing with their frozen race time but without lap time and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub lap: u32,
    pub driver_no: u32,
    pub laptime: Option<f64>,
    pub racetime: f64,
    pub position: Option<u32>,
    pub status: State,
    pub wear: f64,
}

/// ClassificationEntry is a single line of the final classification.
///
/// * `rank` - Rank in the classification (finishers first, retired drivers afterwards)
/// * `position` - Finishing position (not set for retired drivers)
/// * `points` - Championship points scored in the race
/// * `gap` - (s) Gap to the winner (not set for retired drivers)
/// * `retirement` - Retirement lap and cause (retired drivers only)
/// * `last_position` - Last valid running position (equals `position` for finishers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub rank: u32,
    pub driver_no: u32,
    pub name: String,
    pub team: String,
    pub status: State,
    pub position: Option<u32>,
    pub laps_completed: u32,
    pub racetime: f64,
    pub points: u32,
    pub gap: Option<f64>,
    pub retirement: Option<Retirement>,
    pub last_position: u32,
    pub grid_position: u32,
}

impl ClassificationEntry {
    /// get_positions_gained returns the number of positions gained from the grid to the finish
    /// (negative if positions were lost). It is not set for retired drivers.
    pub fn get_positions_gained(&self) -> Option<i64> {
        self.position
            .map(|position| self.grid_position as i64 - position as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FastestLap {
    pub driver_no: u32,
    pub lap: u32,
    pub laptime: f64,
}

/// RaceStats contains the overall statistics of a single race.
///
/// * `mean_laptime` - (s) Mean of all driven lap times
/// * `std_laptime` - (s) Sample standard deviation of all driven lap times
/// * `retirement_rate` - Share of the field that did not finish
/// * `mean_gap` - (s) Mean gap of the finishers behind the winner to the winner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceStats {
    pub mean_laptime: Option<f64>,
    pub std_laptime: Option<f64>,
    pub no_finishers: u32,
    pub no_retirements: u32,
    pub retirement_rate: f64,
    pub mean_gap: Option<f64>,
}

/// RaceResult contains all race information that is required for post-processing the results.
/// Drivers are stored in grid order, the qualifying result is only set if a qualifying was held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    pub track_name: String,
    pub season: u32,
    pub tot_no_laps: u32,
    pub seed: u64,
    pub drivers: Vec<DriverInfo>,
    pub qualifying: Option<Vec<QualifyingEntry>>,
    pub lap_records: Vec<LapRecord>,
    pub classification: Vec<ClassificationEntry>,
}

impl RaceResult {
    /// get_lap_records_driver returns the lap records of a single driver in lap order.
    pub fn get_lap_records_driver(&self, driver_no: u32) -> Vec<&LapRecord> {
        self.lap_records
            .iter()
            .filter(|record| record.driver_no == driver_no)
            .collect()
    }

    /// get_fastest_lap returns the fastest lap of the race (first driver in record order on
    /// equal times).
    pub fn get_fastest_lap(&self) -> Option<FastestLap> {
        let driven: Vec<(&LapRecord, f64)> = self
            .lap_records
            .iter()
            .filter_map(|record| record.laptime.map(|laptime| (record, laptime)))
            .collect();
        let laptimes: Vec<f64> = driven.iter().map(|(_, laptime)| *laptime).collect();
        let idx = argmin(&laptimes)?;

        Some(FastestLap {
            driver_no: driven[idx].0.driver_no,
            lap: driven[idx].0.lap,
            laptime: driven[idx].1,
        })
    }

    /// get_winner returns the classification entry of the race winner (if anybody finished).
    pub fn get_winner(&self) -> Option<&ClassificationEntry> {
        self.classification
            .iter()
            .find(|entry| entry.position == Some(1))
    }

    /// get_race_stats evaluates the driven lap times and the classification of the race.
    pub fn get_race_stats(&self) -> RaceStats {
        let laptimes: Vec<f64> = self
            .lap_records
            .iter()
            .filter_map(|record| record.laptime)
            .collect();
        let gaps: Vec<f64> = self
            .classification
            .iter()
            .filter(|entry| entry.position.map_or(false, |position| position > 1))
            .filter_map(|entry| entry.gap)
            .collect();

        let no_finishers = self
            .classification
            .iter()
            .filter(|entry| entry.position.is_some())
            .count() as u32;
        let no_retirements = self.classification.len() as u32 - no_finishers;

        RaceStats {
            mean_laptime: mean(&laptimes),
            std_laptime: std_dev(&laptimes),
            no_finishers,
            no_retirements,
            retirement_rate: if self.classification.is_empty() {
                0.0
            } else {
                no_retirements as f64 / self.classification.len() as f64
            },
            mean_gap: mean(&gaps),
        }
    }

    /// print_starting_grid prints the starting grid together with the qualifying lap times (if a
    /// qualifying was held), the skills, and the career statistics of the drivers.
    pub fn print_starting_grid(&self) {
        println!("INFO: Starting grid ({} {})", self.track_name, self.season);
        println!(
            "{:>4} {:<5} {:<22} {:<22} {:>10} {:>6} {:>6} {:>6} {:>6} \
            {:>5} {:>5} {:>5} {:>6} {:>5}",
            "grid", "no", "name", "team", "quali", "q-pace", "r-pace", "overt", "defend", "wins",
            "pods", "poles", "points", "DNF%"
        );

        let laptimes_quali: HashMap<u32, f64> = self
            .qualifying
            .iter()
            .flatten()
            .map(|entry| (entry.driver_no, entry.laptime))
            .collect();

        for driver in self.drivers.iter() {
            let laptime_str = match laptimes_quali.get(&driver.driver_no) {
                Some(laptime) => format!("{:.3}s", laptime),
                None => String::from("---"),
            };
            let dnf_rate_str = match driver.career.dnf_rate {
                Some(dnf_rate) => format!("{:.1}", dnf_rate * 100.0),
                None => String::from("---"),
            };

            println!(
                "{:>4} #{:<4} {:<22} {:<22} {:>10} {:>6.2} {:>6.2} {:>6.2} {:>6.2} \
                {:>5} {:>5} {:>5} {:>6} {:>5}",
                driver.grid_position,
                driver.driver_no,
                driver.name,
                driver.team,
                laptime_str,
                driver.skills.qualifying_pace,
                driver.skills.race_pace,
                driver.skills.overtaking,
                driver.skills.defending,
                driver.career.wins,
                driver.career.podiums,
                driver.career.poles,
                driver.career.championship_points,
                dnf_rate_str
            );
        }
    }

    /// print_classification prints the final classification, the fastest lap, and the race
    /// statistics to the console output.
    pub fn print_classification(&self) {
        println!(
            "RESULT: Final classification ({} {}, {} laps)",
            self.track_name, self.season, self.tot_no_laps
        );

        for entry in self.classification.iter() {
            match entry.position {
                Some(position) => {
                    let gap_str = match entry.gap {
                        Some(gap) => format_time_gap(gap),
                        None => String::from("---"),
                    };
                    let gained_str = match entry.get_positions_gained() {
                        Some(gained) if gained > 0 => format!("+{}", gained),
                        Some(gained) => gained.to_string(),
                        None => String::new(),
                    };
                    println!(
                        "{:3}. #{:<3} {:<22} {:<22} {:>12.3}s {:>12} {:>3} pts (grid {}, {})",
                        position,
                        entry.driver_no,
                        entry.name,
                        entry.team,
                        entry.racetime,
                        gap_str,
                        entry.points,
                        entry.grid_position,
                        gained_str
                    )
                }
                None => {
                    let cause = entry
                        .retirement
                        .map_or_else(String::new, |retirement| retirement.cause.to_string());
                    println!(
                        "DNF. #{:<3} {:<22} {:<22} {} (grid {}, last position {}, laps {})",
                        entry.driver_no,
                        entry.name,
                        entry.team,
                        cause,
                        entry.grid_position,
                        entry.last_position,
                        entry.laps_completed
                    )
                }
            }
        }

        if let Some(fastest_lap) = self.get_fastest_lap() {
            println!(
                "RESULT: Fastest lap {:.3}s by #{} in lap {}",
                fastest_lap.laptime, fastest_lap.driver_no, fastest_lap.lap
            );
        }

        let race_stats = self.get_race_stats();
        println!(
            "RESULT: Mean lap time {} (std {}), {} finishers, {} DNFs ({:.1}%), mean gap {}",
            format_opt_secs(race_stats.mean_laptime),
            format_opt_secs(race_stats.std_laptime),
            race_stats.no_finishers,
            race_stats.no_retirements,
            race_stats.retirement_rate * 100.0,
            format_opt_secs(race_stats.mean_gap)
        );
    }

    /// print_lap_and_race_times prints the resulting lap and race times to the console output.
    /// Laps not driven due to a retirement are printed as DNF.
    pub fn print_lap_and_race_times(&self) -> anyhow::Result<()> {
        // create string for lap times and race times
        let mut tmp_string_laptime = String::new();
        let mut tmp_string_racetime = String::new();

        let records: HashMap<(u32, u32), &LapRecord> = self
            .lap_records
            .iter()
            .map(|record| ((record.lap, record.driver_no), record))
            .collect();

        for lap in 1..self.tot_no_laps + 1 {
            write!(&mut tmp_string_laptime, "{:3}", lap)?;
            write!(&mut tmp_string_racetime, "{:3}", lap)?;

            for driver in self.drivers.iter() {
                let record = records.get(&(lap, driver.driver_no)).copied();

                match record.and_then(|record| record.laptime.map(|laptime| (record, laptime))) {
                    Some((record, laptime)) => {
                        write!(&mut tmp_string_laptime, ", {:8.3}s", laptime)?;
                        write!(&mut tmp_string_racetime, ", {:8.3}s", record.racetime)?;
                    }
                    None => {
                        write!(&mut tmp_string_laptime, ", {:>9}", "DNF")?;
                        write!(&mut tmp_string_racetime, ", {:>9}", "DNF")?;
                    }
                }
            }

            writeln!(&mut tmp_string_laptime)?;
            writeln!(&mut tmp_string_racetime)?;
        }

        // create string with driver info
        let mut tmp_string_driver_info = String::from("lap");

        for driver in self.drivers.iter() {
            write!(&mut tmp_string_driver_info, ", {:>9}", format!("#{}", driver.driver_no))?;
        }

        // print everything to the console
        println!("RESULT: Lap times");
        println!("{}", tmp_string_driver_info);
        println!("{}", tmp_string_laptime);

        println!("RESULT: Race times");
        println!("{}", tmp_string_driver_info);
        println!("{}", tmp_string_racetime);

        Ok(())
    }

    /// write_lap_records_csv writes all lap records to a CSV file (one row per driver and lap).
    pub fn write_lap_records_csv(&self, filepath: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(filepath).context(format!(
            "Failed to create CSV file {}!",
            filepath.display()
        ))?;

        for record in self.lap_records.iter() {
            writer
                .serialize(record)
                .context("Failed to serialize lap record!")?;
        }

        writer.flush().context(format!(
            "Failed to write CSV file {}!",
            filepath.display()
        ))?;
        Ok(())
    }
}

/// format_time_gap formats a gap in seconds as "+S.mmms" below one minute and as "+M:SS.mmm"
/// otherwise. A vanishing gap is printed as "---".
pub fn format_time_gap(seconds: f64) -> String {
    if seconds <= 0.0 {
        return String::from("---");
    }

    // work in integer milliseconds such that rounding cannot produce 60 seconds
    let millis_tot = (seconds * 1000.0).round() as u64;

    if millis_tot < 60_000 {
        format!("+{}.{:03}s", millis_tot / 1000, millis_tot % 1000)
    } else {
        let minutes = millis_tot / 60_000;
        let secs = (millis_tot % 60_000) / 1000;
        let millis = millis_tot % 1000;
        format!("+{}:{:02}.{:03}", minutes, secs, millis)
    }
}

fn format_opt_secs(val: Option<f64>) -> String {
    match val {
        Some(val) => format!("{:.3}s", val),
        None => String::from("---"),
    }
}
