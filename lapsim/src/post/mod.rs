pub mod multi_run_stats;
pub mod race_result;
