pub mod driver;
pub mod handle_race;
pub mod lap;
pub mod qualifying;
pub mod race;
pub mod retirement;
pub mod segment;
pub mod state_handler;
pub mod tireset;
pub mod track;
pub mod vehicle;
