pub mod clock;
pub mod handle_race;
pub mod hurdles;
pub mod pace;
pub mod race;
pub mod speed;
