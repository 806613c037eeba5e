/// Console front end: main menu and input helpers.
pub mod cli_main;
/// Guided setup: place and flip factors, check the setup, then the final number.
pub mod cli_guided;
pub mod cli_map;
pub mod cli_quiz;
pub mod cli_settings;
/// Console rendering: formula subscripts and prettytable tables.
pub mod display;
