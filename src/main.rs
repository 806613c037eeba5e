use MoleCoach::Utils::load_from_file::LoadData;
use MoleCoach::Utils::logger::init_logging;
use MoleCoach::cli::cli_main::run_interactive_menu;
use MoleCoach::session::Session;
use MoleCoach::settings::SettingsManager;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = SettingsManager::new();
    let config = manager.get_config().clone();
    init_logging(&config.log_level, config.log_file.as_deref())?;
    info!("configuration from '{}'", manager.config_file());
    // without a problem set the mole map and the settings still work
    let reactions = LoadData::new(config.dataset_path.clone()).load_reactions_or_empty();
    let rng = StdRng::from_entropy();
    let mut session = Session::from_config(reactions, rng, &config);
    run_interactive_menu(&mut session, &mut manager)?;
    Ok(())
}
