use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::str::FromStr;

/// "info", "debug", ... ; anything unrecognized means Info
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Info)
}

/// Installs the global logger: the terminal always, plus `log_file` when given.
/// Call once, from the binary.
pub fn init_logging(level: &str, log_file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let level = parse_level(level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file.filter(|p| !p.trim().is_empty()) {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}
