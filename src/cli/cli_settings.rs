use super::cli_main::{ask_index, get_user_input, print_error, prompt};
use crate::MoleMap::path_planner::StepId;
use crate::settings::SettingsManager;
use log::info;
use std::io;

/// Edits coach_config.json. The running session keeps its settings until the next start.
pub fn settings_menu(manager: &mut SettingsManager) -> io::Result<()> {
    loop {
        println!("\n=== Settings ({}) ===", manager.config_file());
        println!("1. Show current settings");
        println!("2. Set problem set file");
        println!("3. Set a step video link");
        println!("4. Set answer tolerances");
        println!("5. Reset to defaults");
        println!("0. Back to main menu");
        prompt("Enter your choice: ")?;

        let choice = get_user_input()?;
        let outcome = match choice.trim() {
            "1" => {
                match serde_json::to_string_pretty(manager.get_config()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => print_error(&e),
                }
                continue;
            }
            "2" => {
                prompt("Path to the problem set: ")?;
                let path = get_user_input()?;
                manager.set_dataset_path(path.trim())
            }
            "3" => {
                for (i, step) in StepId::ALL.iter().enumerate() {
                    let link = manager.get_config().video_links.get(step.as_str());
                    println!("  {}. {} {}", i + 1, step, link.map_or("", String::as_str));
                }
                let Some(step) = ask_index("Step #: ")?.and_then(|i| StepId::ALL.get(i).copied())
                else {
                    println!("Invalid choice. Please try again.");
                    continue;
                };
                prompt("Video link (empty to remove): ")?;
                let link = get_user_input()?;
                manager.set_video_link(step, &link)
            }
            "4" => {
                let current = manager.get_config().tolerance();
                println!(
                    "Current: absolute {}, relative {}",
                    current.absolute, current.relative
                );
                prompt("Absolute and relative tolerance (e.g. 0.05 0.015): ")?;
                let input = get_user_input()?;
                match parse_tolerance_input(&input) {
                    Some((absolute, relative)) => manager.set_tolerance(absolute, relative),
                    None => {
                        println!("Type two numbers separated by a space.");
                        continue;
                    }
                }
            }
            "5" => manager.reset_to_defaults(),
            "0" => break,
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };
        match outcome {
            Ok(()) => {
                info!("settings saved to '{}'", manager.config_file());
                println!("Saved. Changes take effect on the next start.");
            }
            Err(e) => print_error(&e),
        }
    }
    Ok(())
}

/// "0.05 0.015" or "0.05, 0.015" -> (absolute, relative)
pub fn parse_tolerance_input(input: &str) -> Option<(f64, f64)> {
    let numbers: Vec<f64> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers[..] {
        [absolute, relative] if absolute.is_finite() && relative.is_finite() => {
            Some((absolute, relative))
        }
        _ => None,
    }
}
