use super::cli_guided::guided_menu;
use super::cli_map::map_menu;
use super::cli_quiz::quiz_menu;
use super::cli_settings::settings_menu;
use crate::Stoichiometry::problem_generator::UniformSource;
use crate::session::Session;
use crate::settings::SettingsManager;
use std::io::{self, Write};

pub fn run_interactive_menu<R: UniformSource>(
    session: &mut Session<R>,
    settings: &mut SettingsManager,
) -> io::Result<()> {
    loop {
        show_main_menu()?;
        let choice = get_user_input()?;

        match choice.trim() {
            "1" => guided_menu(session)?,
            "2" => quiz_menu(session)?,
            "3" => map_menu(session)?,
            "4" => settings_menu(settings)?,
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}
/* colors
Blue (\x1b[34m) - header text
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - prompts
Red (\x1b[31m) - errors
Reset (\x1b[0m)
*/
fn show_main_menu() -> io::Result<()> {
    println!(
        "\x1b[34m\n Welcome to MoleCoach: stoichiometry practice with dimensional analysis\x1b[0m"
    );
    println!("\x1b[33m1. Guided setup (build the conversion factors)\x1b[0m");
    println!("\x1b[33m2. Quiz (free response)\x1b[0m");
    println!("\x1b[33m3. Mole map (conversion routes)\x1b[0m");
    println!("\x1b[33m4. Settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ")
}

pub(crate) fn prompt(text: &str) -> io::Result<()> {
    print!("\x1b[36m{}\x1b[0m", text);
    io::stdout().flush()
}

/// One line from stdin; end of input reads as "0" so every menu unwinds.
pub(crate) fn get_user_input() -> io::Result<String> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok("0".to_string());
    }
    Ok(input)
}

/// Prompts and parses a 1-based choice into a 0-based index.
pub(crate) fn ask_index(text: &str) -> io::Result<Option<usize>> {
    prompt(text)?;
    let input = get_user_input()?;
    Ok(input
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1)))
}

pub(crate) fn print_error(e: &dyn std::fmt::Display) {
    println!("\x1b[31m{}\x1b[0m", e);
}
