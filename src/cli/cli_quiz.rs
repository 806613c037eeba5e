use super::cli_guided::run;
use super::cli_main::{get_user_input, prompt};
use super::display::stats_table;
use crate::Stoichiometry::problem_generator::{ProblemMode, QuantityUnit, UniformSource};
use crate::session::{Command, Session};
use std::io;

pub fn quiz_menu<R: UniformSource>(session: &mut Session<R>) -> io::Result<()> {
    if !run(session, Command::NewProblem(ProblemMode::Quiz)) {
        return Ok(());
    }
    loop {
        println!("\n=== Quiz ===");
        println!("1. Answer");
        println!("2. Hint");
        println!("3. Show steps");
        println!("4. Reveal the answer");
        println!("5. New problem");
        println!("6. Stats");
        println!("0. Back to main menu");
        prompt("Enter your choice: ")?;

        let choice = get_user_input()?;
        match choice.trim() {
            "1" => {
                prompt("Your answer: ")?;
                let raw = get_user_input()?;
                prompt("Unit (g or mol): ")?;
                let unit_input = get_user_input()?;
                match QuantityUnit::parse(&unit_input) {
                    Some(unit) => {
                        run(session, Command::SubmitQuizAnswer(raw.trim().to_string(), unit));
                        stats_table(&session.stats()).printstd();
                    }
                    None => println!("Unit must be g or mol."),
                }
            }
            "2" => {
                run(session, Command::RequestHint);
            }
            "3" => {
                run(session, Command::ShowSteps);
            }
            "4" => {
                run(session, Command::RequestReveal);
            }
            "5" => {
                run(session, Command::NewProblem(ProblemMode::Quiz));
            }
            "6" => stats_table(&session.stats()).printstd(),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}
