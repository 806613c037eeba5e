use super::cli_main::{ask_index, get_user_input, print_error, prompt};
use super::display::{event_text, factor_bank_table, path_checklist, slots_table, subscript_formula};
use crate::Stoichiometry::factor_bank::FactorId;
use crate::Stoichiometry::problem_generator::{ProblemMode, UniformSource};
use crate::Stoichiometry::setup_validator::PathStep;
use crate::coach_error::CoachError;
use crate::session::{Command, Event, Session};
use log::error;
use std::io;

pub fn guided_menu<R: UniformSource>(session: &mut Session<R>) -> io::Result<()> {
    if !run(session, Command::NewProblem(ProblemMode::Guided)) {
        return Ok(());
    }
    show_board(session);
    loop {
        println!("\n=== Guided setup ===");
        println!("1. Show the board");
        println!("2. Place a factor");
        println!("3. Flip a box");
        println!("4. Clear a box");
        println!("5. Tick/untick a path step");
        println!("6. Check my setup");
        println!("7. Show the correct setup");
        println!("8. Check my final answer");
        println!("9. Reveal the answer");
        println!("h. Hint    s. Show steps    n. New problem");
        println!("0. Back to main menu");
        prompt("Enter your choice: ")?;

        let choice = get_user_input()?;
        match choice.trim() {
            "1" => show_board(session),
            "2" => {
                let Some(problem) = session.problem() else { continue };
                factor_bank_table(&problem.factor_bank).printstd();
                let ids: Vec<FactorId> =
                    problem.factor_bank.factors().iter().map(|f| f.id).collect();
                let id = ask_index("Factor #: ")?.and_then(|i| ids.get(i).copied());
                let slot = ask_index("Into box (1-3): ")?;
                match (id, slot) {
                    (Some(id), Some(slot)) => {
                        if run(session, Command::PlaceFactor(slot, id)) {
                            show_board(session);
                        }
                    }
                    _ => println!("Invalid choice. Please try again."),
                }
            }
            "3" | "4" => {
                let Some(slot) = ask_index("Box (1-3): ")? else {
                    println!("Invalid choice. Please try again.");
                    continue;
                };
                let command = if choice.trim() == "3" {
                    Command::FlipSlot(slot)
                } else {
                    Command::ClearSlot(slot)
                };
                if run(session, command) {
                    show_board(session);
                }
            }
            "5" => {
                println!("{}", path_checklist(session.conceptual_path()));
                match ask_index("Step (1-3): ")?.and_then(|i| PathStep::ALL.get(i).copied()) {
                    Some(step) => {
                        let checked = !session.conceptual_path().is_checked(step);
                        run(session, Command::SetPathFlag(step, checked));
                    }
                    None => println!("Invalid choice. Please try again."),
                }
            }
            "6" => {
                run(session, Command::CheckSetup);
                println!("Target unit: {}", subscript_formula(&session.target_unit_tag()));
            }
            "7" => {
                if run(session, Command::ShowCorrectSetup) {
                    println!("Here's the correct setup. Notice how the units cancel step-by-step.");
                    show_board(session);
                }
            }
            "8" => {
                prompt("Your final number: ")?;
                let raw = get_user_input()?;
                run(session, Command::SubmitFinalAnswer(raw.trim().to_string()));
            }
            "9" => {
                run(session, Command::RequestReveal);
            }
            "h" => {
                run(session, Command::RequestHint);
            }
            "s" => {
                run(session, Command::ShowSteps);
            }
            "n" => {
                if run(session, Command::NewProblem(ProblemMode::Guided)) {
                    show_board(session);
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}

/// Dispatches and prints the outcome; false when the command failed.
pub(crate) fn run<R: UniformSource>(session: &mut Session<R>, command: Command) -> bool {
    match session.dispatch(command) {
        Ok(event) => {
            if !matches!(event, Event::SlotsChanged(_)) {
                println!("{}", event_text(&event));
            }
            true
        }
        Err(e) => {
            // bad data, as opposed to a refused command
            if matches!(
                e,
                CoachError::InvalidMolarMass { .. } | CoachError::EmptyDataset
            ) {
                error!("{}", e);
            }
            print_error(&e);
            false
        }
    }
}

fn show_board<R: UniformSource>(session: &Session<R>) {
    let Some(problem) = session.problem() else { return };
    slots_table(&problem.given_label(), session.slots()).printstd();
    println!("= ? {}", subscript_formula(&session.target_unit_tag()));
    println!("{}", path_checklist(session.conceptual_path()));
}
