use super::cli_guided::run;
use super::cli_main::{get_user_input, prompt};
use crate::MoleMap::path_planner::UnitKind;
use crate::Stoichiometry::problem_generator::UniformSource;
use crate::session::{Command, Session};
use std::io;

pub fn map_menu<R: UniformSource>(session: &mut Session<R>) -> io::Result<()> {
    let units: Vec<&str> = UnitKind::ALL.iter().map(|u| u.as_str()).collect();
    loop {
        println!("\n=== Mole map ===");
        println!(
            "Designators are a unit ({}) followed by A or B, e.g. gramsA. Empty input goes back.",
            units.join(", ")
        );
        prompt("Start: ")?;
        let start = get_user_input()?;
        if start.trim().is_empty() || start.trim() == "0" {
            break;
        }
        prompt("Target: ")?;
        let target = get_user_input()?;
        if target.trim().is_empty() || target.trim() == "0" {
            break;
        }
        run(
            session,
            Command::RequestPathPlan(start.trim().to_string(), target.trim().to_string()),
        );
    }
    Ok(())
}
