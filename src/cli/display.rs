use crate::MoleMap::step_catalog::{NO_STEPS_MESSAGE, StepCard};
use crate::Stoichiometry::answer_evaluator::SessionStats;
use crate::Stoichiometry::factor_bank::FactorBank;
use crate::Stoichiometry::setup_validator::{ConceptualPath, FactorSlots, PathStep};
use crate::Stoichiometry::worked_steps::{GroupedNumbers, WorkedStep};
use crate::session::Event;
use prettytable::{Table, row};

const SUBSCRIPTS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

/// Formula digits as subscripts: "2 H2O" -> "2 H₂O". Coefficients are left alone.
pub fn subscript_formula(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_formula = false;
    for c in text.chars() {
        match c.to_digit(10) {
            Some(d) if in_formula => out.push(SUBSCRIPTS[d as usize]),
            _ => {
                in_formula = c.is_alphabetic() || c == ')' || c == ']';
                out.push(c);
            }
        }
    }
    out
}

pub fn factor_bank_table(bank: &FactorBank) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Factor", "Top", "Bottom"]);
    for (i, factor) in bank.factors().iter().enumerate() {
        table.add_row(row![
            i + 1,
            factor.label,
            subscript_formula(factor.numerator()),
            subscript_formula(factor.denominator())
        ]);
    }
    table
}

pub fn slots_table(given: &str, slots: &FactorSlots) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Box", "Top", "Bottom", "Flipped"]);
    table.add_row(row!["given", subscript_formula(given), "", ""]);
    for (i, slot) in slots.iter().enumerate() {
        match slot {
            Some(f) => table.add_row(row![
                i + 1,
                subscript_formula(f.numerator()),
                subscript_formula(f.denominator()),
                if f.flipped { "yes" } else { "no" }
            ]),
            None => table.add_row(row![i + 1, "(empty)", "", ""]),
        };
    }
    table
}

pub fn path_checklist(path: &ConceptualPath) -> String {
    PathStep::ALL
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mark = if path.is_checked(*step) { "x" } else { " " };
            format!("  {}. [{}] {}", i + 1, mark, step.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats_table(stats: &SessionStats) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Streak", "Correct", "Total", "Mastery"]);
    table.add_row(row![
        stats.streak,
        stats.correct_count,
        stats.total_count,
        format!("{}%", stats.mastery_percent())
    ]);
    table
}

pub fn steps_text(steps: &[WorkedStep], grouped: &GroupedNumbers) -> String {
    let mut lines: Vec<String> = steps
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}) {}: {}\n   {}",
                i + 1,
                s.kind.heading(),
                s.title,
                subscript_formula(&s.calculation)
            )
        })
        .collect();
    let join = |values: &[f64]| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" × ")
    };
    lines.push(format!(
        "Numbers only: ({}) / ({})",
        join(&grouped.numerators),
        join(&grouped.denominators)
    ));
    lines.join("\n")
}

pub fn step_cards_text(cards: &[StepCard]) -> String {
    if cards.is_empty() {
        return NO_STEPS_MESSAGE.to_string();
    }
    cards
        .iter()
        .map(|c| {
            let mut card = format!(
                "Step {} [{}] {}\n   {}",
                c.number,
                c.badge.as_str(),
                c.title,
                c.text
            );
            if let Some(video) = &c.video {
                card.push_str(&format!("\n   Video: {}", video));
            }
            card
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Console text of an event. Slot changes are shown as a table by the menus instead.
pub fn event_text(event: &Event) -> String {
    match event {
        Event::ProblemReady(problem) => subscript_formula(&problem.prompt),
        Event::SlotsChanged(_) => String::new(),
        Event::Validation(result) => {
            let mark = if result.is_correct() { "✅" } else { "❌ Not yet." };
            format!("{} {}", mark, result.messages().join("\n"))
        }
        Event::Evaluation(result) => {
            let mark = if result.is_correct() { "✅" } else { "❌" };
            format!("{} {}", mark, result.message)
        }
        Event::Reveal(reveal) => reveal.message.clone(),
        Event::Hint { text, .. } => text.clone(),
        Event::Steps { steps, grouped } => steps_text(steps, grouped),
        Event::Path(cards) => step_cards_text(cards),
        Event::Checklist(path) => path_checklist(path),
    }
}
